//! featurestore CLI
//!
//! Command-line interface for inspecting and editing a store file.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use featurestore::codec::{BinaryCodec, JsonCodec, RecordCodec};
use featurestore::{
    authority, FeatureStore, Record, RecordId, SchemaSource, StoreConfig, StoreError, Value,
};
use tracing_subscriber::{fmt, EnvFilter};

/// featurestore CLI
#[derive(Parser, Debug)]
#[command(name = "featurestore-cli")]
#[command(about = "CLI for single-file feature stores")]
#[command(version)]
struct Args {
    /// Backing store file
    #[arg(short, long, default_value = "./features.fstore")]
    file: PathBuf,

    /// Namespace of the derived record type
    #[arg(short, long)]
    namespace: Option<String>,

    /// Document format of the backing file
    #[arg(short, long, value_enum, default_value = "binary")]
    codec: CodecKind,

    /// Derive the schema from the file's first record instead of the template
    #[arg(long)]
    first_record_schema: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodecKind {
    Binary,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the derived record type
    Schema,

    /// Print every record
    List,

    /// Print the number of records
    Count,

    /// Print the envelope of all geometries
    Bounds,

    /// Append a record
    Add {
        /// Identifier of the new record (random if omitted)
        #[arg(long)]
        id: Option<String>,

        /// Attribute assignment, repeatable
        #[arg(long = "set", value_name = "NAME=VALUE")]
        assignments: Vec<String>,
    },

    /// Remove a record by id
    Remove {
        /// The id to remove
        id: String,
    },

    /// Resolve an urn:adv:crs code to its EPSG code
    Crs {
        /// The URN to resolve
        urn: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,featurestore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.codec {
        CodecKind::Binary => run(&args, BinaryCodec),
        CodecKind::Json => run(&args, JsonCodec),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run<C: RecordCodec>(args: &Args, codec: C) -> featurestore::Result<()> {
    if let Commands::Crs { urn } = &args.command {
        println!("{}:{}", authority::EPSG_AUTHORITY, authority::epsg_code(urn)?);
        return Ok(());
    }

    let mut builder = StoreConfig::builder().path(&args.file);
    if let Some(ns) = &args.namespace {
        builder = builder.namespace(ns);
    }
    if args.first_record_schema {
        builder = builder.schema_source(SchemaSource::FirstRecord);
    }

    let mut store = FeatureStore::open(builder.build(), codec)?;

    match &args.command {
        Commands::Schema => {
            let schema = store.schema();
            println!("{}", schema.qualified_name());
            for slot in &schema.attributes {
                let marker = if schema.default_geometry.as_deref() == Some(slot.name.as_str()) {
                    " (default geometry)"
                } else {
                    ""
                };
                println!("  {}: {}{}", slot.name, slot.kind, marker);
            }
        }
        Commands::List => {
            let mut reader = store.reader()?;
            while reader.has_next() {
                print_record(&reader.next()?);
            }
            reader.close();
        }
        Commands::Count => println!("{}", store.count()?),
        Commands::Bounds => println!("{}", store.bounds()?),
        Commands::Add { id, assignments } => {
            let schema = store.schema();
            let mut writer = store.writer()?;
            while writer.has_next() {
                writer.next()?;
            }

            let record = writer.next()?;
            if let Some(id) = id {
                record.set_id(RecordId::new(id.as_str()));
            }
            for assignment in assignments {
                let (name, raw) = assignment.split_once('=').ok_or_else(|| {
                    StoreError::Config(format!("Expected NAME=VALUE, got {:?}", assignment))
                })?;
                let slot = schema
                    .attribute(name)
                    .ok_or_else(|| StoreError::UnknownAttribute(name.to_string()))?;
                record.set(name, Value::parse(slot.kind, raw)?)?;
            }

            let new_id = record.id().clone();
            writer.write()?;
            writer.close()?;
            tracing::info!("Added record {}", new_id);
        }
        Commands::Remove { id } => {
            let target = RecordId::new(id.as_str());
            let mut writer = store.writer()?;
            let mut found = false;
            while writer.has_next() {
                if writer.next()?.id() == &target {
                    writer.remove()?;
                    found = true;
                }
            }
            writer.close()?;

            if found {
                tracing::info!("Removed record {}", target);
            } else {
                tracing::warn!("No record with id {}", target);
            }
        }
        Commands::Crs { .. } => {}
    }

    Ok(())
}

fn print_record(record: &Record) {
    println!("{}", record.id());
    for attribute in record.attributes() {
        match &attribute.value {
            Some(value) => println!("  {} = {}", attribute.name, value),
            None => println!("  {} = <unset>", attribute.name),
        }
    }
}
