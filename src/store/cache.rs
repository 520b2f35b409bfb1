//! Reload Cache
//!
//! Holds the decoded record set and the backing file's last observed
//! modification time, and re-decodes the file only when that time changes.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::codec::RecordCodec;
use crate::error::{Result, StoreError};
use crate::feature::{Record, RecordId, RecordType};

/// In-memory mirror of the backing file
///
/// ## Invariants
/// - `records` is only replaced wholesale by a successful reload, or edited
///   through `add`/`remove`
/// - `last_synced` moves only as the final step of a successful reload or
///   flush
pub struct ReloadCache {
    /// Backing file
    path: PathBuf,

    /// Live record set, in iteration order
    records: Vec<Record>,

    /// Modification time of the file when `records` last matched it
    last_synced: Option<SystemTime>,

    /// Number of full decode passes performed
    reload_count: u64,
}

impl ReloadCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            last_synced: None,
            reload_count: 0,
        }
    }

    /// Make sure `records` reflects the backing file
    ///
    /// Steps:
    /// 1. Stat the file; a missing file leaves the cache untouched
    /// 2. Unchanged modification time is a cache hit
    /// 3. Otherwise decode the whole file and swap it in
    ///
    /// On any failure the cache keeps its previous records and timestamp.
    pub fn ensure_fresh<C: RecordCodec>(&mut self, codec: &C, schema: &RecordType) -> Result<()> {
        // Step 1: Stat the backing file
        let modified = match fs::metadata(&self.path) {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::trace!("{} does not exist yet, nothing to load", self.path.display());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        // Step 2: Cache hit
        if self.last_synced == Some(modified) {
            tracing::trace!("Cache hit for {}", self.path.display());
            return Ok(());
        }

        // Step 3: Full decode into a fresh set
        let file = File::open(&self.path)?;
        let records = codec.decode_all(&mut BufReader::new(file)).map_err(|e| match e {
            StoreError::Decode(msg) => StoreError::Decode(format!(
                "Error processing {}: {}",
                self.path.display(),
                msg
            )),
            other => other,
        })?;

        if let Some(bad) = records.iter().find(|r| !schema.accepts(r)) {
            return Err(StoreError::Decode(format!(
                "Record {} in {} does not conform to {}",
                bad.id(),
                self.path.display(),
                schema.qualified_name()
            )));
        }

        self.records = records;
        self.last_synced = Some(modified);
        self.reload_count += 1;

        tracing::debug!(
            "Reloaded {} records from {} (reload #{})",
            self.records.len(),
            self.path.display(),
            self.reload_count
        );

        Ok(())
    }

    /// Overwrite the backing file with the full live set
    ///
    /// The document is written to a sibling `.tmp` file, synced, then
    /// renamed over the backing file, and the directory is synced so the
    /// rename survives a crash. On failure the live set is untouched, the
    /// on-disk file keeps its previous content and no `.tmp` is left.
    pub fn flush<C: RecordCodec>(&mut self, codec: &C) -> Result<()> {
        let tmp_path = self.tmp_path()?;

        if let Err(e) = Self::write_document(&tmp_path, codec, &self.records) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        // Best effort: not every platform can open a directory
        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        let modified = fs::metadata(&self.path)?.modified()?;
        self.last_synced = Some(modified);

        tracing::debug!(
            "Flushed {} records to {}",
            self.records.len(),
            self.path.display()
        );

        Ok(())
    }

    fn write_document<C: RecordCodec>(path: &Path, codec: &C, records: &[Record]) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        codec.encode_all(records, &mut writer)?;

        let file = writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))?;
        file.sync_all()?;
        Ok(())
    }

    fn tmp_path(&self) -> Result<PathBuf> {
        let mut name = self
            .path
            .file_name()
            .ok_or_else(|| {
                StoreError::InvalidPath(format!("No file name in {}", self.path.display()))
            })?
            .to_os_string();
        name.push(".tmp");
        Ok(self.path.with_file_name(name))
    }

    /// Add a record, replacing any record with the same id in place
    pub fn add(&mut self, record: Record) {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Put `record` where the record with `id` stands
    ///
    /// Any other record already carrying the new id is dropped. Falls back
    /// to `add` when `id` is not present.
    pub fn replace(&mut self, id: &RecordId, record: Record) {
        let Some(index) = self.records.iter().position(|r| r.id() == id) else {
            self.add(record);
            return;
        };

        let new_id = record.id().clone();
        self.records[index] = record;

        let mut position = 0;
        self.records.retain(|r| {
            let keep = position == index || r.id() != &new_id;
            position += 1;
            keep
        });
    }

    /// Remove the record with this id; returns whether one was present
    pub fn remove(&mut self, id: &RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        self.records.len() != before
    }

    /// Private copy of the live set
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.clone()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_synced(&self) -> Option<SystemTime> {
        self.last_synced
    }

    pub fn reload_count(&self) -> u64 {
        self.reload_count
    }
}
