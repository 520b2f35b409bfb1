//! Codec Module
//!
//! Turns a backing document into records and back. The store never
//! interprets document bytes itself.
//!
//! ## Contract
//! - `read_header` consumes the document framing that precedes the records
//! - `decode_next` yields one record at a time, `Ok(None)` at end of document
//! - `encode_all` writes a complete document (framing included)
//!
//! Decoders are stateless between calls: all state lives in the input
//! stream's position.

mod binary;
mod json;

use std::io::{BufRead, Write};

use crate::error::{Result, StoreError};
use crate::feature::Record;

pub use binary::BinaryCodec;
pub use json::JsonCodec;

/// Encoding and decoding of a whole record document
pub trait RecordCodec {
    /// File extension (without the dot) of documents in this format
    fn extension(&self) -> &'static str;

    /// Consume the document header
    fn read_header(&self, input: &mut dyn BufRead) -> Result<()>;

    /// Decode the next record, or `None` at end of document
    fn decode_next(&self, input: &mut dyn BufRead) -> Result<Option<Record>>;

    /// Encode every record as one complete document
    fn encode_all(&self, records: &[Record], output: &mut dyn Write) -> Result<()>;

    /// Read the header and decode records until the document ends
    fn decode_all(&self, input: &mut dyn BufRead) -> Result<Vec<Record>> {
        self.read_header(input)?;
        let mut records = Vec::new();
        while let Some(record) = self.decode_next(input)? {
            records.push(record);
        }
        Ok(records)
    }

    /// Read the header and decode only the first record
    fn decode_first(&self, input: &mut dyn BufRead) -> Result<Option<Record>> {
        self.read_header(input)?;
        self.decode_next(input)
    }
}

/// Map a read failure inside a document to a decode error
///
/// A short read means the document is truncated, which is a content
/// problem rather than an I/O one.
pub(crate) fn read_error(context: &str, err: std::io::Error) -> StoreError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        StoreError::Decode(format!("{}: unexpected end of document", context))
    } else {
        StoreError::Io(err)
    }
}
