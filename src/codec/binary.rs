//! Binary document codec
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Header (6 bytes)                        │
//! │   Magic: "FSTR" (4) | Version: u16 (2)  │
//! ├─────────────────────────────────────────┤
//! │ Record 1                                │
//! │ ┌─────────┬─────────┬─────────────────┐ │
//! │ │ Len (4) │ CRC (4) │ bincode payload │ │
//! │ └─────────┴─────────┴─────────────────┘ │
//! ├─────────────────────────────────────────┤
//! │ ... repeated for each record ...        │
//! ├─────────────────────────────────────────┤
//! │ End marker: Len = 0 (4)                 │
//! └─────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. The CRC covers the payload only.

use std::io::{BufRead, Write};

use crate::error::{Result, StoreError};
use crate::feature::Record;

use super::{read_error, RecordCodec};

/// Magic bytes identifying a feature store document
pub const MAGIC: &[u8; 4] = b"FSTR";

/// Current document format version
pub const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2)
pub const HEADER_SIZE: usize = 6;

/// Frame header size: Len (4) + CRC (4)
pub const FRAME_HEADER_SIZE: usize = 8;

/// Largest accepted record payload (16 MB)
pub const MAX_RECORD_SIZE: u32 = 16 * 1024 * 1024;

/// Frame length that terminates the record sequence
const END_MARKER: u32 = 0;

/// Framed bincode documents with per-record checksums
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl BinaryCodec {
    pub const EXTENSION: &'static str = "fstore";

    pub fn new() -> Self {
        Self
    }

    fn encode_record(record: &Record) -> Result<Vec<u8>> {
        let payload = bincode::serialize(record).map_err(|e| {
            StoreError::Encode(format!("Failed to serialize record {}: {}", record.id(), e))
        })?;

        if payload.len() > MAX_RECORD_SIZE as usize {
            return Err(StoreError::Encode(format!(
                "Record {} too large: {} bytes (max {})",
                record.id(),
                payload.len(),
                MAX_RECORD_SIZE
            )));
        }

        let crc = crc32fast::hash(&payload);

        let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&crc.to_le_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }
}

impl RecordCodec for BinaryCodec {
    fn extension(&self) -> &'static str {
        Self::EXTENSION
    }

    fn read_header(&self, input: &mut dyn BufRead) -> Result<()> {
        let mut header = [0u8; HEADER_SIZE];
        input
            .read_exact(&mut header)
            .map_err(|e| read_error("Document header", e))?;

        if &header[0..4] != MAGIC {
            return Err(StoreError::Decode(format!(
                "Invalid document magic: expected FSTR, got {:?}",
                &header[0..4]
            )));
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != VERSION {
            return Err(StoreError::Decode(format!(
                "Unsupported document version: {}",
                version
            )));
        }

        Ok(())
    }

    fn decode_next(&self, input: &mut dyn BufRead) -> Result<Option<Record>> {
        let mut len_bytes = [0u8; 4];
        input
            .read_exact(&mut len_bytes)
            .map_err(|e| read_error("Record frame", e))?;

        let len = u32::from_le_bytes(len_bytes);
        if len == END_MARKER {
            return Ok(None);
        }

        if len > MAX_RECORD_SIZE {
            return Err(StoreError::Decode(format!(
                "Record frame too large: {} bytes (max {})",
                len, MAX_RECORD_SIZE
            )));
        }

        let mut crc_bytes = [0u8; 4];
        input
            .read_exact(&mut crc_bytes)
            .map_err(|e| read_error("Record checksum", e))?;
        let expected_crc = u32::from_le_bytes(crc_bytes);

        let mut payload = vec![0u8; len as usize];
        input
            .read_exact(&mut payload)
            .map_err(|e| read_error("Record payload", e))?;

        let actual_crc = crc32fast::hash(&payload);
        if actual_crc != expected_crc {
            return Err(StoreError::Decode(format!(
                "Record checksum mismatch: expected {:08x}, got {:08x}",
                expected_crc, actual_crc
            )));
        }

        let record = bincode::deserialize(&payload)
            .map_err(|e| StoreError::Decode(format!("Malformed record payload: {}", e)))?;

        Ok(Some(record))
    }

    fn encode_all(&self, records: &[Record], output: &mut dyn Write) -> Result<()> {
        output.write_all(MAGIC)?;
        output.write_all(&VERSION.to_le_bytes())?;

        for record in records {
            output.write_all(&Self::encode_record(record)?)?;
        }

        output.write_all(&END_MARKER.to_le_bytes())?;
        output.flush()?;
        Ok(())
    }
}
