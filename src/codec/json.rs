//! Line-delimited JSON document codec
//!
//! ```text
//! {"format":"featurestore","version":1}     <- header line
//! {"id":"a","type_name":"Placemark",...}    <- one record per line
//! {"id":"b","type_name":"Placemark",...}
//! ```
//!
//! Blank lines are ignored. This is also the format of the bundled schema
//! template. JSON has no NaN or infinity, so records holding them are
//! refused at encode time.

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::feature::Record;

use super::RecordCodec;

/// Value of the header's `format` field
pub const FORMAT_NAME: &str = "featurestore";

/// Current document format version
pub const VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct DocumentHeader {
    format: String,
    version: u32,
}

/// Human-readable documents, one JSON record per line
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub const EXTENSION: &'static str = "jsonl";

    pub fn new() -> Self {
        Self
    }

    /// Next non-blank line, or `None` at end of input
    fn next_line(input: &mut dyn BufRead) -> Result<Option<String>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = input.read_line(&mut line).map_err(|e| {
                if e.kind() == io::ErrorKind::InvalidData {
                    StoreError::Decode(format!("Document is not valid UTF-8: {}", e))
                } else {
                    StoreError::Io(e)
                }
            })?;
            if read == 0 {
                return Ok(None);
            }
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
    }
}

impl RecordCodec for JsonCodec {
    fn extension(&self) -> &'static str {
        Self::EXTENSION
    }

    fn read_header(&self, input: &mut dyn BufRead) -> Result<()> {
        let line = Self::next_line(input)?
            .ok_or_else(|| StoreError::Decode("Missing document header".to_string()))?;

        let header: DocumentHeader = serde_json::from_str(line.trim())
            .map_err(|e| StoreError::Decode(format!("Malformed document header: {}", e)))?;

        if header.format != FORMAT_NAME {
            return Err(StoreError::Decode(format!(
                "Unexpected document format: {}",
                header.format
            )));
        }
        if header.version != VERSION {
            return Err(StoreError::Decode(format!(
                "Unsupported document version: {}",
                header.version
            )));
        }

        Ok(())
    }

    fn decode_next(&self, input: &mut dyn BufRead) -> Result<Option<Record>> {
        let Some(line) = Self::next_line(input)? else {
            return Ok(None);
        };

        serde_json::from_str::<Record>(line.trim())
            .map(Some)
            .map_err(|e| StoreError::Decode(format!("Malformed record: {}", e)))
    }

    fn encode_all(&self, records: &[Record], output: &mut dyn Write) -> Result<()> {
        let header = DocumentHeader {
            format: FORMAT_NAME.to_string(),
            version: VERSION,
        };
        let encode_err = |e: serde_json::Error| StoreError::Encode(e.to_string());

        // Check everything before the first byte goes out
        for record in records {
            if let Some(attribute) = record
                .attributes()
                .iter()
                .find(|a| a.value.as_ref().is_some_and(|v| !v.is_finite()))
            {
                return Err(StoreError::Encode(format!(
                    "Record {} attribute {} holds a non-finite number",
                    record.id(),
                    attribute.name
                )));
            }
        }

        output.write_all(serde_json::to_string(&header).map_err(encode_err)?.as_bytes())?;
        output.write_all(b"\n")?;

        for record in records {
            let line = serde_json::to_string(record).map_err(encode_err)?;
            output.write_all(line.as_bytes())?;
            output.write_all(b"\n")?;
        }

        output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Attribute, AttributeType, Coord, Geometry, Value};

    #[test]
    fn test_encoded_document_is_line_per_record() {
        let record = Record::new(
            "a",
            "Placemark",
            vec![Attribute {
                name: "geometry".to_string(),
                kind: AttributeType::Geometry,
                value: Some(Value::Geometry(Geometry::Point(Coord::new(1.0, 2.0)))),
            }],
        );

        let mut bytes = Vec::new();
        JsonCodec.encode_all(&[record.clone(), record.clone()], &mut bytes).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();

        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with(r#"{"format":"featurestore","version":1}"#));

        let decoded = JsonCodec.decode_all(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded, vec![record.clone(), record]);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = "\n{\"format\":\"featurestore\",\"version\":1}\n\n\
                    {\"id\":\"a\",\"type_name\":\"T\",\"attributes\":[]}\n\n";
        let records = JsonCodec.decode_all(&mut text.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_missing_header_is_decode_error() {
        let err = JsonCodec.decode_all(&mut "".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn test_non_finite_value_is_encode_error() {
        let record = Record::new(
            "a",
            "Placemark",
            vec![Attribute {
                name: "elevation".to_string(),
                kind: AttributeType::Float,
                value: Some(Value::Float(f64::NAN)),
            }],
        );

        let mut bytes = Vec::new();
        let err = JsonCodec.encode_all(&[record], &mut bytes).unwrap_err();
        assert!(matches!(err, StoreError::Encode(msg) if msg.contains("elevation")));
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let mut bytes = b"{\"format\":\"featurestore\",\"version\":1}\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe\n");

        let err = JsonCodec.decode_all(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn test_wrong_format_is_decode_error() {
        let text = "{\"format\":\"other\",\"version\":1}\n";
        let err = JsonCodec.decode_all(&mut text.as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Decode(msg) if msg.contains("other")));
    }
}
