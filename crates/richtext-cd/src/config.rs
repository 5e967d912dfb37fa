//! Wrapping options.

use serde::{Deserialize, Serialize};

/// Checks applied when a buffer is wrapped and limits applied on resize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// Reject buffers whose declared length differs from their size.
    pub validate_header_length: bool,
    /// Reject buffers whose signature differs from the schema's.
    pub check_signature: bool,
    /// Upper bound on a record's total length, below the header limit.
    pub max_record_length: u32,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            validate_header_length: true,
            check_signature: true,
            max_record_length: u32::MAX,
        }
    }
}

impl RecordConfig {
    /// Options for salvaging records whose header disagrees with the buffer.
    pub fn lenient() -> Self {
        Self {
            validate_header_length: false,
            check_signature: false,
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
