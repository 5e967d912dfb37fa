use std::sync::{Arc, OnceLock};

use crate::error::{RecordError, Result};
use crate::field::{decode_array, encode_array};
use crate::record::Record;
use crate::records::cd_record;
use crate::registry::SIG_CD_COLORTABLE;
use crate::schema::{FieldKind, Schema};
use crate::signature::HeaderKind;
use crate::value::Value;

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorEntry {
    fn schema() -> Result<Arc<Schema>> {
        static SCHEMA: OnceLock<Result<Arc<Schema>>> = OnceLock::new();
        SCHEMA
            .get_or_init(|| {
                Schema::structure("COLOR_ENTRY")
                    .u8("red")
                    .u8("green")
                    .u8("blue")
                    .u8("reserved")
                    .build()
            })
            .clone()
    }

    fn from_value(value: &Value) -> ColorEntry {
        let channel = |name: &str| {
            value
                .member(name)
                .and_then(Value::as_u64)
                .map_or(0, |v| v as u8)
        };
        ColorEntry {
            red: channel("red"),
            green: channel("green"),
            blue: channel("blue"),
        }
    }

    fn to_value(self) -> Value {
        Value::Struct(vec![
            ("red", Value::Int(i64::from(self.red))),
            ("green", Value::Int(i64::from(self.green))),
            ("blue", Value::Int(i64::from(self.blue))),
            ("reserved", Value::Int(0)),
        ])
    }
}

/// Palette for a following bitmap. Has no fixed fields; the entry count
/// is the declared length minus the 6-byte header, in 4-byte entries.
#[derive(Debug)]
pub struct CdColorTable {
    record: Record,
}

cd_record!(
    CdColorTable,
    Schema::record("CDCOLORTABLE", HeaderKind::Long, SIG_CD_COLORTABLE).build()
);

impl CdColorTable {
    /// Entries the header declares, cut short at the end of the buffer.
    pub fn entries(&self) -> Result<Vec<ColorEntry>> {
        let entry = FieldKind::Struct(ColorEntry::schema()?);
        let declared = self.record.signature()?.total_len as usize;
        let count = declared.saturating_sub(6) / entry.width();
        let values = decode_array(self.record.variable_data(), &entry, count)?;
        Ok(values.iter().map(ColorEntry::from_value).collect())
    }

    pub fn set_entries(&mut self, entries: &[ColorEntry]) -> Result<()> {
        let entry = FieldKind::Struct(ColorEntry::schema()?);
        let values: Vec<Value> = entries.iter().map(|e| e.to_value()).collect();
        let len = entries
            .len()
            .checked_mul(entry.width())
            .ok_or(RecordError::ValueOutOfRange {
                field: "entries".to_string(),
                value: entries.len().to_string(),
            })?;
        self.record.resize_variable_data(len)?;
        encode_array(self.record.variable_data_mut(), 0, &entry, &values, "entries")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecordConfig;
    use crate::records::CdRecord;

    #[test]
    fn entries_follow_declared_length() {
        let mut table = CdColorTable::allocate().unwrap();
        let palette = [
            ColorEntry { red: 255, green: 0, blue: 0 },
            ColorEntry { red: 0, green: 128, blue: 255 },
        ];
        table.set_entries(&palette).unwrap();
        assert_eq!(table.record().len(), 6 + 8);
        assert_eq!(table.entries().unwrap(), palette);
    }

    #[test]
    fn overstated_length_truncates_to_complete_entries() {
        let bytes = vec![0x63, 0x00, 22, 0, 0, 0, 1, 2, 3, 0, 4, 5, 6, 0, 7, 8];
        let schema = CdColorTable::schema().unwrap();
        let record = Record::wrap_with(bytes, schema, &RecordConfig::lenient()).unwrap();
        let table = CdColorTable::from_record(record);
        let entries = table.entries().unwrap();
        assert_eq!(
            entries,
            vec![
                ColorEntry { red: 1, green: 2, blue: 3 },
                ColorEntry { red: 4, green: 5, blue: 6 },
            ]
        );
    }
}
