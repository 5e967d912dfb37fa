//! Dynamic field values.

use serde_json::{json, Map};

/// Value of one field, as read through a schema.
///
/// Unsigned integers narrower than 64 bits widen into `Int`, so a `u16`
/// field reads as `Int` in `0..=65535`; only unsigned 64-bit fields need
/// `UInt64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    UInt64(u64),
    Bytes(Vec<u8>),
    /// Raw legacy-charset bytes of a char array, padding included.
    Chars(Vec<u8>),
    /// Single-valued enum; `name` is `None` when no constant matches `raw`.
    Enum {
        name: Option<&'static str>,
        raw: u64,
    },
    /// Bitfield; `raw` keeps bits no constant accounts for.
    Flags {
        names: Vec<&'static str>,
        raw: u64,
    },
    Array(Vec<Value>),
    Struct(Vec<(&'static str, Value)>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::UInt64(_) => "unsigned 64-bit integer",
            Value::Bytes(_) => "bytes",
            Value::Chars(_) => "chars",
            Value::Enum { .. } => "enum",
            Value::Flags { .. } => "flags",
            Value::Array(_) => "array",
            Value::Struct(_) => "structure",
        }
    }

    /// Integer content; enums and flags yield their raw value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt64(v) => i64::try_from(*v).ok(),
            Value::Enum { raw, .. } | Value::Flags { raw, .. } => i64::try_from(*raw).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(v) => u64::try_from(*v).ok(),
            Value::UInt64(v) => Some(*v),
            Value::Enum { raw, .. } | Value::Flags { raw, .. } => Some(*raw),
            _ => None,
        }
    }

    /// Looks up a member of a `Struct` value.
    pub fn member(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members.iter().find(|(n, _)| *n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(v) => json!(v),
            Value::UInt64(v) => json!(v),
            Value::Bytes(bytes) | Value::Chars(bytes) => json!(bytes),
            Value::Enum { name, raw } => json!({ "name": name, "raw": raw }),
            Value::Flags { names, raw } => json!({ "names": names, "raw": raw }),
            Value::Array(items) => items.iter().map(Value::to_json).collect(),
            Value::Struct(members) => {
                let mut map = Map::new();
                for (name, value) in members {
                    map.insert((*name).to_string(), value.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_views() {
        assert_eq!(Value::Int(-1).as_u64(), None);
        assert_eq!(Value::UInt64(u64::MAX).as_i64(), None);
        assert_eq!(Value::Enum { name: None, raw: 7 }.as_i64(), Some(7));
        assert_eq!(Value::Bytes(vec![1]).as_i64(), None);
    }

    #[test]
    fn struct_json_keeps_member_order() {
        let value = Value::Struct(vec![
            ("zeta", Value::Int(1)),
            ("alpha", Value::Flags { names: vec!["Bold"], raw: 0x41 }),
        ]);
        assert_eq!(
            serde_json::to_string(&value.to_json()).unwrap(),
            r#"{"zeta":1,"alpha":{"names":["Bold"],"raw":65}}"#
        );
        assert_eq!(value.member("zeta"), Some(&Value::Int(1)));
    }
}
