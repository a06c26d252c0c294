//! Key codec
//!
//! A `NodeKey` is serialized as the JSON array `[alloc_id, offset, "ty"]`.
//! Numbers are rendered in canonical decimal and the type descriptor is a
//! JSON string literal, so field boundaries can never be confused
//! (`[1,23,"T"]` vs `[12,3,"T"]`) and quoting inside the descriptor is escaped.

use std::fmt;

use serde::{Deserialize, Serialize};
use viz_types::{AllocId, NodeKey};

use crate::error::KeyDecodeError;

/// Index form of a `NodeKey`, produced only by [`serialize`]
///
/// Deserializing goes through [`SerializedKey::parse`], so a key read back
/// from JSON is always byte-identical to the one the index holds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializedKey(String);

impl SerializedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Anchor used by back-references to point at the expanded node
    pub fn anchor(&self) -> String {
        format!("node_{}", self.0)
    }

    /// Accept a raw string only if it is exactly what [`serialize`] produces.
    /// Spacing or escape variants decode fine but would never match the index.
    pub fn parse(raw: impl Into<String>) -> Result<Self, KeyDecodeError> {
        let key = Self(raw.into());
        if serialize(&deserialize(&key)?) != key {
            return Err(KeyDecodeError {
                raw: key.0,
                reason: "not in canonical form".to_string(),
            });
        }
        Ok(key)
    }
}

impl TryFrom<String> for SerializedKey {
    type Error = KeyDecodeError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<SerializedKey> for String {
    fn from(key: SerializedKey) -> Self {
        key.0
    }
}

impl fmt::Display for SerializedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize a key into its index form. Pure and total.
pub fn serialize(key: &NodeKey) -> SerializedKey {
    let ty = serde_json::Value::from(key.type_descriptor.as_str());
    SerializedKey(format!("[{},{},{}]", key.alloc_id.get(), key.offset, ty))
}

/// Exact inverse of [`serialize`]
pub fn deserialize(key: &SerializedKey) -> Result<NodeKey, KeyDecodeError> {
    let (alloc_id, offset, type_descriptor): (u64, u64, String) =
        serde_json::from_str(key.as_str()).map_err(|e| KeyDecodeError {
            raw: key.as_str().to_string(),
            reason: e.to_string(),
        })?;
    Ok(NodeKey {
        alloc_id: AllocId(alloc_id),
        offset,
        type_descriptor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let key = NodeKey::new(3, 16, "Node<u8>");
        assert_eq!(serialize(&key).as_str(), r#"[3,16,"Node<u8>"]"#);
        assert_eq!(serialize(&key).anchor(), r#"node_[3,16,"Node<u8>"]"#);
    }

    #[test]
    fn test_no_field_boundary_collision() {
        let a = serialize(&NodeKey::new(1, 23, "T"));
        let b = serialize(&NodeKey::new(12, 3, "T"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_descriptor_quoting_is_escaped() {
        let tricky = NodeKey::new(1, 2, r#"3,"x"#);
        let plain = NodeKey::new(1, 2, "3");
        assert_ne!(serialize(&tricky), serialize(&plain));
        assert_eq!(deserialize(&serialize(&tricky)).unwrap(), tricky);
    }

    #[test]
    fn test_parse_rejects_foreign_strings() {
        assert!(SerializedKey::parse("1|2|T").is_err());
        assert!(SerializedKey::parse(r#"[1,2]"#).is_err());
        assert!(SerializedKey::parse(r#"[-1,2,"T"]"#).is_err());
        assert!(SerializedKey::parse(r#"[1,2,"T"]"#).is_ok());
    }

    #[test]
    fn test_parse_rejects_non_canonical_spellings() {
        for raw in [
            r#"[1, 2, "T"]"#,
            r#" [1,2,"T"]"#,
            r#"[1,2,"\u0054"]"#,
            r#"[01,2,"T"]"#,
            r#"[1.0,2,"T"]"#,
        ] {
            let err = SerializedKey::parse(raw).unwrap_err();
            assert_eq!(err.raw, raw);
        }
        assert_eq!(
            SerializedKey::parse(r#"[1,2,"T"]"#).unwrap(),
            serialize(&NodeKey::new(1, 2, "T"))
        );
    }

    #[test]
    fn test_json_round_trip_checks_form() {
        let key = serialize(&NodeKey::new(4, 8, "Vec<\"u8\">"));
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(serde_json::from_str::<SerializedKey>(&json).unwrap(), key);

        let spaced = serde_json::to_string(r#"[4, 8, "T"]"#).unwrap();
        assert!(serde_json::from_str::<SerializedKey>(&spaced).is_err());
    }
}
