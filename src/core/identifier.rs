//! Post identifiers
//!
//! A [`PostId`] wraps a BSON [`ObjectId`]:
//!
//! | bytes | content |
//! |---|---|
//! | 0..4 | seconds since the Unix epoch, big endian |
//! | 4..9 | per-process random value |
//! | 9..12 | counter, big endian |
//!
//! Its external form is always 24 lowercase hex characters. Because the
//! timestamp leads, byte order (and therefore hex order) follows creation
//! time at one-second resolution.

use crate::core::error::{PostedError, Result};
use bson::oid::ObjectId;
use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of raw bytes in an identifier
pub const ID_LEN: usize = 12;

/// Number of characters in the hex representation
pub const ID_HEX_LEN: usize = ID_LEN * 2;

/// A 12-byte post identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(ObjectId);

impl PostId {
    /// Generate a fresh identifier stamped with the current wall-clock time
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Generate a fresh identifier stamped with `at`
    ///
    /// The process-random and counter bytes come from a freshly generated
    /// object id, so identifiers stamped with the same second still differ.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        let secs = at.timestamp().clamp(0, i64::from(u32::MAX)) as u32;
        let mut bytes = ObjectId::new().bytes();
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        Self::from_bytes(bytes)
    }

    /// Wrap raw bytes
    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(ObjectId::from_bytes(bytes))
    }

    /// Parse the 24-character hex form
    ///
    /// Uppercase digits are accepted; anything that is not exactly 12 bytes
    /// of hex is a validation error.
    pub fn parse_hex(value: &str) -> Result<Self> {
        if value.len() != ID_HEX_LEN {
            return Err(PostedError::validation(
                "identifier",
                format!(
                    "expected {} hex characters, got {} in '{}'",
                    ID_HEX_LEN,
                    value.len(),
                    value
                ),
            ));
        }

        ObjectId::parse_str(value).map(Self).map_err(|e| {
            PostedError::validation("identifier", format!("'{}' is not valid hex: {}", value, e))
        })
    }

    /// Render the canonical lowercase hex form
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn bytes(&self) -> [u8; ID_LEN] {
        self.0.bytes()
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    /// The creation second encoded in the identifier
    pub fn timestamp(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.0.timestamp().timestamp_millis())
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl From<ObjectId> for PostId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostId({})", self.to_hex())
    }
}

impl FromStr for PostId {
    type Err = PostedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_hex(s)
    }
}

impl Serialize for PostId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct PostIdVisitor;

impl Visitor<'_> for PostIdVisitor {
    type Value = PostId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {}-character hex identifier", ID_HEX_LEN)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<PostId, E> {
        PostId::parse_hex(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_str(PostIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use std::collections::HashSet;

    #[test]
    fn test_hex_roundtrip() {
        for hex in [
            "000000000000000000000000",
            "5f1b2c3d4e5f6a7b8c9d0e1f",
            "ffffffffffffffffffffffff",
            "0123456789abcdef01234567",
        ] {
            let id = PostId::parse_hex(hex).unwrap();
            assert_eq!(id.to_hex(), hex);
            assert_eq!(id.to_string(), hex);
        }
    }

    #[test]
    fn test_uppercase_is_normalized() {
        let id = PostId::parse_hex("5F1B2C3D4E5F6A7B8C9D0E1F").unwrap();
        assert_eq!(id.to_hex(), "5f1b2c3d4e5f6a7b8c9d0e1f");
    }

    #[test]
    fn test_invalid_hex_is_validation_error() {
        for bad in [
            "",
            "1",
            "5f1b2c3d4e5f6a7b8c9d0e1",
            "5f1b2c3d4e5f6a7b8c9d0e1f0",
            "zzzzzzzzzzzzzzzzzzzzzzzz",
            "5f1b2c3d4e5f6a7b8c9d0e1g",
        ] {
            let err = PostId::parse_hex(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "input {:?}", bad);
        }
    }

    #[test]
    fn test_generated_ids_are_unique_and_time_stamped() {
        let now = Utc::now();
        let ids: HashSet<PostId> = (0..1000).map(|_| PostId::from_timestamp(now)).collect();
        assert_eq!(ids.len(), 1000);

        let id = PostId::from_timestamp(now);
        assert_eq!(id.timestamp().timestamp(), now.timestamp());
    }

    #[test]
    fn test_later_timestamp_sorts_after() {
        let earlier = PostId::from_timestamp(Utc.timestamp_opt(1_600_000_000, 0).unwrap());
        let later = PostId::from_timestamp(Utc.timestamp_opt(1_600_000_001, 0).unwrap());
        assert!(earlier < later);
        assert!(earlier.to_hex() < later.to_hex());
    }

    #[test]
    fn test_object_id_layout() {
        let at = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
        let id = PostId::from_timestamp(at);
        assert_eq!(id.object_id().bytes(), id.bytes());
        assert_eq!(&id.bytes()[..4], &1_600_000_000u32.to_be_bytes());
        assert_eq!(id.timestamp(), at);

        let oid = ObjectId::new();
        assert_eq!(PostId::from(oid).to_hex(), oid.to_hex());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let id = PostId::parse_hex("5f1b2c3d4e5f6a7b8c9d0e1f").unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!("5f1b2c3d4e5f6a7b8c9d0e1f"));

        let back: PostId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_value::<PostId>(serde_json::json!("nothex")).is_err());
    }
}
