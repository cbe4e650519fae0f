use std::fmt;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable numeric identity of a record or effect definition.
///
/// Ordering is numeric, which is also the order records are listed in the
/// change log. Serialized as an 8-digit hex string; deserializes from either a
/// JSON number or a hex string with an optional `0x` prefix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormId(u32);

impl FormId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<u32> for FormId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

impl TryFrom<&str> for FormId {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err("form id cannot be empty".into());
        }
        u32::from_str_radix(digits, 16)
            .map(FormId)
            .map_err(|e| format!("invalid form id {s:?}: {e}"))
    }
}

impl Serialize for FormId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FormId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u32),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(FormId(n)),
            Repr::Text(s) => FormId::try_from(s.as_str()).map_err(de::Error::custom),
        }
    }
}
