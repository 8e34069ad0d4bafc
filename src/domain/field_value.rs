use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rendering of [`FieldValue::Unknown`] in human-facing text. Matches the
/// marker the completion model is told to use for missing fields.
pub const UNKNOWN_DISPLAY: &str = "None";

/// A single prescription leaf: either a concrete value or the explicit
/// unknown marker.
///
/// `Unknown` is carried on the wire as JSON `null`. It is distinct from the
/// empty string (`Known("")`) and from a missing key, which is modelled one
/// level up as `Option<FieldValue>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    Known(String),
    #[default]
    Unknown,
}

impl FieldValue {
    pub fn known(value: impl Into<String>) -> Self {
        Self::Known(value.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn as_known(&self) -> Option<&str> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => f.write_str(value),
            Self::Unknown => f.write_str(UNKNOWN_DISPLAY),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Known(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Known(value)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

impl From<&Value> for FieldValue {
    /// Model output is loosely typed: numbers and booleans keep their JSON
    /// text, nested structures are flattened to compact JSON.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Unknown,
            Value::String(s) => Self::Known(s.clone()),
            Value::Number(n) => Self::Known(n.to_string()),
            Value::Bool(b) => Self::Known(b.to_string()),
            other => Self::Known(other.to_string()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(value) => serializer.serialize_str(value),
            Self::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from(&value))
    }
}

/// Deserializes a leaf that is present in the input, keeping an explicit
/// `null` as `Some(Unknown)`. Combine with `#[serde(default)]` so that only a
/// missing key yields `None`.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<FieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    FieldValue::deserialize(deserializer).map(Some)
}
