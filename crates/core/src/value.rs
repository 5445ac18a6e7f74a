//! Scalar property values
//!
//! Node and edge properties map non-empty string keys to scalars:
//! - `Null`
//! - `Bool`
//! - `Number` (integer or float, as `serde_json::Number`)
//! - `String`
//!
//! Nested arrays and objects are rejected at every boundary: on decode,
//! on conversion from `serde_json::Value`, and on graph validation.
//!
//! # Examples
//!
//! ```
//! use kgraph_core::PropertyValue;
//!
//! let s = PropertyValue::from("Alice");
//! let n = PropertyValue::from(42i64);
//! let b = PropertyValue::from(true);
//!
//! assert_eq!(s.as_str(), Some("Alice"));
//! assert!(n.is_number());
//! assert!(!b.is_null());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::KgError;

/// Property map of a node or edge.
///
/// Ordered by key so that serialization is canonical.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A scalar property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// JSON `null`
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number, integer or float
    Number(serde_json::Number),
    /// JSON string
    String(String),
}

impl PropertyValue {
    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric payload as i64, if representable.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// The numeric payload as f64, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Whether this is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Whether this is a number.
    pub fn is_number(&self) -> bool {
        matches!(self, PropertyValue::Number(_))
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => f.write_str("null"),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Number(v.into())
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Number(v.into())
    }
}

impl From<u64> for PropertyValue {
    fn from(v: u64) -> Self {
        PropertyValue::Number(v.into())
    }
}

impl From<f64> for PropertyValue {
    // NaN and infinities have no JSON form and collapse to null
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v).map_or(PropertyValue::Null, PropertyValue::Number)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(PropertyValue::Null, Into::into)
    }
}

impl From<PropertyValue> for serde_json::Value {
    fn from(v: PropertyValue) -> Self {
        match v {
            PropertyValue::Null => serde_json::Value::Null,
            PropertyValue::Bool(b) => serde_json::Value::Bool(b),
            PropertyValue::Number(n) => serde_json::Value::Number(n),
            PropertyValue::String(s) => serde_json::Value::String(s),
        }
    }
}

impl TryFrom<serde_json::Value> for PropertyValue {
    type Error = KgError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        match v {
            serde_json::Value::Null => Ok(PropertyValue::Null),
            serde_json::Value::Bool(b) => Ok(PropertyValue::Bool(b)),
            serde_json::Value::Number(n) => Ok(PropertyValue::Number(n)),
            serde_json::Value::String(s) => Ok(PropertyValue::String(s)),
            serde_json::Value::Array(_) => Err(KgError::invalid_input(
                "property values must be scalars, got an array",
            )),
            serde_json::Value::Object(_) => Err(KgError::invalid_input(
                "property values must be scalars, got an object",
            )),
        }
    }
}

/// Convert a JSON object into a property map.
///
/// Fails if `value` is not an object, if any key is empty, or if any value
/// is an array or object.
///
/// ```
/// use kgraph_core::value::properties_from_json;
///
/// let props = properties_from_json(serde_json::json!({"name": "Alice", "age": 30})).unwrap();
/// assert_eq!(props["name"].as_str(), Some("Alice"));
/// ```
pub fn properties_from_json(value: serde_json::Value) -> Result<Properties, KgError> {
    let serde_json::Value::Object(map) = value else {
        return Err(KgError::invalid_input("properties must be a JSON object"));
    };
    let mut props = Properties::new();
    for (key, v) in map {
        if key.is_empty() {
            return Err(KgError::invalid_input("property keys must not be empty"));
        }
        let v = PropertyValue::try_from(v)
            .map_err(|e| KgError::invalid_input(format!("property '{}': {}", key, e)))?;
        props.insert(key, v);
    }
    Ok(props)
}
