//! The submission value tree.
//!
//! [`Value`] is a closed variant over the JSON data a form submission can
//! carry. Validators narrow it explicitly; a narrowing failure is reported as
//! a shape violation, never a panic. Absence of a key is modelled as
//! `Option<&Value>` being `None`, distinct from an explicit [`Value::Null`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A node in a submission value tree.
///
/// # Examples
///
/// ```
/// use formwork_schema::value::Value;
///
/// let v = Value::from(serde_json::json!({"name": "Alice", "age": 30}));
/// assert_eq!(v.get("name"), Some(&Value::from("Alice")));
/// assert_eq!(v.get("age").and_then(Value::as_f64), Some(30.0));
/// assert_eq!(v.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// JSON `null`.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. JSON integers and floats are both represented as `f64`.
    Number(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of values.
    Array(Vec<Value>),
    /// A record keyed by field key.
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the name of this value's variant, for shape messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Record(_) => "record",
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a number.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the elements if this is an array.
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the members if this is a record.
    pub const fn as_record(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Record(members) => Some(members),
            _ => None,
        }
    }

    /// Looks up a member of a record. Returns `None` for non-records.
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_record().and_then(|members| members.get(key))
    }

    /// Returns `true` for `null` and for strings that are empty or whitespace.
    ///
    /// This is the emptiness rule shared by all string-like kinds.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Builds a record from `(key, value)` pairs.
    pub fn record<K, I>(members: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Record(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Formats a number without a trailing `.0` when it is integral.
#[allow(clippy::cast_possible_truncation)]
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write_number(f, *n),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Self::Record(members) => {
                write!(f, "{{")?;
                for (i, (k, v)) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// ── Conversions ────────────────────────────────────────────────────────

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(members) => Self::Record(
                members
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    #[allow(clippy::cast_possible_truncation)]
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Self::from(n as i64),
            Value::Number(n) => serde_json::Number::from_f64(n).map_or(Self::Null, Self::Number),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Record(members) => Self::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_covers_every_variant() {
        let v = Value::from(json!({
            "n": null, "b": true, "x": 1.5, "s": "hi", "a": [1, "two"], "r": {"k": 2}
        }));
        assert_eq!(v.get("n"), Some(&Value::Null));
        assert_eq!(v.get("b"), Some(&Value::Bool(true)));
        assert_eq!(v.get("x"), Some(&Value::Number(1.5)));
        assert_eq!(v.get("s").and_then(Value::as_str), Some("hi"));
        assert_eq!(v.get("a").and_then(Value::as_array).map(<[Value]>::len), Some(2));
        assert_eq!(v.get("r").and_then(|r| r.get("k")), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_integer_and_float_compare_equal() {
        assert_eq!(Value::from(json!(10)), Value::from(json!(10.0)));
    }

    #[test]
    fn test_into_json_keeps_integers() {
        let json: serde_json::Value = Value::Number(10.0).into();
        assert_eq!(json, json!(10));
        let json: serde_json::Value = Value::Number(9.1).into();
        assert_eq!(json, json!(9.1));
        let json: serde_json::Value = Value::Number(f64::NAN).into();
        assert_eq!(json, json!(null));
    }

    #[test]
    fn test_serde_roundtrip_through_json_text() {
        let v: Value = serde_json::from_str(r#"{"items": [{"bsn": "111222333"}]}"#).unwrap();
        let text = serde_json::to_string(&v).unwrap();
        assert_eq!(text, r#"{"items":[{"bsn":"111222333"}]}"#);
    }

    #[test]
    fn test_is_blank() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("   ").is_blank());
        assert!(!Value::from("x").is_blank());
        assert!(!Value::Number(0.0).is_blank());
        assert!(!Value::Bool(false).is_blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Number(9.1).to_string(), "9.1");
        assert_eq!(Value::from(vec![Value::from("a"), Value::Null]).to_string(), "[a, null]");
        assert_eq!(
            Value::record([("k", Value::Bool(false))]).to_string(),
            "{k: false}"
        );
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some(3_i64)), Value::Number(3.0));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from(json!([])).type_name(), "array");
        assert_eq!(Value::from(json!({})).type_name(), "record");
    }
}
