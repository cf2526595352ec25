//! Message metadata: key-value fields and owned error copies
//!
//! This module provides:
//! - `MetaValue`: a single metadata value
//! - `Meta`: the ordered field map carried by every message
//! - `ErrorInfo`: an owned snapshot of a `std::error::Error`
//! - `MetaArg`: one element of the variadic metadata passed to `log()`

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Owned copy of an error: its message and the rendered `source()` chain.
///
/// Errors are not `Clone` in general, so messages keep this snapshot
/// instead of the original value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    pub stack: String,
}

impl ErrorInfo {
    /// Create an error snapshot from a plain message
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            stack: format!("Error: {}", message),
            message,
        }
    }

    /// Capture an error and every error in its `source()` chain
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let message = err.to_string();
        let mut stack = format!("Error: {}", message);
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        Self { message, stack }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Value type for metadata fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Error(ErrorInfo),
    Map(Meta),
    Null,
}

impl MetaValue {
    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            MetaValue::String(s) => serde_json::Value::String(s.clone()),
            MetaValue::Int(i) => serde_json::Value::Number((*i).into()),
            MetaValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            MetaValue::Bool(b) => serde_json::Value::Bool(*b),
            MetaValue::Error(e) => serde_json::json!({ "message": e.message, "stack": e.stack }),
            MetaValue::Map(m) => m.to_json_value(),
            MetaValue::Null => serde_json::Value::Null,
        }
    }

    /// Whether the value counts as "provided" (`reqId: ""` does not)
    pub fn is_present(&self) -> bool {
        match self {
            MetaValue::String(s) => !s.is_empty(),
            MetaValue::Bool(b) => *b,
            MetaValue::Int(i) => *i != 0,
            MetaValue::Null => false,
            _ => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::String(s) => write!(f, "{}", s),
            MetaValue::Int(i) => write!(f, "{}", i),
            MetaValue::Float(fl) => write!(f, "{}", fl),
            MetaValue::Bool(b) => write!(f, "{}", b),
            MetaValue::Error(e) => write!(f, "{}", e),
            MetaValue::Map(m) => write!(f, "{{{}}}", m.format_fields()),
            MetaValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::String(s)
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::String(s.to_string())
    }
}

impl From<i64> for MetaValue {
    fn from(i: i64) -> Self {
        MetaValue::Int(i)
    }
}

impl From<i32> for MetaValue {
    fn from(i: i32) -> Self {
        MetaValue::Int(i as i64)
    }
}

impl From<u32> for MetaValue {
    fn from(i: u32) -> Self {
        MetaValue::Int(i as i64)
    }
}

impl From<f64> for MetaValue {
    fn from(f: f64) -> Self {
        MetaValue::Float(f)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

impl From<ErrorInfo> for MetaValue {
    fn from(e: ErrorInfo) -> Self {
        MetaValue::Error(e)
    }
}

impl From<Meta> for MetaValue {
    fn from(m: Meta) -> Self {
        MetaValue::Map(m)
    }
}

/// Ordered metadata fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Meta {
    fields: BTreeMap<String, MetaValue>,
}

impl Meta {
    /// Create empty metadata
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Add a field
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<MetaValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field (mutable version)
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<MetaValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Get all fields
    pub fn fields(&self) -> &BTreeMap<String, MetaValue> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Shallow merge: fields of `other` overwrite same-named fields
    pub fn merge(&mut self, other: Meta) {
        self.fields.extend(other.fields);
    }

    /// Format fields as key=value pairs
    pub fn format_fields(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json_value()))
                .collect(),
        )
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl<K: Into<String>, V: Into<MetaValue>> FromIterator<(K, V)> for Meta {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One element of the metadata passed to `log()`
#[derive(Debug, Clone)]
pub enum MetaArg {
    /// A field map, shallow-merged into the message metadata
    Map(Meta),
    /// An error, merged as `{ error: <ErrorInfo> }`
    Error(ErrorInfo),
    /// A bare primitive; it has no key and contributes nothing
    Value(MetaValue),
}

impl MetaArg {
    /// Normalize into the fields this argument contributes
    pub(crate) fn into_meta(self) -> Option<Meta> {
        match self {
            MetaArg::Map(meta) => Some(meta),
            MetaArg::Error(err) => Some(Meta::new().with_field("error", err)),
            MetaArg::Value(_) => None,
        }
    }
}

impl From<Meta> for MetaArg {
    fn from(meta: Meta) -> Self {
        MetaArg::Map(meta)
    }
}

impl From<ErrorInfo> for MetaArg {
    fn from(err: ErrorInfo) -> Self {
        MetaArg::Error(err)
    }
}

impl From<MetaValue> for MetaArg {
    fn from(value: MetaValue) -> Self {
        MetaArg::Value(value)
    }
}

/// Empty metadata list, for calls without metadata
pub const NO_META: [MetaArg; 0] = [];

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "request failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_meta_with_fields() {
        let meta = Meta::new()
            .with_field("user_id", 123)
            .with_field("username", "john_doe")
            .with_field("active", true);

        assert_eq!(meta.len(), 3);
        assert_eq!(meta.get("username"), Some(&MetaValue::from("john_doe")));
    }

    #[test]
    fn test_meta_format_is_ordered() {
        let meta = Meta::new().with_field("b", 2).with_field("a", "x");
        assert_eq!(meta.format_fields(), "a=x b=2");
    }

    #[test]
    fn test_merge_overwrites() {
        let mut meta = Meta::new().with_field("notify", true).with_field("a", 1);
        meta.merge(Meta::new().with_field("notify", false));

        assert_eq!(meta.get("notify"), Some(&MetaValue::Bool(false)));
        assert_eq!(meta.get("a"), Some(&MetaValue::Int(1)));
    }

    #[test]
    fn test_error_info_captures_source_chain() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timeout"));
        let info = ErrorInfo::from_error(&err);

        assert_eq!(info.message, "request failed");
        assert!(info.stack.starts_with("Error: request failed"));
        assert!(info.stack.contains("caused by: upstream timeout"));
    }

    #[test]
    fn test_meta_arg_normalization() {
        let err = MetaArg::from(ErrorInfo::new("boom")).into_meta().unwrap();
        assert!(matches!(err.get("error"), Some(MetaValue::Error(e)) if e.message == "boom"));

        assert!(MetaArg::from(MetaValue::Int(5)).into_meta().is_none());
    }

    #[test]
    fn test_json_rendering() {
        let meta = Meta::new()
            .with_field("count", 3)
            .with_field("nested", Meta::new().with_field("ok", true));

        let json = meta.to_json_value();
        assert_eq!(json["count"], 3);
        assert_eq!(json["nested"]["ok"], true);
        assert_eq!(serde_json::to_value(&meta).unwrap(), json);
    }
}
