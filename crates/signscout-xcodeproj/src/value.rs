//! Tagged property-list value.
//!
//! Both plist dialects used by Xcode (the OpenStep `.pbxproj` form and the
//! XML form) decode into this one type, so downstream lookups match
//! exhaustively instead of probing a dynamically-typed blob.

use std::collections::BTreeMap;

/// A property-list value.
///
/// OpenStep plists only produce `String`, `Array` and `Dict`; the XML dialect
/// adds `Bool` and `Integer`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Integer(i64),
    Array(Vec<Value>),
    Dict(BTreeMap<String, Value>),
}

impl Value {
    /// The string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Dictionary member lookup; `None` for non-dicts and missing keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict().and_then(|d| d.get(key))
    }

    /// Dictionary member lookup yielding the string content.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Render this value the way build settings are compared: strings as-is,
    /// arrays space-joined, booleans as `YES`/`NO`.
    pub fn to_setting_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Bool(true) => "YES".to_string(),
            Value::Bool(false) => "NO".to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Array(items) => items
                .iter()
                .map(Value::to_setting_string)
                .collect::<Vec<_>>()
                .join(" "),
            Value::Dict(_) => String::new(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
