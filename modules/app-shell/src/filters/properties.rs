use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::FilterError;

/// One property predicate of a filter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub key: String,
    /// Absent on valueless predicates such as `is_set`.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Other predicate fields (`type`, ...) carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PropertyFilter {
    /// Plain equality predicate.
    #[must_use]
    pub fn equals(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
            operator: None,
            extra: Map::new(),
        }
    }

    /// An empty operator string counts as no operator.
    #[must_use]
    pub fn has_operator(&self) -> bool {
        self.operator.as_deref().is_some_and(|op| !op.is_empty())
    }

    fn is_equality_on(&self, key: &str, value: &Value) -> bool {
        self.key == key && &self.value == value && !self.has_operator()
    }
}

/// Value a link filters on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    Number(Number),
}

impl PropertyValue {
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) => Value::Number(number.clone()),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for PropertyValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// Normalize a raw `properties` member into an ordered predicate list.
///
/// Accepts a list of predicates, a JSON string holding either supported
/// form, the legacy `{"key__operator": value}` object, or null.
///
/// # Errors
///
/// Returns [`FilterError`] when a string does not hold JSON, a list entry is
/// not a predicate, or the value has some other shape.
pub fn parse_properties(raw: &Value) -> Result<Vec<PropertyFilter>, FilterError> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Ok(Vec::<PropertyFilter>::deserialize(raw)?),
        Value::Object(legacy) => Ok(legacy
            .iter()
            .map(|(compound, value)| legacy_entry(compound, value))
            .collect()),
        Value::String(text) if text.trim().is_empty() => Ok(Vec::new()),
        Value::String(text) => match serde_json::from_str::<Value>(text)? {
            nested @ (Value::Array(_) | Value::Object(_) | Value::Null) => {
                parse_properties(&nested)
            }
            _ => Err(FilterError::UnsupportedShape("a JSON scalar")),
        },
        Value::Bool(_) => Err(FilterError::UnsupportedShape("a boolean")),
        Value::Number(_) => Err(FilterError::UnsupportedShape("a number")),
    }
}

fn legacy_entry(compound: &str, value: &Value) -> PropertyFilter {
    let (key, operator) = match compound.split_once("__") {
        Some((key, operator)) => (key, Some(operator.to_owned())),
        None => (compound, None),
    };
    let mut extra = Map::new();
    extra.insert("type".to_owned(), Value::String("event".to_owned()));
    PropertyFilter {
        key: key.to_owned(),
        value: value.clone(),
        operator,
        extra,
    }
}

/// Toggle the equality predicate `key = value`.
///
/// Existing operator-less matches are removed; otherwise a new predicate is
/// appended. Operator-qualified predicates are never removed. The order of
/// the remaining entries is preserved.
#[must_use]
pub fn toggle_property(
    properties: &[PropertyFilter],
    key: &str,
    value: &Value,
) -> Vec<PropertyFilter> {
    if properties.iter().any(|p| p.is_equality_on(key, value)) {
        properties
            .iter()
            .filter(|p| !p.is_equality_on(key, value))
            .cloned()
            .collect()
    } else {
        let mut next = properties.to_vec();
        next.push(PropertyFilter::equals(key, value.clone()));
        next
    }
}
