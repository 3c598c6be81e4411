//! Raw input records as supplied by a form or a JSON file.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single raw field value.
///
/// Form inputs arrive as text, rating widgets and JSON files may supply
/// numbers directly. Blank text is treated as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    /// A numeric value.
    Number(f64),
    /// A textual value, possibly numeric-looking.
    Text(String),
}

/// Outcome of interpreting an [`InputValue`] as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput<'a> {
    /// No value, or only whitespace.
    Missing,
    /// A finite number.
    Value(f64),
    /// Text that does not parse as a finite number.
    Invalid(&'a str),
}

impl InputValue {
    /// Interpret this value as a number.
    #[must_use]
    pub fn numeric(&self) -> NumericInput<'_> {
        match self {
            InputValue::Number(n) if n.is_finite() => NumericInput::Value(*n),
            InputValue::Number(_) => NumericInput::Invalid("non-finite"),
            InputValue::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return NumericInput::Missing;
                }
                match trimmed.parse::<f64>() {
                    Ok(v) if v.is_finite() => NumericInput::Value(v),
                    _ => NumericInput::Invalid(trimmed),
                }
            }
        }
    }

    /// Return `true` if this is blank text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, InputValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Number(n) => write!(f, "{n}"),
            InputValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Number(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::Text(value)
    }
}

/// A raw questionnaire record: column name → value.
///
/// Absent keys, JSON `null` and blank strings all mean "missing".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<InputValue>>",
    into = "BTreeMap<String, InputValue>"
)]
pub struct Record {
    fields: BTreeMap<String, InputValue>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<InputValue>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Builder-style variant of [`Record::insert`].
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Return the value for `column`, treating blank text as missing.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&InputValue> {
        self.fields.get(column).filter(|v| !v.is_blank())
    }

    /// Return the number of populated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.values().filter(|v| !v.is_blank()).count()
    }

    /// Return `true` if no field is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<BTreeMap<String, Option<InputValue>>> for Record {
    fn from(raw: BTreeMap<String, Option<InputValue>>) -> Self {
        let fields = raw
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
        Self { fields }
    }
}

impl From<Record> for BTreeMap<String, InputValue> {
    fn from(record: Record) -> Self {
        record.fields
    }
}

impl<K: Into<String>, V: Into<InputValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { fields }
    }
}
