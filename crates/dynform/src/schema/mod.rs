// File: src/schema/mod.rs
// Purpose: Validation schema interface and error data consumed by forms

use crate::value::ValueMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod rules;

pub use rules::{BoolRule, FileRule, ListRule, NumberRule, Rule, RuleSchema, TextRule};

/// Field keys mapped to the errors a schema reported for them
pub type ErrorMap = BTreeMap<String, FieldErrors>;

/// One structured validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors stored for one key.
///
/// File fields keep a sequence (one entry per offending file); every other
/// field keeps a single error object. Readers must pick the accessor matching
/// the field type: [`FieldErrors::first_message`] for files,
/// [`FieldErrors::message`] for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldErrors {
    Single(FieldError),
    Many(Vec<FieldError>),
}

impl FieldErrors {
    pub fn single(message: impl Into<String>) -> Self {
        FieldErrors::Single(FieldError::new(message))
    }

    pub fn many<I, M>(messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        FieldErrors::Many(messages.into_iter().map(FieldError::new).collect())
    }

    /// Message of a single error object. `None` when a sequence is stored.
    pub fn message(&self) -> Option<&str> {
        match self {
            FieldErrors::Single(error) => Some(&error.message),
            FieldErrors::Many(_) => None,
        }
    }

    /// Message of the first entry of a stored sequence. `None` for a single object.
    pub fn first_message(&self) -> Option<&str> {
        match self {
            FieldErrors::Single(_) => None,
            FieldErrors::Many(errors) => errors.first().map(|error| error.message.as_str()),
        }
    }

    pub fn messages(&self) -> Vec<&str> {
        match self {
            FieldErrors::Single(error) => vec![error.message.as_str()],
            FieldErrors::Many(errors) => errors.iter().map(|e| e.message.as_str()).collect(),
        }
    }
}

/// Validates the collected value map of a form.
///
/// Returns the accepted values, or the errors keyed by field. Validation never
/// panics or errors out of band: a rejected submission is just an `Err` map.
pub trait Schema {
    fn validate(&self, values: &ValueMap) -> Result<ValueMap, ErrorMap>;
}

impl<F> Schema for F
where
    F: Fn(&ValueMap) -> Result<ValueMap, ErrorMap>,
{
    fn validate(&self, values: &ValueMap) -> Result<ValueMap, ErrorMap> {
        self(values)
    }
}
