// File: src/error.rs
// Purpose: Errors raised while building a form. Validation failures are data, see schema::ErrorMap.

use crate::field::FieldType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Duplicate field key: {0}")]
    DuplicateKey(String),

    #[error("Field '{key}' of type {field_type} needs at least one option")]
    MissingOptions { key: String, field_type: FieldType },

    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),
}
