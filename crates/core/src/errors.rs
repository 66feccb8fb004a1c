//! Error types for preferred-identifier resolution

use serde::Serialize;
use thiserror::Error;

/// A single failed validation check on a named request parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Parameter name the check ran against
    pub field: String,
    /// Human-readable detail
    pub message: String,
}

impl FieldError {
    /// The parameter is absent or empty
    pub fn missing(field: &str) -> Self {
        Self {
            field: field.to_string(),
            message: format!("Parameter '{field}' is missing."),
        }
    }
}

#[derive(Error, Debug)]
pub enum ResolveError {
    /// One or more required request parameters are absent or empty.
    /// Every failing parameter is reported, not just the first.
    #[error("missing required parameters")]
    MissingParameters(Vec<FieldError>),

    #[error("The NamingSystem for 'id={id}' is not found.")]
    NotFound { id: String },

    /// More than one record matched the identifier. A registry integrity
    /// problem, not a client error.
    #[error("There seems to be a duplicate entry for 'id={id}'")]
    DuplicateEntry { id: String },

    /// The matched record carries no claim for the requested scheme
    #[error("The NamingSystem does not contain a definition for 'type={scheme}'.")]
    UnsupportedType { scheme: String },

    /// The search collaborator itself failed. Surfaced as-is, never retried.
    #[error("registry search failed: {0}")]
    Search(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
