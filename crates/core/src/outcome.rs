//! Operation outcome shaping
//!
//! Every failed lookup is reported to the caller as an outcome carrying one
//! issue per problem. The issue details for the known failure classes match
//! the registry's established wording, so callers can rely on them.

use crate::errors::ResolveError;
use serde::{Deserialize, Serialize};

/// Severity of a reported issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
    Information,
}

/// Classification of a reported issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// The request itself is invalid (missing or unusable parameter)
    Invalid,
    /// The addressed naming system was not found
    NotFound,
    /// An internal failure: registry inconsistency or collaborator error
    Exception,
}

/// One issue within an operation outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: IssueSeverity,
    pub code: IssueKind,
    pub details: String,
}

impl Issue {
    /// An error-severity issue
    pub fn error(code: IssueKind, details: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code,
            details: details.into(),
        }
    }
}

/// Structured failure payload of a lookup: one or more classified issues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub issues: Vec<Issue>,
}

impl OperationOutcome {
    /// Outcome holding a single issue
    pub fn single(issue: Issue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

impl From<&ResolveError> for OperationOutcome {
    fn from(err: &ResolveError) -> Self {
        match err {
            ResolveError::MissingParameters(fields) => Self {
                issues: fields
                    .iter()
                    .map(|f| Issue::error(IssueKind::Invalid, f.message.clone()))
                    .collect(),
            },
            ResolveError::NotFound { .. } => {
                Self::single(Issue::error(IssueKind::NotFound, err.to_string()))
            }
            ResolveError::UnsupportedType { .. } => {
                Self::single(Issue::error(IssueKind::Invalid, err.to_string()))
            }
            ResolveError::DuplicateEntry { .. } | ResolveError::Search(_) => {
                Self::single(Issue::error(IssueKind::Exception, err.to_string()))
            }
        }
    }
}
