//! Types for naming-system records and lookup requests

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier scheme of a single claim within a naming-system record.
///
/// The scheme set is closed over the representations the registry knows
/// about; anything else lands in [`IdentifierScheme::Other`] so that records
/// with unknown schemes still round-trip. The textual mapping is lower-case
/// and parsing accepts any case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IdentifierScheme {
    /// URI representation (e.g. `http://hl7.org/fhir/sid/icd-10`)
    Uri,
    /// OID representation (e.g. `2.16.840.1.113883.6.3`)
    Oid,
    /// UUID representation
    Uuid,
    /// Any scheme outside the known set, stored lower-cased
    Other(String),
}

impl IdentifierScheme {
    /// Parse a scheme name, case-insensitively. Never fails; unknown names
    /// become [`IdentifierScheme::Other`].
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "uri" => IdentifierScheme::Uri,
            "oid" => IdentifierScheme::Oid,
            "uuid" => IdentifierScheme::Uuid,
            other => IdentifierScheme::Other(other.to_string()),
        }
    }

    /// Lower-case textual form of the scheme.
    pub fn as_str(&self) -> &str {
        match self {
            IdentifierScheme::Uri => "uri",
            IdentifierScheme::Oid => "oid",
            IdentifierScheme::Uuid => "uuid",
            IdentifierScheme::Other(name) => name,
        }
    }

    /// Whether this scheme matches a requested scheme name,
    /// case-insensitively on both sides.
    pub fn matches(&self, requested: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(requested)
    }
}

impl fmt::Display for IdentifierScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for IdentifierScheme {
    fn from(name: String) -> Self {
        IdentifierScheme::parse(&name)
    }
}

impl From<IdentifierScheme> for String {
    fn from(scheme: IdentifierScheme) -> Self {
        scheme.as_str().to_string()
    }
}

/// One (scheme, value) pair within a naming-system record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierClaim {
    /// Identifier scheme of this claim
    pub scheme: IdentifierScheme,
    /// Identifier value, returned verbatim on resolution
    pub value: String,
}

impl IdentifierClaim {
    /// Create a new claim
    pub fn new(scheme: IdentifierScheme, value: impl Into<String>) -> Self {
        Self {
            scheme,
            value: value.into(),
        }
    }
}

/// One registered naming system.
///
/// Claims are ordered; per-scheme uniqueness is the registry's concern and
/// is not enforced here. Resolution takes the first matching claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingRecord {
    /// Human-readable name of the naming system, if the registry has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Equivalent identifier representations, in storage order
    pub unique_ids: Vec<IdentifierClaim>,
}

impl NamingRecord {
    /// Create a record from its identifier claims
    pub fn new(unique_ids: Vec<IdentifierClaim>) -> Self {
        Self {
            name: None,
            unique_ids,
        }
    }

    /// Attach a human-readable name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Raw named parameters of a lookup request.
///
/// Parameters are read by name, not by position, and an empty value counts
/// the same as an absent one during validation.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct LookupParams(pub HashMap<String, String>);

impl LookupParams {
    /// Empty parameter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a parameter map from (name, value) pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a parameter by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// A lookup request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Internal identifier of the naming system, matched verbatim
    pub id: String,
    /// Requested identifier scheme, matched case-insensitively
    pub scheme: String,
}

/// Success envelope of a resolved lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredId {
    /// The identifier value in the requested scheme
    pub result: String,
}
