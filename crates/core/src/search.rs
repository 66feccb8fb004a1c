//! Search collaborator seam and in-memory substitute
//!
//! The record repository is opaque to this crate; it is consumed only
//! through [`RecordSearch::search`]. Criteria and options model exactly what
//! the resolver sends: a type-scoped value equality search under a read-only
//! interaction scope.

use crate::types::NamingRecord;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;

/// Resource type every lookup is scoped to
pub const NAMING_SYSTEM: &str = "NamingSystem";

/// Protocol/version tag passed to the collaborator
pub const PROTOCOL_VERSION: &str = "Fhir4.0";

/// Repository query: "records of `_type` whose identity-claim value equals
/// `value`". Exactly these two fields, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    #[serde(rename = "_type")]
    pub resource_type: &'static str,
    pub value: String,
}

impl SearchCriteria {
    /// Criteria for a naming-system lookup by identifier value
    pub fn naming_system(value: impl Into<String>) -> Self {
        Self {
            resource_type: NAMING_SYSTEM,
            value: value.into(),
        }
    }
}

/// Interaction scope the collaborator is invoked under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    /// Read-only access to the whole store
    AllRead,
}

/// Options describing the interaction scope of a search call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOptions {
    pub interaction: Interaction,
    pub version: &'static str,
}

impl SearchOptions {
    /// The read-only scope used for every lookup
    pub fn read_only() -> Self {
        Self {
            interaction: Interaction::AllRead,
            version: PROTOCOL_VERSION,
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::read_only()
    }
}

/// Minimal search capability of the record repository.
///
/// Implementations own storage, concurrency control, and transport;
/// failures come back as opaque errors and are surfaced without retry.
#[async_trait]
pub trait RecordSearch: Send + Sync {
    async fn search(
        &self,
        criteria: SearchCriteria,
        options: SearchOptions,
    ) -> anyhow::Result<Vec<NamingRecord>>;
}

/// In-memory record store.
///
/// Backs the node binary and serves as the substitute collaborator in
/// tests. A record matches when any of its claims carries the searched
/// value verbatim.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<NamingRecord>>,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with records
    pub fn with_records(records: Vec<NamingRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Append a record
    pub fn insert(&self, record: NamingRecord) {
        self.records.write().push(record);
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl RecordSearch for MemoryRecordStore {
    async fn search(
        &self,
        criteria: SearchCriteria,
        _options: SearchOptions,
    ) -> anyhow::Result<Vec<NamingRecord>> {
        if criteria.resource_type != NAMING_SYSTEM {
            return Ok(Vec::new());
        }

        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|record| {
                record
                    .unique_ids
                    .iter()
                    .any(|claim| claim.value == criteria.value)
            })
            .cloned()
            .collect())
    }
}
