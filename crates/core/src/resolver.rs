//! Preferred-identifier resolver
//!
//! Sequences validation, repository lookup, and claim selection. Each stage
//! short-circuits: the first failure becomes the request's one and only
//! outcome, and no later stage runs.

use crate::errors::{FieldError, ResolveError, Result};
use crate::search::{RecordSearch, SearchCriteria, SearchOptions};
use crate::types::{LookupParams, LookupRequest, NamingRecord, PreferredId};
use std::sync::Arc;
use tracing::debug;

/// Required request parameters, checked independently
const REQUIRED_PARAMS: [&str; 2] = ["id", "type"];

/// Resolves a naming system's preferred identifier through an injected
/// search collaborator.
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Clone)]
pub struct PreferredIdResolver {
    search: Arc<dyn RecordSearch>,
}

impl PreferredIdResolver {
    /// Create a resolver backed by the given search collaborator
    pub fn new(search: Arc<dyn RecordSearch>) -> Self {
        Self { search }
    }

    /// Resolve the preferred identifier for the given request parameters.
    ///
    /// Validation, lookup, and selection run in order; the first failure is
    /// returned immediately.
    pub async fn resolve(&self, params: &LookupParams) -> Result<PreferredId> {
        let request = Self::validate(params).map_err(ResolveError::MissingParameters)?;
        let record = self.lookup(&request.id).await?;
        let value = Self::select(&record, &request.scheme)?;
        Ok(PreferredId { result: value })
    }

    /// Check that `id` and `type` are both present and non-empty.
    ///
    /// The checks run independently so that every missing parameter is
    /// reported, not just the first. Pure, no side effects.
    pub fn validate(params: &LookupParams) -> std::result::Result<LookupRequest, Vec<FieldError>> {
        let mut errors = Vec::new();
        for field in REQUIRED_PARAMS {
            match params.get(field) {
                Some(value) if !value.is_empty() => {}
                _ => errors.push(FieldError::missing(field)),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        // Both reads are infallible after the loop above.
        Ok(LookupRequest {
            id: params.get("id").unwrap_or_default().to_string(),
            scheme: params.get("type").unwrap_or_default().to_string(),
        })
    }

    /// Search the repository for the record registered under `id` and
    /// classify the hit count: zero is not-found, more than one is a
    /// registry integrity error.
    pub async fn lookup(&self, id: &str) -> Result<NamingRecord> {
        let criteria = SearchCriteria::naming_system(id);
        let mut records = self
            .search
            .search(criteria, SearchOptions::read_only())
            .await?;

        debug!(id, hits = records.len(), "naming system lookup");

        match records.len() {
            0 => Err(ResolveError::NotFound { id: id.to_string() }),
            1 => Ok(records.remove(0)),
            _ => Err(ResolveError::DuplicateEntry { id: id.to_string() }),
        }
    }

    /// Pick the first claim whose scheme matches the requested one,
    /// case-insensitively, and return its value verbatim.
    ///
    /// Claims are scanned in storage order; if a record carries duplicate
    /// schemes the first one wins.
    pub fn select(record: &NamingRecord, scheme: &str) -> Result<String> {
        record
            .unique_ids
            .iter()
            .find(|claim| claim.scheme.matches(scheme))
            .map(|claim| claim.value.clone())
            .ok_or_else(|| ResolveError::UnsupportedType {
                scheme: scheme.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MemoryRecordStore;
    use crate::types::{IdentifierClaim, IdentifierScheme};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Records every criteria/options pair it is called with
    #[derive(Default)]
    struct RecordingSearch {
        calls: Mutex<Vec<(SearchCriteria, SearchOptions)>>,
        results: Vec<NamingRecord>,
    }

    #[async_trait]
    impl RecordSearch for RecordingSearch {
        async fn search(
            &self,
            criteria: SearchCriteria,
            options: SearchOptions,
        ) -> anyhow::Result<Vec<NamingRecord>> {
            self.calls.lock().push((criteria, options));
            Ok(self.results.clone())
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl RecordSearch for FailingSearch {
        async fn search(
            &self,
            _criteria: SearchCriteria,
            _options: SearchOptions,
        ) -> anyhow::Result<Vec<NamingRecord>> {
            Err(anyhow!("repository unavailable"))
        }
    }

    fn record_with_uri_and_oid() -> NamingRecord {
        NamingRecord::new(vec![
            IdentifierClaim::new(IdentifierScheme::Uri, "uriValue"),
            IdentifierClaim::new(IdentifierScheme::Oid, "oidValue"),
        ])
    }

    fn params(pairs: &[(&str, &str)]) -> LookupParams {
        LookupParams::from_pairs(pairs.iter().copied())
    }

    #[tokio::test]
    async fn missing_both_parameters_reports_two_errors() {
        let resolver = PreferredIdResolver::new(Arc::new(MemoryRecordStore::new()));
        let err = resolver.resolve(&LookupParams::new()).await.unwrap_err();

        match err {
            ResolveError::MissingParameters(fields) => {
                assert_eq!(fields.len(), 2);
                assert!(fields
                    .iter()
                    .any(|f| f.message == "Parameter 'id' is missing."));
                assert!(fields
                    .iter()
                    .any(|f| f.message == "Parameter 'type' is missing."));
            }
            other => panic!("expected MissingParameters, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_parameter_counts_as_missing() {
        let resolver = PreferredIdResolver::new(Arc::new(MemoryRecordStore::new()));
        let err = resolver
            .resolve(&params(&[("id", ""), ("type", "oid")]))
            .await
            .unwrap_err();

        match err {
            ResolveError::MissingParameters(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "id");
            }
            other => panic!("expected MissingParameters, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn validation_failure_skips_search() {
        let search = Arc::new(RecordingSearch::default());
        let resolver = PreferredIdResolver::new(search.clone());

        let _ = resolver.resolve(&LookupParams::new()).await;
        assert!(search.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn lookup_builds_exact_criteria() {
        let search = Arc::new(RecordingSearch {
            results: vec![record_with_uri_and_oid()],
            ..Default::default()
        });
        let resolver = PreferredIdResolver::new(search.clone());

        resolver
            .resolve(&params(&[("id", "idValue"), ("type", "typeValue")]))
            .await
            .unwrap_err();

        let calls = search.calls.lock();
        assert_eq!(calls.len(), 1);
        let (criteria, options) = &calls[0];
        assert_eq!(criteria, &SearchCriteria::naming_system("idValue"));
        assert_eq!(criteria.resource_type, "NamingSystem");
        assert_eq!(criteria.value, "idValue");
        assert_eq!(options, &SearchOptions::read_only());
    }

    #[tokio::test]
    async fn zero_hits_is_not_found() {
        let resolver = PreferredIdResolver::new(Arc::new(MemoryRecordStore::new()));
        let err = resolver
            .resolve(&params(&[("id", "idValue"), ("type", "oid")]))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::NotFound { id } if id == "idValue"));
    }

    #[tokio::test]
    async fn two_hits_is_a_duplicate_entry() {
        let store = MemoryRecordStore::new();
        store.insert(NamingRecord::new(vec![IdentifierClaim::new(
            IdentifierScheme::Uri,
            "idValue",
        )]));
        store.insert(NamingRecord::new(vec![IdentifierClaim::new(
            IdentifierScheme::Oid,
            "idValue",
        )]));
        let resolver = PreferredIdResolver::new(Arc::new(store));

        let err = resolver
            .resolve(&params(&[("id", "idValue"), ("type", "oid")]))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::DuplicateEntry { id } if id == "idValue"));
    }

    #[tokio::test]
    async fn resolves_requested_scheme_value() {
        let store = MemoryRecordStore::new();
        store.insert(NamingRecord::new(vec![
            IdentifierClaim::new(IdentifierScheme::Uri, "idValue"),
            IdentifierClaim::new(IdentifierScheme::Oid, "oidValue"),
        ]));
        let resolver = PreferredIdResolver::new(Arc::new(store));

        let resolved = resolver
            .resolve(&params(&[("id", "idValue"), ("type", "oid")]))
            .await
            .unwrap();
        assert_eq!(resolved.result, "oidValue");
    }

    #[tokio::test]
    async fn requested_scheme_matches_case_insensitively() {
        let store = MemoryRecordStore::new();
        store.insert(NamingRecord::new(vec![
            IdentifierClaim::new(IdentifierScheme::Uri, "idValue"),
            IdentifierClaim::new(IdentifierScheme::Oid, "oidValue"),
        ]));
        let resolver = PreferredIdResolver::new(Arc::new(store));

        let resolved = resolver
            .resolve(&params(&[("id", "idValue"), ("type", "OID")]))
            .await
            .unwrap();
        assert_eq!(resolved.result, "oidValue");
    }

    #[tokio::test]
    async fn unmatched_scheme_is_unsupported_type() {
        let store = MemoryRecordStore::new();
        store.insert(NamingRecord::new(vec![IdentifierClaim::new(
            IdentifierScheme::Uri,
            "idValue",
        )]));
        let resolver = PreferredIdResolver::new(Arc::new(store));

        let err = resolver
            .resolve(&params(&[("id", "idValue"), ("type", "oid")]))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::UnsupportedType { scheme } if scheme == "oid"));
    }

    #[tokio::test]
    async fn duplicate_scheme_takes_first_claim() {
        let store = MemoryRecordStore::new();
        store.insert(NamingRecord::new(vec![
            IdentifierClaim::new(IdentifierScheme::Oid, "idValue"),
            IdentifierClaim::new(IdentifierScheme::Oid, "secondOid"),
        ]));
        let resolver = PreferredIdResolver::new(Arc::new(store));

        let resolved = resolver
            .resolve(&params(&[("id", "idValue"), ("type", "oid")]))
            .await
            .unwrap();
        assert_eq!(resolved.result, "idValue");
    }

    #[tokio::test]
    async fn collaborator_failure_surfaces_as_search_error() {
        let resolver = PreferredIdResolver::new(Arc::new(FailingSearch));
        let err = resolver
            .resolve(&params(&[("id", "idValue"), ("type", "oid")]))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Search(_)));
    }

    #[tokio::test]
    async fn repeated_request_yields_identical_envelope() {
        let store = MemoryRecordStore::new();
        store.insert(record_with_uri_and_oid().named("example"));
        let resolver = PreferredIdResolver::new(Arc::new(store));
        let request = params(&[("id", "uriValue"), ("type", "oid")]);

        let first = resolver.resolve(&request).await.unwrap();
        let second = resolver.resolve(&request).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.result, "oidValue");
    }
}
