use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use namereg_core::{
    LookupParams, MemoryRecordStore, OperationOutcome, PreferredId, PreferredIdResolver,
    RecordSearch, ResolveError,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Shared per-process state handed to every handler
pub struct AppState {
    pub node_id: String,
    pub start_time: Instant,
    pub resolver: PreferredIdResolver,
    /// Set when the collaborator is the in-process store; lets the health
    /// endpoint report how many records are loaded
    pub record_store: Option<Arc<MemoryRecordStore>>,
}

impl AppState {
    /// Wire up state around an opaque search collaborator
    pub fn new(node_id: impl Into<String>, search: Arc<dyn RecordSearch>) -> Self {
        Self {
            node_id: node_id.into(),
            start_time: Instant::now(),
            resolver: PreferredIdResolver::new(search),
            record_store: None,
        }
    }

    /// Wire up state around the in-memory record store
    pub fn with_record_store(node_id: impl Into<String>, store: Arc<MemoryRecordStore>) -> Self {
        Self {
            node_id: node_id.into(),
            start_time: Instant::now(),
            resolver: PreferredIdResolver::new(store.clone()),
            record_store: Some(store),
        }
    }

    fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    fn record_count(&self) -> Option<usize> {
        self.record_store.as_ref().map(|store| store.len())
    }
}

type SharedState = Arc<AppState>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    node_id: String,
    version: &'static str,
    uptime_seconds: u64,
    /// Number of loaded records; absent when the collaborator is remote
    record_count: Option<usize>,
}

/// Classified failure response: HTTP status plus an operation outcome body
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    outcome: OperationOutcome,
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        let status = match &err {
            ResolveError::MissingParameters(_) => StatusCode::BAD_REQUEST,
            ResolveError::NotFound { .. } | ResolveError::UnsupportedType { .. } => {
                StatusCode::NOT_FOUND
            }
            ResolveError::DuplicateEntry { .. } | ResolveError::Search(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            warn!(%err, "preferred-id lookup failed");
        } else {
            debug!(%err, "preferred-id lookup rejected");
        }

        Self {
            status,
            outcome: OperationOutcome::from(&err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.outcome)).into_response()
    }
}

/// Run the HTTP server until it terminates
pub async fn start_server(state: AppState, addr: &str) -> Result<()> {
    let shared = Arc::new(state);
    let app = build_router(shared);
    let listener = bind_listener(addr).await?;
    info!(%addr, "preferred-id service listening");
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")
}

async fn bind_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    let socket_addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("invalid listen address '{addr}'"))?;
    tokio::net::TcpListener::bind(socket_addr)
        .await
        .with_context(|| format!("failed to bind listener on {socket_addr}"))
}

/// Build the service router. Separated from serving so tests can drive it
/// directly.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/NamingSystem/$preferred-id", get(handle_preferred_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        node_id: state.node_id.clone(),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
        record_count: state.record_count(),
    })
}

/// `GET /NamingSystem/$preferred-id?id=<id>&type=<scheme>`
///
/// Query parameters land in a raw map so the core reads them by name and
/// treats an empty value the same as an absent one.
async fn handle_preferred_id(
    State(state): State<SharedState>,
    Query(params): Query<LookupParams>,
) -> Result<Json<PreferredId>, ApiError> {
    let resolved = state.resolver.resolve(&params).await?;
    Ok(Json(resolved))
}
