//! HTTP surface for the preferred-identifier lookup operation.
//!
//! Exposes `GET /NamingSystem/$preferred-id` plus a liveness endpoint; the
//! decision logic lives in `namereg-core`.

pub mod server;


pub use server::{build_router, start_server, AppState};
