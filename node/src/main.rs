use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use namereg_core::{MemoryRecordStore, NamingRecord};
use namereg_rpc::{start_server, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    Command::new("namereg-node")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Preferred-identifier resolution service for registered naming systems")
        .arg(
            Arg::new("listen")
                .long("listen")
                .value_name("ADDR")
                .default_value("0.0.0.0:4080")
                .help("Socket address the HTTP server binds to"),
        )
        .arg(
            Arg::new("records")
                .long("records")
                .value_name("PATH")
                .help("JSON file of naming-system records to seed the in-memory store"),
        )
        .arg(
            Arg::new("node-id")
                .long("node-id")
                .value_name("ID")
                .default_value("namereg-node")
                .help("Identifier reported by the health endpoint"),
        )
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load seed records from a JSON array of naming-system records
fn load_records(path: &Path) -> Result<Vec<NamingRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read records file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse records file {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let matches = cli().get_matches();
    let listen = matches.get_one::<String>("listen").cloned().unwrap_or_default();
    let node_id = matches
        .get_one::<String>("node-id")
        .cloned()
        .unwrap_or_default();

    let store = Arc::new(MemoryRecordStore::new());
    if let Some(path) = matches.get_one::<String>("records") {
        let records = load_records(Path::new(path))?;
        info!(count = records.len(), path = %path, "seeding record store");
        for record in records {
            store.insert(record);
        }
    }

    let state = AppState::with_record_store(node_id, store);
    start_server(state, &listen).await
}
