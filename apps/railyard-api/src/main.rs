//! Railyard API - Component Catalog Service
//!
//! HTTP service exposing CRUD and bulk operations over the component
//! catalog, with idempotent, transactional writes.

mod dto;
mod handlers;
mod routes;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use railyard_domain::catalog::ComponentService;
use railyard_memstore::{MemoryComponentStore, MemoryIdempotencyStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub components: Arc<ComponentService<MemoryComponentStore, MemoryIdempotencyStore>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting Railyard catalog service");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Seed the catalog unless explicitly disabled
    let seed = std::env::var("RAILYARD_SEED")
        .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
        .unwrap_or(true);

    let store = if seed {
        info!("Loading seed catalog");
        MemoryComponentStore::with_seed()
    } else {
        MemoryComponentStore::new()
    };

    // Create the write pipeline over the in-process adapters
    let service = ComponentService::with_defaults(store, MemoryIdempotencyStore::new());

    // Create shared application state
    let state = AppState {
        components: Arc::new(service),
    };

    // Build HTTP router
    let app = routes::create_router(state);

    // Get bind address from environment
    let host = std::env::var("RAILYARD_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("RAILYARD_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    info!(addr = %addr, "Starting HTTP server");

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
