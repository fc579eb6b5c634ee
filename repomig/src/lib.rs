//! repomig library interface
//!
//! Migrates objects from a Fedora 3.4 repository into an Islandora 7.x
//! (Fedora 3.7) repository, rebuilding compound objects and their
//! content-model and collection relationships.

pub mod api;
pub mod clients;
pub mod error;
pub mod logging;
pub mod model;
pub mod policy;
pub mod services;
pub mod xml;

pub use crate::error::{ApiError, ApiResult, MigrationError};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::policy::Migrator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Executes migrations against the configured repositories
    pub migrator: Arc<Migrator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last migration failure for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
    /// Outcomes of requests handled since startup
    pub outcomes: Arc<MigrationOutcomes>,
}

impl AppState {
    pub fn new(migrator: Migrator) -> Self {
        Self {
            migrator: Arc::new(migrator),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
            outcomes: Arc::new(MigrationOutcomes::default()),
        }
    }
}

/// Per-process tally of migration requests
#[derive(Debug, Default)]
pub struct MigrationOutcomes {
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl MigrationOutcomes {
    pub fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::migrate_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
