//! HTTP API handlers for repomig

pub mod health;
pub mod migrate;

pub use health::health_routes;
pub use migrate::migrate_routes;
