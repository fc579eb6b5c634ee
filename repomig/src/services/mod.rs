//! Migration services
//!
//! - `classifier`: MIME type → content model
//! - `transferer`: one datastream onto one target object
//! - `promoter`: datastream → new constituent object
//! - `orchestrator`: root object stub, model and collection

pub mod classifier;
pub mod orchestrator;
pub mod promoter;
pub mod transferer;

pub use classifier::classify;
pub use orchestrator::{MigratedRoot, MigrationOrchestrator};
pub use promoter::{ChildObjectPromoter, PromotedChild};
pub use transferer::DatastreamTransferer;
