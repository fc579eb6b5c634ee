//! Migration policies
//!
//! A policy decides, per datastream of a source object, whether it is kept on
//! the migrated root, promoted to its own child object, or dropped. The
//! [`Migrator`] executes those decisions against the repositories.

use serde::Serialize;

use crate::model::{ContentModel, Datastream};

pub mod oral_history;
pub mod runner;

pub use oral_history::OralHistoryPolicy;
pub use runner::{MigrationReport, Migrator};

/// What happens to one datastream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatastreamAction {
    /// Copy onto the migrated root object
    AttachToRoot,
    /// Create a child object holding the datastream
    PromoteToChild,
    /// Never transferred
    Drop,
}

/// Rule set applied to a source object's datastreams
pub trait MigrationPolicy: Send + Sync {
    /// Profile name used in logs and reports
    fn name(&self) -> &'static str;

    /// Content model asserted on the migrated root
    fn root_content_model(&self) -> ContentModel {
        ContentModel::Compound
    }

    /// Exactly one action per datastream
    fn decide(&self, datastream: &Datastream) -> DatastreamAction;
}
