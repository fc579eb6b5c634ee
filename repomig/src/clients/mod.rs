//! Repository clients
//!
//! The migration services only see these two traits. Production
//! implementations talk to Fedora REST APIs over HTTP with basic auth;
//! tests substitute in-memory repositories.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Datastream, DatastreamControl, DatastreamRecord, Relationship, SourceObject};

pub mod fedora_source;
pub mod http;
pub mod islandora_target;

pub use fedora_source::FedoraSourceClient;
pub use islandora_target::IslandoraTargetClient;

/// Read-only access to the legacy repository
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Object profile (label, state)
    async fn object_profile(&self, pid: &str) -> Result<SourceObject>;

    /// Datastream listing in repository order
    async fn list_datastreams(&self, pid: &str) -> Result<Vec<Datastream>>;

    /// Control group and state of one datastream
    async fn datastream_control(&self, pid: &str, dsid: &str) -> Result<DatastreamControl>;

    /// Raw datastream payload
    async fn datastream_content(&self, pid: &str, dsid: &str) -> Result<Vec<u8>>;

    /// Raw RELS-EXT document, `None` if the object has none
    async fn relationships_document(&self, pid: &str) -> Result<Option<String>>;
}

/// Write access to the successor repository
#[async_trait]
pub trait TargetRepository: Send + Sync {
    /// Create an object stub and return its pid
    ///
    /// With `pid` set the object is created under that pid, otherwise the
    /// repository allocates the next pid in `namespace`.
    async fn create_object(&self, label: &str, namespace: &str, pid: Option<&str>) -> Result<String>;

    /// Assert one relationship
    async fn add_relationship(&self, relationship: &Relationship) -> Result<()>;

    /// Create a datastream on an existing object
    async fn add_datastream(&self, pid: &str, record: &DatastreamRecord, content: Vec<u8>) -> Result<()>;
}
