//! Root object migration

use std::sync::Arc;

use serde::Serialize;

use crate::clients::{SourceRepository, TargetRepository};
use crate::error::{MigrationError, Result};
use crate::model::{ContentModel, Relationship};
use crate::xml;

/// Outcome of migrating a root object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigratedRoot {
    pub pid: String,
    pub label: String,
    pub content_model: ContentModel,
    /// Collection the root was linked into, if the source had one
    pub parent_collection: Option<String>,
}

/// Migrates the root object of a source record
#[derive(Clone)]
pub struct MigrationOrchestrator {
    source: Arc<dyn SourceRepository>,
    target: Arc<dyn TargetRepository>,
}

impl MigrationOrchestrator {
    pub fn new(source: Arc<dyn SourceRepository>, target: Arc<dyn TargetRepository>) -> Self {
        Self { source, target }
    }

    /// Create the root object under the source pid, type it and link it into
    /// the source's collection
    ///
    /// Nothing is rolled back if a relationship assertion fails after the stub
    /// was created.
    pub async fn migrate_root(
        &self,
        pid: &str,
        content_model: ContentModel,
        namespace: &str,
    ) -> Result<MigratedRoot> {
        let object = self.source.object_profile(pid).await?;
        tracing::debug!(pid = %pid, label = %object.label, state = ?object.state, "Fetched object profile");

        let created = self
            .target
            .create_object(&object.label, namespace, Some(pid))
            .await?;
        if created != pid {
            tracing::warn!(requested = %pid, created = %created, "Target allocated a different pid for the root");
        }

        self.target
            .add_relationship(&Relationship::has_model(pid, content_model))
            .await?;

        let parent_collection = self.resolve_parent_collection(pid).await?;
        if let Some(parent) = &parent_collection {
            self.target
                .add_relationship(&Relationship::member_of_collection(pid, parent))
                .await?;
        }

        tracing::info!(
            pid = %pid,
            content_model = %content_model,
            parent = ?parent_collection,
            "Migrated root object"
        );

        Ok(MigratedRoot {
            pid: pid.to_string(),
            label: object.label,
            content_model,
            parent_collection,
        })
    }

    /// Parent collection from the source RELS-EXT
    ///
    /// A missing or unparseable document means "no parent". Transport failures
    /// other than not-found abort the migration.
    pub async fn resolve_parent_collection(&self, pid: &str) -> Result<Option<String>> {
        let Some(document) = self.source.relationships_document(pid).await? else {
            return Ok(None);
        };

        match xml::parse_parent_collection(&document) {
            Ok(parent) => Ok(parent),
            Err(MigrationError::Parse { message }) => {
                tracing::warn!(pid = %pid, error = %message, "Unreadable RELS-EXT, treating as no parent");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
