//! Executes a policy against one source object

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use super::{DatastreamAction, MigrationPolicy};
use crate::clients::{SourceRepository, TargetRepository};
use crate::error::{MigrationError, Result};
use crate::services::{
    ChildObjectPromoter, DatastreamTransferer, MigratedRoot, MigrationOrchestrator, PromotedChild,
};

/// Everything one successful migration created
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    /// Identifies the run in logs
    pub run_id: Uuid,
    pub policy: String,
    pub root: MigratedRoot,
    /// Datastreams copied onto the root
    pub attached: Vec<String>,
    pub promoted: Vec<PromotedChild>,
    /// Datastreams left behind
    pub dropped: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Wires orchestrator, promoter and transferer around the two repositories
#[derive(Clone)]
pub struct Migrator {
    source: Arc<dyn SourceRepository>,
    orchestrator: MigrationOrchestrator,
    promoter: ChildObjectPromoter,
    transferer: DatastreamTransferer,
    namespace: String,
}

impl Migrator {
    pub fn new(
        source: Arc<dyn SourceRepository>,
        target: Arc<dyn TargetRepository>,
        namespace: impl Into<String>,
    ) -> Self {
        let transferer = DatastreamTransferer::new(source.clone(), target.clone());
        Self {
            orchestrator: MigrationOrchestrator::new(source.clone(), target.clone()),
            promoter: ChildObjectPromoter::new(target, transferer.clone()),
            transferer,
            source,
            namespace: namespace.into(),
        }
    }

    /// Migrate `pid` under `policy`
    ///
    /// Steps run strictly in sequence: root object, then each datastream in
    /// listing order. The first failure aborts the run; objects and
    /// relationships created before it are left in place.
    pub async fn run(&self, policy: &dyn MigrationPolicy, pid: &str) -> Result<MigrationReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("migration", run_id = %run_id, pid = %pid, policy = policy.name());

        async move {
            let started_at = Utc::now();
            tracing::info!("Starting migration");

            let root = self
                .orchestrator
                .migrate_root(pid, policy.root_content_model(), &self.namespace)
                .await?;

            let datastreams = self.source.list_datastreams(pid).await?;
            tracing::debug!(count = datastreams.len(), "Fetched datastream listing");

            let mut attached = Vec::new();
            let mut promoted = Vec::new();
            let mut dropped = Vec::new();

            for datastream in &datastreams {
                let action = policy.decide(datastream);
                tracing::info!(dsid = %datastream.dsid, mime_type = %datastream.mime_type, action = ?action, "Applying policy");

                match action {
                    DatastreamAction::AttachToRoot => {
                        self.transferer.transfer(&root.pid, datastream).await?;
                        attached.push(datastream.dsid.clone());
                    }
                    DatastreamAction::PromoteToChild => {
                        let child = self
                            .promoter
                            .promote(&root.pid, datastream, &self.namespace)
                            .await?;
                        promoted.push(child);
                    }
                    DatastreamAction::Drop => dropped.push(datastream.dsid.clone()),
                }
            }

            let report = MigrationReport {
                run_id,
                policy: policy.name().to_string(),
                root,
                attached,
                promoted,
                dropped,
                started_at,
                finished_at: Utc::now(),
            };

            tracing::info!(
                attached = report.attached.len(),
                promoted = report.promoted.len(),
                dropped = report.dropped.len(),
                "Migration complete"
            );
            Ok::<_, MigrationError>(report)
        }
        .instrument(span)
        .await
    }
}
