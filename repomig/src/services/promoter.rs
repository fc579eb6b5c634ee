//! Promotion of a datastream to a compound-object member

use std::sync::Arc;

use serde::Serialize;

use super::classifier::classify;
use super::transferer::DatastreamTransferer;
use crate::clients::TargetRepository;
use crate::error::Result;
use crate::model::{ContentModel, Datastream, Relationship};

/// Outcome of one promotion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotedChild {
    /// Source datastream that became the child
    pub dsid: String,
    /// Pid allocated for the child
    pub pid: String,
    pub content_model: ContentModel,
}

/// Creates a child object for a datastream and attaches the datastream to it
#[derive(Clone)]
pub struct ChildObjectPromoter {
    target: Arc<dyn TargetRepository>,
    transferer: DatastreamTransferer,
}

impl ChildObjectPromoter {
    pub fn new(target: Arc<dyn TargetRepository>, transferer: DatastreamTransferer) -> Self {
        Self { target, transferer }
    }

    /// Promote `datastream` to a new object that is a constituent of `parent_pid`
    ///
    /// Both relationships are asserted before the payload is attached. If the
    /// transfer fails the child stays behind, typed and linked, without content.
    pub async fn promote(
        &self,
        parent_pid: &str,
        datastream: &Datastream,
        namespace: &str,
    ) -> Result<PromotedChild> {
        let pid = self
            .target
            .create_object(&datastream.label, namespace, None)
            .await?;

        self.target
            .add_relationship(&Relationship::constituent_of(&pid, parent_pid))
            .await?;

        let content_model = classify(&datastream.mime_type);
        self.target
            .add_relationship(&Relationship::has_model(&pid, content_model))
            .await?;

        tracing::info!(
            parent = %parent_pid,
            child = %pid,
            dsid = %datastream.dsid,
            content_model = %content_model,
            "Promoted datastream to child object"
        );

        self.transferer.transfer(&pid, datastream).await?;

        Ok(PromotedChild {
            dsid: datastream.dsid.clone(),
            pid,
            content_model,
        })
    }
}
