//! Datastream transfer from the legacy repository onto a target object

use std::sync::Arc;

use crate::clients::{SourceRepository, TargetRepository};
use crate::error::Result;
use crate::model::{Datastream, DatastreamRecord};

/// Copies one datastream's payload and attributes to a target object
#[derive(Clone)]
pub struct DatastreamTransferer {
    source: Arc<dyn SourceRepository>,
    target: Arc<dyn TargetRepository>,
}

impl DatastreamTransferer {
    pub fn new(source: Arc<dyn SourceRepository>, target: Arc<dyn TargetRepository>) -> Self {
        Self { source, target }
    }

    /// Transfer `datastream` onto `target_pid`
    ///
    /// Control info and content are both fetched before anything is written,
    /// so a failed fetch leaves no datastream behind on the target.
    pub async fn transfer(&self, target_pid: &str, datastream: &Datastream) -> Result<()> {
        let dsid = datastream.dsid.as_str();

        let control = self
            .source
            .datastream_control(&datastream.pid, dsid)
            .await
            .map_err(|e| e.with_dsid(dsid))?;

        let content = self
            .source
            .datastream_content(&datastream.pid, dsid)
            .await
            .map_err(|e| e.with_dsid(dsid))?;

        let record = DatastreamRecord {
            dsid: datastream.dsid.clone(),
            label: datastream.label.clone(),
            mime_type: datastream.mime_type.clone(),
            control_group: control.control_group,
            state: control.state,
        };

        tracing::debug!(
            source_pid = %datastream.pid,
            target_pid = %target_pid,
            dsid = %dsid,
            bytes = content.len(),
            "Transferring datastream"
        );

        self.target.add_datastream(target_pid, &record, content).await
    }
}
