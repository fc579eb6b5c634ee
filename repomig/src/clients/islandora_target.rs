//! Islandora / Fedora 3.7 REST client (successor repository, write side)

use std::time::Duration;

use async_trait::async_trait;
use repomig_common::config::RepositoryConfig;

use super::http::{with_params, FedoraConnection};
use super::TargetRepository;
use crate::error::{MigrationError, Result};
use crate::model::{DatastreamRecord, Relationship, FEDORA_URI_PREFIX};

/// Write client for the successor repository
pub struct IslandoraTargetClient {
    conn: FedoraConnection,
}

impl IslandoraTargetClient {
    pub fn new(config: &RepositoryConfig, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            conn: FedoraConnection::new(config, timeout)?,
        })
    }
}

#[async_trait]
impl TargetRepository for IslandoraTargetClient {
    async fn create_object(&self, label: &str, namespace: &str, pid: Option<&str>) -> Result<String> {
        let base = self.conn.objects_url(pid.unwrap_or("new"));
        let url = with_params(&base, &[("label", label), ("namespace", namespace)])?;

        let response = self.conn.send(&url, self.conn.post(&url)).await?;
        let created = response
            .text()
            .await
            .map_err(|e| MigrationError::network(&url, e))?
            .trim()
            .to_string();

        if created.is_empty() {
            return Err(MigrationError::parse(format!(
                "object creation at {url} returned no pid"
            )));
        }

        tracing::info!(pid = %created, label = %label, "Created object stub");
        Ok(created)
    }

    async fn add_relationship(&self, relationship: &Relationship) -> Result<()> {
        let base = self
            .conn
            .objects_url(&format!("{}/relationships/new", relationship.subject));
        let subject = format!("{FEDORA_URI_PREFIX}{}", relationship.subject);
        let object = format!("{FEDORA_URI_PREFIX}{}", relationship.object);
        let predicate = relationship.predicate.uri();
        let url = with_params(
            &base,
            &[
                ("subject", subject.as_str()),
                ("predicate", predicate.as_str()),
                ("object", object.as_str()),
                ("isLiteral", "false"),
            ],
        )?;

        self.conn.send(&url, self.conn.post(&url)).await?;

        tracing::debug!(
            subject = %relationship.subject,
            predicate = %relationship.predicate.name(),
            object = %relationship.object,
            "Asserted relationship"
        );
        Ok(())
    }

    async fn add_datastream(&self, pid: &str, record: &DatastreamRecord, content: Vec<u8>) -> Result<()> {
        let base = self
            .conn
            .objects_url(&format!("{pid}/datastreams/{}", record.dsid));
        let url = with_params(
            &base,
            &[
                ("dsLabel", record.label.as_str()),
                ("mimeType", record.mime_type.as_str()),
                ("controlGroup", record.control_group.code()),
                ("dsState", record.state.code()),
            ],
        )?;

        let request = self
            .conn
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, record.mime_type.as_str())
            .body(content);
        self.conn
            .send(&url, request)
            .await
            .map_err(|e| e.with_dsid(&record.dsid))?;

        tracing::info!(pid = %pid, dsid = %record.dsid, "Created datastream");
        Ok(())
    }
}
