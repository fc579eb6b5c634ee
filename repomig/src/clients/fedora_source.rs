//! Fedora 3.4 REST client (legacy repository, read side)

use std::time::Duration;

use async_trait::async_trait;
use repomig_common::config::RepositoryConfig;

use super::http::FedoraConnection;
use super::SourceRepository;
use crate::error::Result;
use crate::model::{Datastream, DatastreamControl, SourceObject};
use crate::xml;

/// Read-only client for the legacy repository
pub struct FedoraSourceClient {
    conn: FedoraConnection,
}

impl FedoraSourceClient {
    pub fn new(config: &RepositoryConfig, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            conn: FedoraConnection::new(config, timeout)?,
        })
    }

    fn datastream_url(&self, pid: &str, dsid: &str) -> String {
        self.conn.objects_url(&format!("{pid}/datastreams/{dsid}"))
    }
}

#[async_trait]
impl SourceRepository for FedoraSourceClient {
    async fn object_profile(&self, pid: &str) -> Result<SourceObject> {
        let url = self.conn.objects_url(&format!("{pid}?format=xml"));
        let body = self.conn.get_text(&url).await?;
        xml::parse_object_profile(pid, &body)
    }

    async fn list_datastreams(&self, pid: &str) -> Result<Vec<Datastream>> {
        let url = self.conn.objects_url(&format!("{pid}/datastreams?format=xml"));
        let body = self.conn.get_text(&url).await?;
        xml::parse_datastream_listing(pid, &body)
    }

    async fn datastream_control(&self, pid: &str, dsid: &str) -> Result<DatastreamControl> {
        let url = format!("{}?format=xml", self.datastream_url(pid, dsid));
        let body = self
            .conn
            .get_text(&url)
            .await
            .map_err(|e| e.with_dsid(dsid))?;
        xml::parse_datastream_control(&body)
    }

    async fn datastream_content(&self, pid: &str, dsid: &str) -> Result<Vec<u8>> {
        let url = format!("{}/content?download=true", self.datastream_url(pid, dsid));
        let content = self
            .conn
            .get_bytes(&url)
            .await
            .map_err(|e| e.with_dsid(dsid))?;

        tracing::debug!(pid = %pid, dsid = %dsid, bytes = content.len(), "Downloaded datastream content");
        Ok(content)
    }

    async fn relationships_document(&self, pid: &str) -> Result<Option<String>> {
        let url = format!("{}/content", self.datastream_url(pid, "RELS-EXT"));
        match self.conn.get_text(&url).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.is_not_found() => {
                tracing::debug!(pid = %pid, "Object has no RELS-EXT datastream");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
