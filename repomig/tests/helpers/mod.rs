//! In-memory repositories for migration tests
//!
//! `InMemorySource` serves a fixed set of objects and datastreams and returns
//! 404 transport errors for anything missing. `RecordingTarget` allocates
//! sequential pids and records every write in call order.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use repomig::clients::{SourceRepository, TargetRepository};
use repomig::error::{MigrationError, Result};
use repomig::model::{
    pid_namespace, ControlGroup, Datastream, DatastreamControl, DatastreamRecord, ObjectState,
    Predicate, Relationship, SourceObject,
};

pub const SOURCE_BASE: &str = "http://source.test/fedora/objects";

// ============================================================================
// Source
// ============================================================================

#[derive(Default)]
pub struct InMemorySource {
    objects: HashMap<String, SourceObject>,
    listings: HashMap<String, Vec<Datastream>>,
    controls: HashMap<(String, String), DatastreamControl>,
    contents: HashMap<(String, String), Vec<u8>>,
    rels_ext: HashMap<String, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, pid: &str, label: &str) -> Self {
        self.objects.insert(
            pid.to_string(),
            SourceObject {
                pid: pid.to_string(),
                label: label.to_string(),
                state: ObjectState::Active,
                namespace: pid_namespace(pid).to_string(),
            },
        );
        self.listings.entry(pid.to_string()).or_default();
        self
    }

    /// Managed, active datastream with content
    pub fn with_datastream(mut self, pid: &str, dsid: &str, label: &str, mime_type: &str) -> Self {
        self.listings
            .entry(pid.to_string())
            .or_default()
            .push(Datastream {
                pid: pid.to_string(),
                dsid: dsid.to_string(),
                label: label.to_string(),
                mime_type: mime_type.to_string(),
            });
        let key = (pid.to_string(), dsid.to_string());
        self.controls.insert(
            key.clone(),
            DatastreamControl {
                control_group: if mime_type == "text/xml" {
                    ControlGroup::Inline
                } else {
                    ControlGroup::Managed
                },
                state: ObjectState::Active,
            },
        );
        self.contents
            .insert(key, format!("{pid}/{dsid} payload").into_bytes());
        self
    }

    /// Make the content download of one datastream return 404
    pub fn without_content(mut self, pid: &str, dsid: &str) -> Self {
        self.contents.remove(&(pid.to_string(), dsid.to_string()));
        self
    }

    /// Make the control info of one datastream return 404
    pub fn without_control(mut self, pid: &str, dsid: &str) -> Self {
        self.controls.remove(&(pid.to_string(), dsid.to_string()));
        self
    }

    pub fn with_collection(mut self, pid: &str, collection: &str) -> Self {
        self.rels_ext.insert(pid.to_string(), rels_ext_xml(pid, Some(collection)));
        self
    }

    pub fn with_rels_ext(mut self, pid: &str, document: &str) -> Self {
        self.rels_ext.insert(pid.to_string(), document.to_string());
        self
    }

    pub fn content_url(pid: &str, dsid: &str) -> String {
        format!("{SOURCE_BASE}/{pid}/datastreams/{dsid}/content?download=true")
    }

    pub fn content_of(pid: &str, dsid: &str) -> Vec<u8> {
        format!("{pid}/{dsid} payload").into_bytes()
    }
}

fn not_found(url: String) -> MigrationError {
    MigrationError::status(url, 404, "Not Found")
}

#[async_trait]
impl SourceRepository for InMemorySource {
    async fn object_profile(&self, pid: &str) -> Result<SourceObject> {
        self.objects
            .get(pid)
            .cloned()
            .ok_or_else(|| not_found(format!("{SOURCE_BASE}/{pid}?format=xml")))
    }

    async fn list_datastreams(&self, pid: &str) -> Result<Vec<Datastream>> {
        self.listings
            .get(pid)
            .cloned()
            .ok_or_else(|| not_found(format!("{SOURCE_BASE}/{pid}/datastreams?format=xml")))
    }

    async fn datastream_control(&self, pid: &str, dsid: &str) -> Result<DatastreamControl> {
        self.controls
            .get(&(pid.to_string(), dsid.to_string()))
            .copied()
            .ok_or_else(|| {
                not_found(format!("{SOURCE_BASE}/{pid}/datastreams/{dsid}?format=xml"))
                    .with_dsid(dsid)
            })
    }

    async fn datastream_content(&self, pid: &str, dsid: &str) -> Result<Vec<u8>> {
        self.contents
            .get(&(pid.to_string(), dsid.to_string()))
            .cloned()
            .ok_or_else(|| not_found(Self::content_url(pid, dsid)).with_dsid(dsid))
    }

    async fn relationships_document(&self, pid: &str) -> Result<Option<String>> {
        Ok(self.rels_ext.get(pid).cloned())
    }
}

pub fn rels_ext_xml(pid: &str, collection: Option<&str>) -> String {
    let membership = collection
        .map(|c| {
            format!(r#"<fedora:isMemberOfCollection rdf:resource="info:fedora/{c}"/>"#)
        })
        .unwrap_or_default();
    format!(
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:fedora="info:fedora/fedora-system:def/relations-external#"
         xmlns:fedora-model="info:fedora/fedora-system:def/model#">
  <rdf:Description rdf:about="info:fedora/{pid}">
    <fedora-model:hasModel rdf:resource="info:fedora/islandora:compoundCModel"/>
    {membership}
  </rdf:Description>
</rdf:RDF>"#
    )
}

// ============================================================================
// Target
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TargetCall {
    CreateObject {
        pid: String,
        label: String,
        namespace: String,
    },
    Relationship(Relationship),
    Datastream {
        pid: String,
        record: DatastreamRecord,
        content: Vec<u8>,
    },
}

#[derive(Default)]
pub struct RecordingTarget {
    calls: Mutex<Vec<TargetCall>>,
    next_id: Mutex<u32>,
    fail_predicate: Option<Predicate>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every assertion of `predicate` with a 500
    pub fn failing_on(predicate: Predicate) -> Self {
        Self {
            fail_predicate: Some(predicate),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<TargetCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created_pids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TargetCall::CreateObject { pid, .. } => Some(pid),
                _ => None,
            })
            .collect()
    }

    pub fn relationships_of(&self, subject: &str) -> Vec<Relationship> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TargetCall::Relationship(r) if r.subject == subject => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn count_predicate(&self, subject: &str, predicate: Predicate) -> usize {
        self.relationships_of(subject)
            .iter()
            .filter(|r| r.predicate == predicate)
            .count()
    }

    /// dsids created on `pid`, in order
    pub fn datastreams_of(&self, pid: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TargetCall::Datastream { pid: p, record, .. } if p == pid => Some(record.dsid),
                _ => None,
            })
            .collect()
    }

    pub fn content_of(&self, pid: &str, dsid: &str) -> Option<Vec<u8>> {
        self.calls().into_iter().find_map(|c| match c {
            TargetCall::Datastream { pid: p, record, content } if p == pid && record.dsid == dsid => {
                Some(content)
            }
            _ => None,
        })
    }

    /// Index of the first recorded call matching `pred`
    pub fn position(&self, pred: impl Fn(&TargetCall) -> bool) -> Option<usize> {
        self.calls().iter().position(pred)
    }
}

#[async_trait]
impl TargetRepository for RecordingTarget {
    async fn create_object(&self, label: &str, namespace: &str, pid: Option<&str>) -> Result<String> {
        let pid = match pid {
            Some(pid) => pid.to_string(),
            None => {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                format!("{namespace}:child{}", *next)
            }
        };
        self.calls.lock().unwrap().push(TargetCall::CreateObject {
            pid: pid.clone(),
            label: label.to_string(),
            namespace: namespace.to_string(),
        });
        Ok(pid)
    }

    async fn add_relationship(&self, relationship: &Relationship) -> Result<()> {
        if self.fail_predicate == Some(relationship.predicate) {
            return Err(MigrationError::status(
                format!("http://target.test/fedora/objects/{}/relationships/new", relationship.subject),
                500,
                "Internal Server Error",
            ));
        }
        self.calls
            .lock()
            .unwrap()
            .push(TargetCall::Relationship(relationship.clone()));
        Ok(())
    }

    async fn add_datastream(&self, pid: &str, record: &DatastreamRecord, content: Vec<u8>) -> Result<()> {
        self.calls.lock().unwrap().push(TargetCall::Datastream {
            pid: pid.to_string(),
            record: record.clone(),
            content,
        });
        Ok(())
    }
}

/// Source object used across tests: the oral-history example record
pub fn oral_history_source() -> InMemorySource {
    InMemorySource::new()
        .with_object("coccc:100", "Interview with Jane Doe, 1972")
        .with_datastream("coccc:100", "DC", "Dublin Core Record", "text/xml")
        .with_datastream("coccc:100", "MODS", "MODS Record", "text/xml")
        .with_datastream("coccc:100", "OBJ", "Transcript", "application/pdf")
        .with_datastream("coccc:100", "TN", "Thumbnail Image", "image/jpeg")
        .with_collection("coccc:100", "coccc:oralhistories")
}

pub fn shared(source: InMemorySource, target: RecordingTarget) -> (Arc<InMemorySource>, Arc<RecordingTarget>) {
    (Arc::new(source), Arc::new(target))
}
