//! Domain types shared by the repository clients and the migration services
//!
//! Source-side types are read views fetched fresh for each migration call.
//! Target-side types describe what gets written to the successor repository.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MigrationError;

/// Fedora model ontology namespace
pub const FEDORA_MODEL_NS: &str = "info:fedora/fedora-system:def/model#";
/// Fedora external relations namespace
pub const FEDORA_RELS_EXT_NS: &str = "info:fedora/fedora-system:def/relations-external#";
/// URI prefix for object references in RELS-EXT
pub const FEDORA_URI_PREFIX: &str = "info:fedora/";

// ============================================================================
// Source side
// ============================================================================

/// Object lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectState {
    Active,
    Inactive,
    Deleted,
}

impl ObjectState {
    pub fn code(&self) -> &'static str {
        match self {
            ObjectState::Active => "A",
            ObjectState::Inactive => "I",
            ObjectState::Deleted => "D",
        }
    }
}

impl FromStr for ObjectState {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" => Ok(ObjectState::Active),
            "I" => Ok(ObjectState::Inactive),
            "D" => Ok(ObjectState::Deleted),
            other => Err(MigrationError::parse(format!("unknown state code '{other}'"))),
        }
    }
}

/// Datastream storage mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlGroup {
    /// Inline XML
    Inline,
    /// Managed content
    Managed,
    /// External reference
    External,
    /// Redirect
    Redirect,
}

impl ControlGroup {
    pub fn code(&self) -> &'static str {
        match self {
            ControlGroup::Inline => "X",
            ControlGroup::Managed => "M",
            ControlGroup::External => "E",
            ControlGroup::Redirect => "R",
        }
    }
}

impl FromStr for ControlGroup {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" => Ok(ControlGroup::Inline),
            "M" => Ok(ControlGroup::Managed),
            "E" => Ok(ControlGroup::External),
            "R" => Ok(ControlGroup::Redirect),
            other => Err(MigrationError::parse(format!("unknown control group '{other}'"))),
        }
    }
}

/// Object profile of a legacy repository object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceObject {
    pub pid: String,
    pub label: String,
    pub state: ObjectState,
    /// Owning namespace (pid prefix)
    pub namespace: String,
}

/// One entry of an object's datastream listing
///
/// The payload is never held here; it is downloaded only when the datastream
/// is transferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Datastream {
    /// Pid of the source object owning this datastream
    pub pid: String,
    pub dsid: String,
    pub label: String,
    pub mime_type: String,
}

/// Per-datastream control information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatastreamControl {
    pub control_group: ControlGroup,
    pub state: ObjectState,
}

/// Namespace part of a pid (`coccc:123` → `coccc`)
pub fn pid_namespace(pid: &str) -> &str {
    pid.split_once(':').map(|(ns, _)| ns).unwrap_or(pid)
}

// ============================================================================
// Target side
// ============================================================================

/// Content model catalog of the successor repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentModel {
    BasicImage,
    LargeImage,
    Audio,
    Video,
    Pdf,
    Compound,
}

impl ContentModel {
    /// Content model pid
    pub fn pid(&self) -> &'static str {
        match self {
            ContentModel::BasicImage => "islandora:sp_basic_image",
            ContentModel::LargeImage => "islandora:sp_large_image_cmodel",
            ContentModel::Audio => "islandora:sp-audioCModel",
            ContentModel::Video => "islandora:sp_videoCModel",
            ContentModel::Pdf => "islandora:sp_pdf",
            ContentModel::Compound => "islandora:compoundCModel",
        }
    }
}

impl fmt::Display for ContentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pid())
    }
}

/// Relationship predicates asserted by a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Predicate {
    HasModel,
    IsConstituentOf,
    IsMemberOfCollection,
}

impl Predicate {
    pub fn namespace(&self) -> &'static str {
        match self {
            Predicate::HasModel => FEDORA_MODEL_NS,
            Predicate::IsConstituentOf | Predicate::IsMemberOfCollection => FEDORA_RELS_EXT_NS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Predicate::HasModel => "hasModel",
            Predicate::IsConstituentOf => "isConstituentOf",
            Predicate::IsMemberOfCollection => "isMemberOfCollection",
        }
    }

    /// Full predicate URI (namespace + name)
    pub fn uri(&self) -> String {
        format!("{}{}", self.namespace(), self.name())
    }
}

/// A (predicate, subject, object) assertion against the target repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub predicate: Predicate,
    pub subject: String,
    pub object: String,
}

impl Relationship {
    /// `subject hasModel model`
    pub fn has_model(subject: &str, model: ContentModel) -> Self {
        Self {
            predicate: Predicate::HasModel,
            subject: subject.to_string(),
            object: model.pid().to_string(),
        }
    }

    /// `child isConstituentOf parent`
    pub fn constituent_of(child: &str, parent: &str) -> Self {
        Self {
            predicate: Predicate::IsConstituentOf,
            subject: child.to_string(),
            object: parent.to_string(),
        }
    }

    /// `member isMemberOfCollection collection`
    pub fn member_of_collection(member: &str, collection: &str) -> Self {
        Self {
            predicate: Predicate::IsMemberOfCollection,
            subject: member.to_string(),
            object: collection.to_string(),
        }
    }
}

/// Attributes of a datastream to be created on a target object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatastreamRecord {
    pub dsid: String,
    pub label: String,
    pub mime_type: String,
    pub control_group: ControlGroup,
    pub state: ObjectState,
}
