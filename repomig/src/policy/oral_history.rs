//! "Oral history" profile
//!
//! Descriptive metadata (DC, MODS) stays on the interview object. Transcripts
//! (PDF), photographs and WAV masters each become a member of the compound
//! object. Thumbnails, derivative audio and everything else are dropped.

use super::{DatastreamAction, MigrationPolicy};
use crate::model::Datastream;

type Rule = fn(&Datastream) -> bool;

const METADATA_DSIDS: &[&str] = &["DC", "MODS"];
const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

fn is_descriptive_metadata(ds: &Datastream) -> bool {
    METADATA_DSIDS.contains(&ds.dsid.as_str())
}

fn is_pdf(ds: &Datastream) -> bool {
    ds.mime_type.ends_with("pdf")
}

fn is_full_image(ds: &Datastream) -> bool {
    IMAGE_MIME_TYPES.contains(&ds.mime_type.as_str())
        && !ds.label.to_lowercase().contains("thumbnail")
}

fn is_wav(ds: &Datastream) -> bool {
    ds.mime_type.ends_with("wav")
}

/// Evaluated in order, first match wins
const RULES: &[(Rule, DatastreamAction)] = &[
    (is_descriptive_metadata, DatastreamAction::AttachToRoot),
    (is_pdf, DatastreamAction::PromoteToChild),
    (is_full_image, DatastreamAction::PromoteToChild),
    (is_wav, DatastreamAction::PromoteToChild),
];

/// Oral history migration profile
#[derive(Debug, Clone, Copy, Default)]
pub struct OralHistoryPolicy;

impl MigrationPolicy for OralHistoryPolicy {
    fn name(&self) -> &'static str {
        "OralHistory"
    }

    fn decide(&self, datastream: &Datastream) -> DatastreamAction {
        RULES
            .iter()
            .find(|(rule, _)| rule(datastream))
            .map(|(_, action)| *action)
            .unwrap_or(DatastreamAction::Drop)
    }
}
