//! MIME type → content model classification
//!
//! Rules are evaluated in table order and the first match wins. Anything
//! unmatched falls back to the compound model.

use crate::model::ContentModel;

type MimeRule = fn(&str) -> bool;

fn is_basic_image(mime: &str) -> bool {
    matches!(mime, "image/jpeg" | "image/png" | "image/gif")
}

fn is_tiff(mime: &str) -> bool {
    mime.ends_with("tiff")
}

fn is_audio(mime: &str) -> bool {
    matches!(mime, "audio/mpeg" | "audio/wav" | "audio/x-wav")
}

fn is_video(mime: &str) -> bool {
    matches!(mime, "video/mp4" | "video/ogg")
}

fn is_pdf(mime: &str) -> bool {
    mime.ends_with("pdf")
}

/// Ordered classification table
const RULES: &[(MimeRule, ContentModel)] = &[
    (is_basic_image, ContentModel::BasicImage),
    (is_tiff, ContentModel::LargeImage),
    (is_audio, ContentModel::Audio),
    (is_video, ContentModel::Video),
    (is_pdf, ContentModel::Pdf),
];

/// Classify a MIME type into a content model
pub fn classify(mime_type: &str) -> ContentModel {
    match RULES.iter().find(|(rule, _)| rule(mime_type)) {
        Some((_, model)) => *model,
        None => {
            tracing::debug!(mime_type = %mime_type, "No content model rule matched, using compound");
            ContentModel::Compound
        }
    }
}
