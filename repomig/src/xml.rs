//! Parsers for the XML documents served by the Fedora 3 REST API
//!
//! Elements are matched by local name. Fedora 3.4 serves profiles in the
//! access namespace while later releases moved some of them to the management
//! namespace; the local names did not change.

use roxmltree::{Document, Node};

use crate::error::{MigrationError, Result};
use crate::model::{
    pid_namespace, Datastream, DatastreamControl, SourceObject, FEDORA_RELS_EXT_NS,
    FEDORA_URI_PREFIX,
};

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

fn parse_document(xml: &str) -> Result<Document<'_>> {
    Document::parse(xml).map_err(|e| MigrationError::parse(format!("malformed XML: {e}")))
}

fn required_element<'a, 'input>(
    parent: Node<'a, 'input>,
    local_name: &str,
) -> Result<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == local_name)
        .ok_or_else(|| MigrationError::parse(format!("missing <{local_name}> element")))
}

fn required_text<'a>(parent: Node<'a, '_>, local_name: &str) -> Result<&'a str> {
    required_element(parent, local_name)?
        .text()
        .map(str::trim)
        .ok_or_else(|| MigrationError::parse(format!("empty <{local_name}> element")))
}

fn required_attribute<'a>(node: Node<'a, '_>, dsid: &str, name: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| MigrationError::parse(format!("datastream {dsid} has no {name} attribute")))
}

/// Parse `GET /objects/{pid}?format=xml`
pub fn parse_object_profile(pid: &str, xml: &str) -> Result<SourceObject> {
    let doc = parse_document(xml)?;
    let root = doc.root_element();

    // The element is required; an empty label is not
    let label = required_element(root, "objLabel")?
        .text()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let state = required_text(root, "objState")?.parse()?;

    Ok(SourceObject {
        pid: pid.to_string(),
        label,
        state,
        namespace: pid_namespace(pid).to_string(),
    })
}

/// Parse `GET /objects/{pid}/datastreams?format=xml`
pub fn parse_datastream_listing(pid: &str, xml: &str) -> Result<Vec<Datastream>> {
    let doc = parse_document(xml)?;

    doc.root_element()
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "datastream")
        .map(|n| -> Result<Datastream> {
            let dsid = n
                .attribute("dsid")
                .ok_or_else(|| MigrationError::parse("datastream entry without dsid"))?;
            Ok(Datastream {
                pid: pid.to_string(),
                dsid: dsid.to_string(),
                label: required_attribute(n, dsid, "label")?.to_string(),
                mime_type: required_attribute(n, dsid, "mimeType")?.to_string(),
            })
        })
        .collect()
}

/// Parse `GET /objects/{pid}/datastreams/{dsid}?format=xml`
pub fn parse_datastream_control(xml: &str) -> Result<DatastreamControl> {
    let doc = parse_document(xml)?;
    let root = doc.root_element();

    Ok(DatastreamControl {
        control_group: required_text(root, "dsControlGroup")?.parse()?,
        state: required_text(root, "dsState")?.parse()?,
    })
}

/// Extract the parent collection pid from a RELS-EXT document
///
/// Returns `Ok(None)` when the object is not a member of any collection.
/// Only the first `isMemberOfCollection` assertion is used.
pub fn parse_parent_collection(xml: &str) -> Result<Option<String>> {
    let doc = parse_document(xml)?;

    let resource = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "Description")
        .flat_map(|description| description.children())
        .find(|n| {
            n.is_element()
                && n.tag_name().name() == "isMemberOfCollection"
                && n.tag_name().namespace() == Some(FEDORA_RELS_EXT_NS)
        })
        .and_then(|n| n.attribute((RDF_NS, "resource")));

    Ok(resource.and_then(pid_from_uri))
}

/// `info:fedora/coccc:10` → `coccc:10`
fn pid_from_uri(uri: &str) -> Option<String> {
    let pid = uri
        .strip_prefix(FEDORA_URI_PREFIX)
        .unwrap_or(uri)
        .rsplit('/')
        .next()?
        .trim();
    (!pid.is_empty()).then(|| pid.to_string())
}
