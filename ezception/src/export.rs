//! Serializable snapshots of the registries.
//!
//! The template export is the hand-off to localization tooling: a JSON
//! document listing every template the process declared, which
//! `ezc_catalog merge` folds into a translation catalog.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{EzcError, EzcResult};
use crate::kind::{Attr, Kind, KindId};
use crate::registry;

/// Every declared template, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateExport {
    pub templates: Vec<String>,
}

/// Snapshot of the template registry.
pub fn templates() -> TemplateExport {
    TemplateExport {
        templates: registry::templates(),
    }
}

pub fn write_templates_json<W: Write>(writer: W) -> EzcResult<()> {
    serde_json::to_writer_pretty(writer, &templates()).map_err(|e| EzcError::Export(e.to_string()))
}

pub fn read_templates_json<R: Read>(reader: R) -> EzcResult<TemplateExport> {
    serde_json::from_reader(reader).map_err(|e| EzcError::Export(e.to_string()))
}

/// One declared kind, flattened for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindExport {
    pub id: KindId,
    pub name: String,
    pub qualname: String,
    pub anonymous: bool,
    pub bases: Vec<String>,
    pub mro: Vec<String>,
    /// Templates declared on the kind itself, by attribute.
    pub messages: BTreeMap<String, String>,
}

pub fn describe_kind(kind: &Kind) -> KindExport {
    KindExport {
        id: kind.id(),
        name: kind.name().to_string(),
        qualname: kind.qualname().to_string(),
        anonymous: kind.is_anonymous(),
        bases: qualnames(kind.bases()),
        mro: qualnames(kind.mro()),
        messages: kind
            .own_attrs()
            .iter()
            .filter_map(|(attribute, attr)| match attr {
                Attr::Message(message) => Some((attribute.clone(), message.template().to_string())),
                Attr::Value(_) => None,
            })
            .collect(),
    }
}

fn qualnames(kinds: &[Kind]) -> Vec<String> {
    kinds.iter().map(|k| k.qualname().to_string()).collect()
}

/// Every declared kind, in declaration order.
pub fn kinds() -> Vec<KindExport> {
    registry::kinds().iter().map(describe_kind).collect()
}

pub fn write_kinds_json<W: Write>(writer: W) -> EzcResult<()> {
    serde_json::to_writer_pretty(writer, &kinds()).map_err(|e| EzcError::Export(e.to_string()))
}
