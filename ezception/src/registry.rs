//! Process-wide registries.
//!
//! Two append-only tables live for the whole process, created on first
//! use:
//!
//! - the **template registry**: every distinct message template ever
//!   declared, for translation tooling
//! - the **kind table**: every kind ever declared, indexed by [`KindId`]
//!
//! Reads return snapshots; there is no removal API.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::kind::{Kind, KindId};

// ─── Templates ──────────────────────────────────────────────────────

static TEMPLATES: LazyLock<Mutex<BTreeSet<String>>> = LazyLock::new(|| Mutex::new(BTreeSet::new()));

/// Record a template. Returns false if it was already known.
pub(crate) fn register_template(template: &str) -> bool {
    let mut templates = TEMPLATES.lock();
    if templates.contains(template) {
        return false;
    }
    templates.insert(template.to_string());
    trace!("Registered template #{}: {:?}", templates.len(), template);
    true
}

/// Sorted snapshot of all declared templates.
pub fn templates() -> Vec<String> {
    TEMPLATES.lock().iter().cloned().collect()
}

pub fn contains_template(template: &str) -> bool {
    TEMPLATES.lock().contains(template)
}

pub fn template_count() -> usize {
    TEMPLATES.lock().len()
}

// ─── Kinds ──────────────────────────────────────────────────────────

static KINDS: LazyLock<RwLock<Vec<Kind>>> = LazyLock::new(|| RwLock::new(Vec::new()));

/// Allocate the next id and store the kind built for it.
///
/// `build` runs under the table lock and must not declare kinds itself.
pub(crate) fn register_kind(build: impl FnOnce(KindId) -> Kind) -> Kind {
    let mut kinds = KINDS.write();
    let id = KindId::from_index(kinds.len());
    let kind = build(id);
    kinds.push(kind.clone());
    kind
}

/// Kind by id.
pub fn kind(id: KindId) -> Option<Kind> {
    KINDS.read().get(id.index()).cloned()
}

/// Snapshot of all declared kinds, in declaration order.
pub fn kinds() -> Vec<Kind> {
    KINDS.read().clone()
}

/// All kinds whose identity is `qualname`, in declaration order.
///
/// Identities are not unique: two containers may both declare an `Error`.
pub fn find(qualname: &str) -> Vec<Kind> {
    KINDS
        .read()
        .iter()
        .filter(|k| k.qualname() == qualname)
        .cloned()
        .collect()
}

pub fn kind_count() -> usize {
    KINDS.read().len()
}
