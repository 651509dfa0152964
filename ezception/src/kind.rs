//! Taxonomy nodes (error kinds).
//!
//! A [`Kind`] is declared once, at initialization time, and lives for the
//! rest of the process in the kind table. Kinds are cheap handles: cloning
//! one clones an `Arc`, and equality is identity.
//!
//! Two ways to declare one:
//!
//! - [`Kind::declare`] for an explicitly named kind with any number of
//!   bases, messages and attribute defaults;
//! - [`Kind::derive`] / [`Kind::derive_empty`] to spawn a child of an
//!   existing kind, optionally anonymous until a container names it.
//!
//! Whichever way, declaration scans the newly declared attributes and turns
//! every string under the reserved `ezmsg` prefix into a [`Message`].
//! Inherited attributes are never rescanned.
//!
//! Attribute lookup follows the kind's resolution order (`mro`): the kind
//! itself, then its ancestors in C3 linearization order.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use ezc::consts::{DETAIL_SEPARATOR, MESSAGE_PREFIX, PRIMARY_MESSAGE, detail_attribute, is_message_attribute};
use serde::Serialize;
use tracing::debug;

use crate::error::{EzcError, EzcResult};
use crate::fault::Fault;
use crate::message::Message;
use crate::registry;
use crate::value::Value;

/// Stable key of a kind in the process-wide kind table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct KindId(usize);

impl KindId {
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A class-level attribute.
#[derive(Debug, Clone)]
pub enum Attr {
    /// Plain default, readable as `{self.<name>}` when a fault has no such data.
    Value(Value),
    /// Message descriptor.
    Message(Arc<Message>),
}

impl Attr {
    pub fn as_message(&self) -> Option<&Arc<Message>> {
        match self {
            Self::Message(message) => Some(message),
            Self::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Message(_) => None,
        }
    }
}

struct KindInner {
    id: KindId,
    name: String,
    qualname: OnceLock<String>,
    unnamed: bool,
    bases: Vec<Kind>,
    mro: Vec<Kind>,
    attrs: BTreeMap<String, Attr>,
}

/// A declared error kind.
#[derive(Clone)]
pub struct Kind(Arc<KindInner>);

impl Kind {
    /// Start declaring an explicitly named kind.
    pub fn declare(name: impl Into<String>) -> KindBuilder {
        KindBuilder {
            name: name.into(),
            bases: Vec::new(),
            attrs: BTreeMap::new(),
        }
    }

    /// Start deriving a child kind with primary message `template`.
    pub fn derive(&self, template: impl Into<String>) -> Derive {
        Derive::new(self, Some(template.into()))
    }

    /// Start deriving a child kind with no primary message; it renders `""`.
    pub fn derive_empty(&self) -> Derive {
        Derive::new(self, None)
    }

    pub fn id(&self) -> KindId {
        self.0.id
    }

    /// Display name: as declared, or synthesized as `Parent[repr(message)]`.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Durable identity: the explicit name, or the attribute name a
    /// container gave an anonymous kind. Falls back to [`Kind::name`].
    pub fn qualname(&self) -> &str {
        self.0
            .qualname
            .get()
            .map_or(self.0.name.as_str(), String::as_str)
    }

    /// Declared without a name and not yet named by a container.
    pub fn is_anonymous(&self) -> bool {
        self.0.unnamed && self.0.qualname.get().is_none()
    }

    /// Declared without a name, whether or not it has been named since.
    pub fn declared_anonymous(&self) -> bool {
        self.0.unnamed
    }

    pub fn bases(&self) -> &[Kind] {
        &self.0.bases
    }

    /// Ancestors in resolution order, excluding `self`.
    pub fn mro(&self) -> &[Kind] {
        &self.0.mro
    }

    /// `self` followed by its ancestors in resolution order.
    pub fn lineage(&self) -> impl Iterator<Item = &Kind> {
        std::iter::once(self).chain(self.0.mro.iter())
    }

    /// Reflexive, transitive ancestry test.
    pub fn is_a(&self, other: &Kind) -> bool {
        self == other || self.0.mro.contains(other)
    }

    /// Attributes declared on this kind itself.
    pub fn own_attrs(&self) -> &BTreeMap<String, Attr> {
        &self.0.attrs
    }

    /// Resolve an attribute along the lineage.
    pub fn lookup(&self, name: &str) -> Option<&Attr> {
        self.lineage().find_map(|kind| kind.0.attrs.get(name))
    }

    /// The descriptor behind attribute `name` (`ezmsg`, `ezmsg_details`, ...).
    pub fn descriptor(&self, name: &str) -> Option<&Arc<Message>> {
        self.lookup(name).and_then(Attr::as_message)
    }

    /// The primary message descriptor, if any.
    pub fn primary(&self) -> Option<&Arc<Message>> {
        self.descriptor(PRIMARY_MESSAGE)
    }

    /// Descriptor of detail `name` (`details` → `ezmsg_details`).
    pub fn detail(&self, name: &str) -> Option<&Arc<Message>> {
        self.descriptor(&detail_attribute(name))
    }

    /// Every detail message visible from this kind, keyed by detail name.
    /// The nearest declaration wins, including a `None` that hides one.
    pub fn details(&self) -> BTreeMap<&str, &Arc<Message>> {
        let prefix = format!("{MESSAGE_PREFIX}{DETAIL_SEPARATOR}");
        let mut visible: BTreeMap<&str, Option<&Arc<Message>>> = BTreeMap::new();
        for kind in self.lineage() {
            for (name, attr) in &kind.0.attrs {
                if let Some(detail) = name.strip_prefix(prefix.as_str()) {
                    visible.entry(detail).or_insert_with(|| attr.as_message());
                }
            }
        }
        visible
            .into_iter()
            .filter_map(|(name, message)| message.map(|m| (name, m)))
            .collect()
    }

    /// New fault of this kind with no data.
    pub fn fault(&self) -> Fault {
        Fault::new(self)
    }

    /// Give an anonymous kind its identity. Only the first call wins.
    pub(crate) fn assign_qualname(&self, qualname: &str) -> bool {
        self.0.unnamed && self.0.qualname.set(qualname.to_string()).is_ok()
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kind")
            .field("id", &self.0.id)
            .field("name", &self.qualname())
            .field("anonymous", &self.is_anonymous())
            .finish()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualname())
    }
}

// ─── Declaration ────────────────────────────────────────────────────

/// Builder for an explicitly named kind.
#[derive(Debug)]
#[must_use]
pub struct KindBuilder {
    name: String,
    bases: Vec<Kind>,
    attrs: BTreeMap<String, Attr>,
}

impl KindBuilder {
    /// Append a base. Bases are searched in the order given.
    pub fn base(mut self, base: &Kind) -> Self {
        self.bases.push(base.clone());
        self
    }

    /// Primary message template.
    pub fn message(self, template: impl Into<String>) -> Self {
        self.attr(PRIMARY_MESSAGE, template.into())
    }

    /// Explicitly no primary message, hiding any inherited one.
    pub fn no_message(self) -> Self {
        self.attr(PRIMARY_MESSAGE, Value::None)
    }

    /// Primary message from a prepared descriptor.
    pub fn message_with(mut self, message: Message) -> Self {
        self.attrs
            .insert(PRIMARY_MESSAGE.to_string(), Attr::Message(Arc::new(message)));
        self
    }

    /// Detail message template, reachable as detail `name`.
    pub fn detail(self, name: &str, template: impl Into<String>) -> Self {
        self.attr(detail_attribute(name), template.into())
    }

    /// Detail message from a prepared descriptor.
    pub fn detail_message(mut self, name: &str, message: Message) -> Self {
        self.attrs
            .insert(detail_attribute(name), Attr::Message(Arc::new(message)));
        self
    }

    /// Class-level attribute. Strings under the `ezmsg` prefix become messages.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), Attr::Value(value.into()));
        self
    }

    /// Declare the kind.
    ///
    /// # Errors
    ///
    /// `DuplicateBase` if a base is listed twice, `InconsistentHierarchy` if
    /// the bases admit no resolution order.
    pub fn build(self) -> EzcResult<Kind> {
        declare(self.name, false, self.bases, self.attrs)
    }
}

/// Builder for a kind derived from a parent.
#[derive(Debug)]
#[must_use]
pub struct Derive {
    parent: Kind,
    message: Option<String>,
    name: Option<String>,
    extra_bases: Vec<Kind>,
    attrs: BTreeMap<String, Attr>,
}

impl Derive {
    fn new(parent: &Kind, message: Option<String>) -> Self {
        Self {
            parent: parent.clone(),
            message,
            name: None,
            extra_bases: Vec::new(),
            attrs: BTreeMap::new(),
        }
    }

    /// Give the kind an explicit, final name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mix in another ancestor after the parent.
    pub fn with_base(mut self, base: &Kind) -> Self {
        self.extra_bases.push(base.clone());
        self
    }

    /// Detail message template, reachable as detail `name`.
    pub fn detail(mut self, name: &str, template: impl Into<String>) -> Self {
        self.attrs
            .insert(detail_attribute(name), Attr::Value(Value::Str(template.into())));
        self
    }

    /// Class-level attribute default.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), Attr::Value(value.into()));
        self
    }

    /// Declare the kind.
    ///
    /// The parent is prepended to the bases unless listed explicitly.
    pub fn build(self) -> EzcResult<Kind> {
        let Self {
            parent,
            message,
            name,
            extra_bases,
            mut attrs,
        } = self;

        let mut bases = extra_bases;
        if !bases.contains(&parent) {
            bases.insert(0, parent.clone());
        }
        let (name, unnamed) = match name {
            Some(name) => (name, false),
            None => {
                let shown = Value::from(message.clone()).repr();
                (format!("{}[{}]", parent.name(), shown), true)
            }
        };
        attrs.insert(
            PRIMARY_MESSAGE.to_string(),
            Attr::Value(message.map_or(Value::None, Value::Str)),
        );
        declare(name, unnamed, bases, attrs)
    }
}

fn declare(
    name: String,
    unnamed: bool,
    bases: Vec<Kind>,
    attrs: BTreeMap<String, Attr>,
) -> EzcResult<Kind> {
    for (i, base) in bases.iter().enumerate() {
        if bases[..i].contains(base) {
            return Err(EzcError::DuplicateBase {
                name,
                base: base.qualname().to_string(),
            });
        }
    }
    let mro = linearize(&bases).ok_or_else(|| EzcError::InconsistentHierarchy { name: name.clone() })?;
    Ok(insert(name, unnamed, bases, mro, attrs))
}

/// Declare a kind with at most one base; its resolution order is the
/// base's lineage, so this cannot fail.
pub(crate) fn declare_single(
    name: &str,
    base: Option<&Kind>,
    attrs: BTreeMap<String, Attr>,
) -> Kind {
    let bases: Vec<Kind> = base.into_iter().cloned().collect();
    let mro = base
        .map(|b| b.lineage().cloned().collect())
        .unwrap_or_default();
    insert(name.to_string(), false, bases, mro, attrs)
}

fn insert(
    name: String,
    unnamed: bool,
    bases: Vec<Kind>,
    mro: Vec<Kind>,
    attrs: BTreeMap<String, Attr>,
) -> Kind {
    let attrs = wrap_messages(attrs);
    let kind = registry::register_kind(|id| {
        Kind(Arc::new(KindInner {
            id,
            name,
            qualname: OnceLock::new(),
            unnamed,
            bases,
            mro,
            attrs,
        }))
    });
    debug!(
        "Declared kind {} {}{} (bases: [{}])",
        kind.id(),
        kind.name(),
        if unnamed { " (anonymous)" } else { "" },
        kind.bases()
            .iter()
            .map(Kind::qualname)
            .collect::<Vec<_>>()
            .join(", ")
    );
    kind
}

/// Declaration-time scan: strings under the reserved prefix become messages.
fn wrap_messages(attrs: BTreeMap<String, Attr>) -> BTreeMap<String, Attr> {
    attrs
        .into_iter()
        .map(|(name, attr)| {
            let attr = match attr {
                Attr::Value(Value::Str(template)) if is_message_attribute(&name) => {
                    Attr::Message(Arc::new(Message::new(template)))
                }
                other => other,
            };
            (name, attr)
        })
        .collect()
}

/// C3 linearization of `bases` (the resolution order of a kind with those
/// bases, minus the kind itself). `None` if no consistent order exists.
fn linearize(bases: &[Kind]) -> Option<Vec<Kind>> {
    let mut sequences: Vec<Vec<Kind>> = bases
        .iter()
        .map(|base| base.lineage().cloned().collect())
        .collect();
    sequences.push(bases.to_vec());

    let mut out = Vec::new();
    loop {
        sequences.retain(|s| !s.is_empty());
        if sequences.is_empty() {
            return Some(out);
        }
        let head = sequences
            .iter()
            .map(|s| &s[0])
            .find(|candidate| sequences.iter().all(|s| !s[1..].contains(candidate)))?
            .clone();
        for s in &mut sequences {
            if s[0] == head {
                s.remove(0);
            }
        }
        out.push(head);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, bases: &[&Kind]) -> Kind {
        bases
            .iter()
            .fold(Kind::declare(name), |b, base| b.base(base))
            .build()
            .unwrap()
    }

    fn qualnames(kinds: &[Kind]) -> Vec<&str> {
        kinds.iter().map(Kind::qualname).collect()
    }

    #[test]
    fn single_inheritance_order() {
        let a = named("A", &[]);
        let b = named("B", &[&a]);
        let c = named("C", &[&b]);
        assert_eq!(qualnames(c.mro()), vec!["B", "A"]);
        assert!(c.is_a(&a) && c.is_a(&b) && c.is_a(&c));
        assert!(!a.is_a(&c));
    }

    #[test]
    fn diamond_linearization() {
        // O ← A, B ← C(A, B)
        let o = named("O", &[]);
        let a = named("A", &[&o]);
        let b = named("B", &[&o]);
        let c = named("C", &[&a, &b]);
        assert_eq!(qualnames(c.mro()), vec!["A", "B", "O"]);
    }

    #[test]
    fn inconsistent_hierarchy_is_rejected() {
        let o = named("O", &[]);
        let a = named("A", &[&o]);
        let result = Kind::declare("Bad").base(&o).base(&a).build();
        assert_eq!(
            result.unwrap_err(),
            EzcError::InconsistentHierarchy {
                name: "Bad".to_string()
            }
        );
    }

    #[test]
    fn duplicate_base_is_rejected() {
        let a = named("A", &[]);
        let result = Kind::declare("Twice").base(&a).base(&a).build();
        assert!(matches!(result, Err(EzcError::DuplicateBase { .. })));
    }

    #[test]
    fn string_message_attributes_are_wrapped() {
        let kind = Kind::declare("Wrapped")
            .message("primary {self.x}")
            .detail("details", "detail {self.x}")
            .attr("ezmsg_raw", "raw {self.x}")
            .attr("where", "not a message")
            .attr("ezmsg_count", 3)
            .build()
            .unwrap();

        assert_eq!(kind.primary().unwrap().template(), "primary {self.x}");
        assert_eq!(kind.detail("details").unwrap().template(), "detail {self.x}");
        assert_eq!(kind.detail("raw").unwrap().template(), "raw {self.x}");
        assert_eq!(
            kind.lookup("where").and_then(Attr::as_value),
            Some(&Value::from("not a message"))
        );
        assert!(kind.lookup("ezmsg_count").unwrap().as_message().is_none());
    }

    #[test]
    fn inherited_descriptors_are_shared_not_rescanned() {
        let parent = Kind::declare("Parent").message("p").build().unwrap();
        let child = Kind::declare("Child").base(&parent).build().unwrap();
        assert!(child.own_attrs().is_empty());
        assert!(Arc::ptr_eq(child.primary().unwrap(), parent.primary().unwrap()));
    }

    #[test]
    fn derive_names() {
        let parent = Kind::declare("Parent").build().unwrap();

        let named = parent.derive("{self.x}").named("Child").build().unwrap();
        assert_eq!(named.name(), "Child");
        assert!(!named.is_anonymous());

        let anon = parent.derive("{self.x}").build().unwrap();
        assert_eq!(anon.name(), "Parent['{self.x}']");
        assert!(anon.is_anonymous());

        let empty = parent.derive_empty().build().unwrap();
        assert_eq!(empty.name(), "Parent[None]");
        assert_eq!(empty.bases(), &[parent.clone()]);
    }

    #[test]
    fn derive_keeps_explicit_parent_position() {
        let parent = Kind::declare("P").build().unwrap();
        let mixin = Kind::declare("M").build().unwrap();

        let prepended = parent.derive_empty().with_base(&mixin).build().unwrap();
        assert_eq!(prepended.bases(), &[parent.clone(), mixin.clone()]);

        let explicit = parent
            .derive_empty()
            .with_base(&mixin)
            .with_base(&parent)
            .build()
            .unwrap();
        assert_eq!(explicit.bases(), &[mixin.clone(), parent.clone()]);
        assert!(explicit.is_a(&parent));
    }

    #[test]
    fn derive_with_none_hides_parent_message() {
        let parent = Kind::declare("Loud").message("loud").build().unwrap();
        let quiet = parent.derive_empty().build().unwrap();
        assert!(quiet.primary().is_none());
        assert!(matches!(
            quiet.lookup(PRIMARY_MESSAGE),
            Some(Attr::Value(Value::None))
        ));
    }

    #[test]
    fn details_nearest_wins() {
        let base = Kind::declare("Base")
            .detail("a", "base a")
            .detail("b", "base b")
            .build()
            .unwrap();
        let child = Kind::declare("Sub")
            .base(&base)
            .detail("a", "child a")
            .attr("ezmsg_b", Value::None)
            .build()
            .unwrap();

        let details = child.details();
        assert_eq!(details.len(), 1);
        assert_eq!(details["a"].template(), "child a");
    }

    #[test]
    fn qualname_is_write_once() {
        let parent = Kind::declare("Once").build().unwrap();
        let anon = parent.derive_empty().build().unwrap();
        assert!(anon.assign_qualname("First"));
        assert!(!anon.assign_qualname("Second"));
        assert_eq!(anon.qualname(), "First");
        assert!(!anon.is_anonymous());
        assert!(anon.declared_anonymous());

        // Explicitly named kinds never take a container name.
        assert!(!parent.assign_qualname("Other"));
        assert_eq!(parent.qualname(), "Once");
    }
}
