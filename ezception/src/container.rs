//! Containers: named groups of kinds.
//!
//! A container is the unit a taxonomy is declared in. Building one runs the
//! naming resolver over its members, so anonymous kinds come out of
//! [`ContainerBuilder::build`] named after their attribute.
//!
//! ```rust
//! use ezception::container::ContainerBuilder;
//!
//! let root = ezception::root();
//! let error = root.derive_empty().build().unwrap();
//! let reader = ContainerBuilder::new("Reader").member("Error", &error).build();
//! assert_eq!(reader.get("Error").unwrap().qualname(), "Error");
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::kind::Kind;
use crate::naming;

/// Named group of kinds, keyed by attribute name.
#[derive(Debug, Clone)]
pub struct Container {
    name: String,
    members: BTreeMap<String, Kind>,
}

impl Container {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, attribute: &str) -> Option<&Kind> {
        self.members.get(attribute)
    }

    /// Members in attribute order.
    pub fn kinds(&self) -> impl Iterator<Item = (&str, &Kind)> {
        self.members.iter().map(|(attribute, kind)| (attribute.as_str(), kind))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True if `kind` is a member under any attribute.
    pub fn contains(&self, kind: &Kind) -> bool {
        self.members.values().any(|member| member == kind)
    }
}

/// Builder for a [`Container`].
#[derive(Debug)]
#[must_use]
pub struct ContainerBuilder {
    name: String,
    inherited: BTreeMap<String, Kind>,
    own: BTreeMap<String, Kind>,
}

impl ContainerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inherited: BTreeMap::new(),
            own: BTreeMap::new(),
        }
    }

    /// Add `kind` under `attribute`.
    pub fn member(mut self, attribute: impl Into<String>, kind: &Kind) -> Self {
        self.own.insert(attribute.into(), kind.clone());
        self
    }

    /// Inherit every member of `parent`. Own members win on conflict.
    pub fn extend(mut self, parent: &Container) -> Self {
        self.inherited.extend(
            parent
                .members
                .iter()
                .map(|(attribute, kind)| (attribute.clone(), kind.clone())),
        );
        self
    }

    /// Build the container and name its anonymous members.
    pub fn build(self) -> Container {
        let mut members = self.inherited;
        members.extend(self.own);
        let named = naming::resolve(members.iter().map(|(attribute, kind)| (attribute.as_str(), kind)));
        debug!(
            "Container {} built: {} members, {} newly named",
            self.name,
            members.len(),
            named
        );
        Container {
            name: self.name,
            members,
        }
    }
}
