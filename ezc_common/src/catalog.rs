//! Translation catalogs.
//!
//! A catalog maps raw message templates to their translation for one
//! locale. Keys are the templates exactly as declared, so catalogs are
//! produced by merging an exported template list into a (possibly empty)
//! catalog file and filling in the blanks.
//!
//! # TOML Example
//!
//! ```toml
//! [catalog]
//! locale = "de"
//!
//! [messages]
//! "{self.what!r} was not found" = "{self.what!r} wurde nicht gefunden"
//! "Permission denied for {self.src!r}" = ""
//! ```
//!
//! An empty translation marks an entry as untranslated; lookups skip it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigError, ConfigLoader};

/// Catalog header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMeta {
    /// Locale tag (`de`, `pt_BR`, ...).
    pub locale: String,

    /// Free-form note for translators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A template → translation table for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub catalog: CatalogMeta,

    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

/// Outcome of [`Catalog::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Templates added with an empty translation.
    pub added: Vec<String>,
    /// Entries whose template is no longer declared.
    pub stale: Vec<String>,
    /// Whether stale entries were removed.
    pub pruned: bool,
}

impl MergeReport {
    /// True if the merge modified the catalog.
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || (self.pruned && !self.stale.is_empty())
    }
}

impl Catalog {
    /// Empty catalog for `locale`.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            catalog: CatalogMeta {
                locale: locale.into(),
                description: None,
            },
            messages: BTreeMap::new(),
        }
    }

    /// Load and validate a catalog file.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load`]; additionally `ConfigError::ValidationError`
    /// if the locale is empty.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let catalog = <Self as ConfigLoader>::load(path)?;
        catalog.validate()?;
        debug!(
            "Loaded catalog '{}' with {} entries from {}",
            catalog.locale(),
            catalog.messages.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Validate the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `locale` is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.locale.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "catalog.locale cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Write the catalog as TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::WriteError(e.to_string()))
    }

    pub fn locale(&self) -> &str {
        &self.catalog.locale
    }

    /// Translation of `template`, if one is filled in.
    pub fn lookup(&self, template: &str) -> Option<&str> {
        self.messages
            .get(template)
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    /// Insert or replace a translation.
    pub fn insert(&mut self, template: impl Into<String>, translation: impl Into<String>) {
        self.messages.insert(template.into(), translation.into());
    }

    /// Templates present with an empty translation.
    pub fn untranslated(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(_, t)| t.is_empty())
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Declared templates with no entry at all.
    pub fn missing<'a, I>(&self, templates: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        templates
            .into_iter()
            .filter(|t| !self.messages.contains_key(*t))
            .map(str::to_string)
            .collect()
    }

    /// Entries whose template is not in `templates`.
    pub fn stale<'a, I>(&self, templates: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let declared: BTreeSet<&str> = templates.into_iter().collect();
        self.messages
            .keys()
            .filter(|k| !declared.contains(k.as_str()))
            .cloned()
            .collect()
    }

    /// Add every declared template that has no entry yet; drop stale entries
    /// when `prune` is set. Existing translations are never touched.
    pub fn merge<'a, I>(&mut self, templates: I, prune: bool) -> MergeReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let declared: BTreeSet<&str> = templates.into_iter().collect();
        let added = self.missing(declared.iter().copied());
        for template in &added {
            self.messages.insert(template.clone(), String::new());
        }
        let stale = self.stale(declared.iter().copied());
        if prune {
            for template in &stale {
                self.messages.remove(template);
            }
        }
        MergeReport {
            added,
            stale,
            pruned: prune,
        }
    }
}
