//! Translation catalog maintenance.
//!
//! Keeps TOML translation catalogs in step with the templates a program
//! declares. The program side writes a template export (see
//! `ezception::export::write_templates_json`); this crate merges that list
//! into a catalog, and reports what is still missing or untranslated.

use std::fs::File;
use std::path::{Path, PathBuf};

use ezc::catalog::{Catalog, MergeReport};
use ezc::config::{ConfigError, SharedConfig};
use ezception::EzcError;
use ezception::export::{self, TemplateExport};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors of the catalog tool.
#[derive(Debug, Error)]
pub enum CatalogToolError {
    /// Catalog or tool configuration could not be loaded or saved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Template export could not be parsed.
    #[error(transparent)]
    Export(#[from] EzcError),

    /// Template export could not be opened.
    #[error("Failed to open template export {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A new catalog was requested without a locale.
    #[error("Catalog {0} does not exist; pass --locale to create it")]
    MissingLocale(PathBuf),
}

pub type ToolResult<T> = Result<T, CatalogToolError>;

// ─── Configuration ──────────────────────────────────────────────────

/// Tool configuration file.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "ezc-catalog"
///
/// [defaults]
/// locale = "de"
/// prune = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    pub shared: SharedConfig,

    #[serde(default)]
    pub defaults: MergeDefaults,
}

/// Defaults for `merge` when not given on the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeDefaults {
    /// Locale of newly created catalogs.
    pub locale: Option<String>,

    /// Drop stale entries on merge.
    #[serde(default)]
    pub prune: bool,
}

impl ToolConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        if self.defaults.locale.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "defaults.locale cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ─── Operations ─────────────────────────────────────────────────────

/// Read a template export document.
pub fn load_templates(path: &Path) -> ToolResult<TemplateExport> {
    let file = File::open(path).map_err(|source| CatalogToolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let templates = export::read_templates_json(file)?;
    debug!(
        "Read {} templates from {}",
        templates.templates.len(),
        path.display()
    );
    Ok(templates)
}

/// Merge the templates at `templates` into the catalog at `catalog`.
///
/// A missing catalog is created for `locale`. The file is only rewritten
/// when the merge changed something.
pub fn merge(
    templates: &Path,
    catalog: &Path,
    locale: Option<&str>,
    prune: bool,
) -> ToolResult<MergeReport> {
    let export = load_templates(templates)?;
    let (mut target, created) = match Catalog::load(catalog) {
        Ok(existing) => (existing, false),
        Err(ConfigError::FileNotFound) => {
            let locale = locale.ok_or_else(|| CatalogToolError::MissingLocale(catalog.to_path_buf()))?;
            info!("Creating catalog '{}' at {}", locale, catalog.display());
            (Catalog::new(locale), true)
        }
        Err(e) => return Err(e.into()),
    };
    if let Some(locale) = locale {
        if !created && locale != target.locale() {
            warn!(
                "Catalog {} is for locale '{}', ignoring --locale '{}'",
                catalog.display(),
                target.locale(),
                locale
            );
        }
    }

    let report = target.merge(export.templates.iter().map(String::as_str), prune);
    if created || report.changed() {
        target.save(catalog)?;
        info!(
            "Catalog {} updated: {} added, {} stale{}",
            catalog.display(),
            report.added.len(),
            report.stale.len(),
            if report.pruned { " (pruned)" } else { "" }
        );
    } else {
        info!("Catalog {} already up to date", catalog.display());
    }
    Ok(report)
}

/// Coverage of a catalog against declared templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub locale: String,
    /// Declared templates with no entry.
    pub missing: Vec<String>,
    /// Declared templates whose entry is still empty.
    pub untranslated: Vec<String>,
    /// Entries no longer declared.
    pub stale: Vec<String>,
}

impl CheckReport {
    /// Every declared template has a translation.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.untranslated.is_empty()
    }
}

pub fn check(templates: &Path, catalog: &Path) -> ToolResult<CheckReport> {
    let export = load_templates(templates)?;
    let target = Catalog::load(catalog)?;
    let declared = || export.templates.iter().map(String::as_str);

    let stale = target.stale(declared());
    let untranslated = target
        .untranslated()
        .into_iter()
        .filter(|t| !stale.iter().any(|s| s == t))
        .map(str::to_string)
        .collect();

    Ok(CheckReport {
        locale: target.locale().to_string(),
        missing: target.missing(declared()),
        untranslated,
        stale,
    })
}

/// Entry counts of one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub locale: String,
    pub entries: usize,
    pub translated: usize,
    pub untranslated: usize,
}

pub fn stats(catalog: &Path) -> ToolResult<CatalogStats> {
    let target = Catalog::load(catalog)?;
    let untranslated = target.untranslated().len();
    Ok(CatalogStats {
        locale: target.locale().to_string(),
        entries: target.messages.len(),
        translated: target.messages.len() - untranslated,
        untranslated,
    })
}
