//! Translation functions.
//!
//! A [`Translator`] maps a raw template to the template to render, typically
//! its translation in the active locale. Translators are bound at two
//! levels:
//!
//! 1. per message, when the message is declared ([`Message::with_translator`])
//! 2. process-wide, via [`set_default`] or [`install_catalog`]
//!
//! With nothing configured templates render untranslated.
//!
//! [`Message::with_translator`]: crate::message::Message::with_translator

use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use ezc::catalog::Catalog;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::EzcResult;

type TranslateFn = dyn Fn(&str) -> String + Send + Sync;

/// A shareable `&str -> String` translation function.
#[derive(Clone)]
pub struct Translator(Arc<TranslateFn>);

impl Translator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Returns templates unchanged.
    pub fn identity() -> Self {
        Self::new(str::to_string)
    }

    /// Looks templates up in `catalog`; untranslated or unknown templates
    /// come back unchanged.
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self::new(move |template| {
            catalog
                .lookup(template)
                .map_or_else(|| template.to_string(), str::to_string)
        })
    }

    pub fn translate(&self, template: &str) -> String {
        (self.0)(template)
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Translator(..)")
    }
}

impl From<Catalog> for Translator {
    fn from(catalog: Catalog) -> Self {
        Self::from_catalog(catalog)
    }
}

/// How a message picks its translator.
#[derive(Debug, Clone, Default)]
pub enum Translation {
    /// Use the process-wide default.
    #[default]
    Inherit,
    /// Never translate.
    Disabled,
    /// Use this translator.
    Custom(Translator),
}

impl Translation {
    /// Active translator: `explicit` > own binding > process default.
    pub(crate) fn resolve(&self, explicit: Option<&Translator>) -> Option<Translator> {
        if let Some(translator) = explicit {
            return Some(translator.clone());
        }
        match self {
            Self::Inherit => default_translator(),
            Self::Disabled => None,
            Self::Custom(translator) => Some(translator.clone()),
        }
    }
}

// ─── Process-wide Default ───────────────────────────────────────────

static DEFAULT_TRANSLATOR: LazyLock<RwLock<Option<Translator>>> =
    LazyLock::new(|| RwLock::new(None));

/// Install the process-wide default translator.
pub fn set_default(translator: Translator) {
    *DEFAULT_TRANSLATOR.write() = Some(translator);
    debug!("Default translator installed");
}

/// Remove the process-wide default; templates render untranslated again.
pub fn reset_default() {
    *DEFAULT_TRANSLATOR.write() = None;
    debug!("Default translator reset");
}

/// Current process-wide default, if any.
pub fn default_translator() -> Option<Translator> {
    DEFAULT_TRANSLATOR.read().clone()
}

/// Load a catalog file and install it as the process-wide default.
///
/// # Errors
///
/// Returns `EzcError::Config` if the catalog cannot be loaded.
pub fn install_catalog(path: &Path) -> EzcResult<()> {
    let catalog = Catalog::load(path)?;
    debug!(
        "Installing catalog '{}' ({} entries) as default translator",
        catalog.locale(),
        catalog.messages.len()
    );
    set_default(Translator::from_catalog(catalog));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_passes_through() {
        assert_eq!(Translator::identity().translate("{self.x}"), "{self.x}");
    }

    #[test]
    fn catalog_translator_falls_back_to_template() {
        let mut catalog = Catalog::new("de");
        catalog.insert("Hello {self.who}", "Hallo {self.who}");
        catalog.insert("Bye", "");
        let translator = Translator::from(catalog);

        assert_eq!(translator.translate("Hello {self.who}"), "Hallo {self.who}");
        assert_eq!(translator.translate("Bye"), "Bye");
        assert_eq!(translator.translate("unknown"), "unknown");
    }

    #[test]
    fn explicit_translator_wins() {
        let upper = Translator::new(|t| t.to_uppercase());
        let lower = Translator::new(|t| t.to_lowercase());

        let custom = Translation::Custom(lower.clone());
        let resolved = custom.resolve(Some(&upper)).unwrap();
        assert_eq!(resolved.translate("Ab"), "AB");

        let resolved = custom.resolve(None).unwrap();
        assert_eq!(resolved.translate("Ab"), "ab");

        assert!(Translation::Disabled.resolve(None).is_none());
        assert_eq!(
            Translation::Disabled.resolve(Some(&lower)).unwrap().translate("Ab"),
            "ab"
        );
    }
}
