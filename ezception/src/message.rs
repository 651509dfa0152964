//! Message descriptors.
//!
//! A [`Message`] is a template plus the translation policy and default
//! keywords it renders with. It is rendered on demand, against an owner
//! (`{self}`), as many times as needed:
//!
//! ```rust
//! use ezception::message::Message;
//! use ezception::value::{Args, Value};
//!
//! let hello = Message::new("Hello {self.who!r}");
//! let record: Args = [("who".to_string(), Value::from("world"))].into();
//! assert_eq!(hello.bind(&record).render().unwrap(), "Hello 'world'");
//! ```
//!
//! Constructing a message records its template in the process-wide
//! template registry ([`crate::registry::templates`]).

use std::borrow::Cow;

use crate::error::{EzcError, EzcResult};
use crate::registry;
use crate::template::{self, Scope, Subject};
use crate::translate::{Translation, Translator};
use crate::value::{Args, Value};

/// A lazily rendered, optionally translated template.
#[derive(Debug, Clone)]
pub struct Message {
    template: String,
    translation: Translation,
    defaults: Args,
}

impl Message {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        registry::register_template(&template);
        Self {
            template,
            translation: Translation::Inherit,
            defaults: Args::new(),
        }
    }

    /// Translate with `translator` instead of the process-wide default.
    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translation = Translation::Custom(translator);
        self
    }

    /// Always render the template as declared.
    pub fn without_translation(mut self) -> Self {
        self.translation = Translation::Disabled;
        self
    }

    /// Bind a default keyword; per-call overrides take precedence.
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn translation(&self) -> &Translation {
        &self.translation
    }

    pub fn defaults(&self) -> &Args {
        &self.defaults
    }

    /// Render against `owner`.
    ///
    /// The translator is `translator` if given, else the message's own
    /// binding, else the process default. Keywords are the bound defaults
    /// overlaid with `overrides`.
    pub fn render(
        &self,
        owner: &dyn Subject,
        translator: Option<&Translator>,
        overrides: &Args,
    ) -> EzcResult<String> {
        self.render_at(owner, translator, overrides, 0)
    }

    pub(crate) fn render_at(
        &self,
        owner: &dyn Subject,
        translator: Option<&Translator>,
        overrides: &Args,
        depth: usize,
    ) -> EzcResult<String> {
        let template: Cow<'_, str> = match self.translation.resolve(translator) {
            Some(translator) => Cow::Owned(translator.translate(&self.template)),
            None => Cow::Borrowed(&self.template),
        };
        let args: Cow<'_, Args> = if overrides.is_empty() {
            Cow::Borrowed(&self.defaults)
        } else {
            let mut merged = self.defaults.clone();
            merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
            Cow::Owned(merged)
        };
        template::render(
            &template,
            &Scope {
                owner,
                descriptor: Some(self as &dyn Subject),
                args: &args,
                depth,
            },
        )
    }

    /// Close over `owner`; the result renders on demand.
    pub fn bind<'a>(&'a self, owner: &'a dyn Subject) -> Bound<'a> {
        Bound {
            message: self,
            owner,
            translator: None,
            overrides: Args::new(),
            depth: 0,
        }
    }
}

/// `{ez}` is the raw template; `{ez.template}` likewise, and `{ez.<key>}`
/// reads a bound default.
impl Subject for Message {
    fn attribute(&self, name: &str, _depth: usize) -> EzcResult<Value> {
        if name == "template" {
            return Ok(Value::Str(self.template.clone()));
        }
        self.defaults
            .get(name)
            .cloned()
            .ok_or_else(|| EzcError::NoAttribute {
                owner: "message".to_string(),
                attribute: name.to_string(),
            })
    }

    fn text(&self, _depth: usize) -> EzcResult<String> {
        Ok(self.template.clone())
    }
}

/// A message bound to its owner, with pending per-call keywords.
pub struct Bound<'a> {
    message: &'a Message,
    owner: &'a dyn Subject,
    translator: Option<Translator>,
    overrides: Args,
    depth: usize,
}

impl<'a> Bound<'a> {
    pub(crate) fn at_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Override one keyword for this render.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Translate with `translator` for this render.
    pub fn translated_with(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn message(&self) -> &'a Message {
        self.message
    }

    pub fn render(&self) -> EzcResult<String> {
        self.message.render_at(
            self.owner,
            self.translator.as_ref(),
            &self.overrides,
            self.depth,
        )
    }
}
