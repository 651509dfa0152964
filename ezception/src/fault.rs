//! Error instances.
//!
//! A [`Fault`] is one occurrence of a [`Kind`]: the kind plus the keyword
//! data captured where the error happened. Its text is never stored; every
//! `Display` renders the kind's primary message against the data again.

use std::fmt;

use ezc::consts::{PRIMARY_MESSAGE, RENDER_FAILED_TEXT, detail_attribute, is_message_attribute};

use crate::error::{EzcError, EzcResult};
use crate::kind::{Attr, Kind};
use crate::message::{Bound, Message};
use crate::template::Subject;
use crate::value::{Args, Value, repr_str};

/// One occurrence of an error kind.
#[derive(Clone)]
pub struct Fault {
    kind: Kind,
    data: Args,
}

impl Fault {
    pub fn new(kind: &Kind) -> Self {
        Self::from_data(kind, Args::new())
    }

    /// Fault carrying `data` verbatim.
    pub fn from_data(kind: &Kind, data: Args) -> Self {
        Self {
            kind: kind.clone(),
            data,
        }
    }

    /// Attach one keyword datum.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn data(&self) -> &Args {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// True if the fault's kind is `kind` or descends from it.
    pub fn is_a(&self, kind: &Kind) -> bool {
        self.kind.is_a(kind)
    }

    /// `Err(self)`, for `return kind.fault().with(..).err()`.
    pub fn err<T>(self) -> Result<T, Self> {
        Err(self)
    }

    // ─── Messages ───────────────────────────────────────────────────

    /// Descriptor behind `attribute`, bound to this fault.
    pub fn message(&self, attribute: &str) -> Option<Bound<'_>> {
        self.kind
            .descriptor(attribute)
            .map(|message| Message::bind(message, self))
    }

    /// Detail descriptor (`details` → `ezmsg_details`), bound to this fault.
    pub fn detail_message(&self, detail: &str) -> Option<Bound<'_>> {
        self.message(&detail_attribute(detail))
    }

    /// Render the primary message. No message along the chain renders `""`.
    pub fn render_primary(&self) -> EzcResult<String> {
        self.render_primary_at(0)
    }

    /// Render detail message `detail`.
    ///
    /// # Errors
    ///
    /// `AttributeLookup("ezmsg_<detail>")` if no kind along the chain
    /// declares it; rendering errors otherwise.
    pub fn render_detail(&self, detail: &str) -> EzcResult<String> {
        self.render_detail_at(detail, 0)
    }

    /// Resolve an attribute the way `{self.<name>}` does.
    ///
    /// Order: fault data, kind attributes (messages are rendered), then
    /// detail message `name`. Reserved `ezmsg*` names skip the data and
    /// never reach the detail fallback.
    pub fn attribute(&self, name: &str) -> EzcResult<Value> {
        self.attribute_at(name, 0)
    }

    /// Last line of a traceback: `Qualname: text`, or just the qualname.
    pub fn describe(&self) -> String {
        let text = self.to_string();
        if text.is_empty() {
            self.kind.qualname().to_string()
        } else {
            format!("{}: {}", self.kind.qualname(), text)
        }
    }

    fn render_primary_at(&self, depth: usize) -> EzcResult<String> {
        match self.kind.lookup(PRIMARY_MESSAGE) {
            None | Some(Attr::Value(Value::None)) => Ok(String::new()),
            Some(Attr::Value(_)) => Err(EzcError::NotAMessage(PRIMARY_MESSAGE.to_string())),
            Some(Attr::Message(message)) => message.bind(self).at_depth(depth).render(),
        }
    }

    fn render_detail_at(&self, detail: &str, depth: usize) -> EzcResult<String> {
        let attribute = detail_attribute(detail);
        match self.kind.lookup(&attribute) {
            None => Err(EzcError::AttributeLookup(attribute)),
            Some(Attr::Value(Value::None)) => Ok(String::new()),
            Some(Attr::Value(_)) => Err(EzcError::NotAMessage(attribute)),
            Some(Attr::Message(message)) => message.bind(self).at_depth(depth + 1).render(),
        }
    }

    fn attribute_at(&self, name: &str, depth: usize) -> EzcResult<Value> {
        let reserved = is_message_attribute(name);
        if !reserved {
            if let Some(value) = self.data.get(name) {
                return Ok(value.clone());
            }
        }
        match self.kind.lookup(name) {
            Some(Attr::Value(value)) => Ok(value.clone()),
            Some(Attr::Message(message)) => message
                .bind(self)
                .at_depth(depth + 1)
                .render()
                .map(Value::Str),
            None if reserved => Err(EzcError::AttributeLookup(name.to_string())),
            None => self.render_detail_at(name, depth).map(Value::Str),
        }
    }
}

impl Subject for Fault {
    fn attribute(&self, name: &str, depth: usize) -> EzcResult<Value> {
        self.attribute_at(name, depth)
    }

    fn text(&self, depth: usize) -> EzcResult<String> {
        self.render_primary_at(depth + 1)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render_primary() {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str(RENDER_FAILED_TEXT),
        }
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr_str(&self.to_string()))
    }
}

impl std::error::Error for Fault {}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> Kind {
        Kind::declare("NotFoundError")
            .message("{self.what!r} was not found")
            .detail("details", "Could not find {self.what!r} in {self.where!r}")
            .attr("where", "<unknown>")
            .build()
            .unwrap()
    }

    #[test]
    fn primary_and_detail() {
        let fault = not_found().fault().with("what", "x").with("where", "/y/");
        assert_eq!(fault.to_string(), "'x' was not found");
        assert_eq!(
            fault.render_detail("details").unwrap(),
            "Could not find 'x' in '/y/'"
        );
        assert_eq!(fault.describe(), "NotFoundError: 'x' was not found");
    }

    #[test]
    fn kind_defaults_fill_missing_data() {
        let fault = not_found().fault().with("what", "x");
        assert_eq!(
            fault.render_detail("details").unwrap(),
            "Could not find 'x' in '<unknown>'"
        );
    }

    #[test]
    fn undefined_detail_is_attribute_lookup() {
        let fault = not_found().fault();
        assert_eq!(
            fault.render_detail("nope"),
            Err(EzcError::AttributeLookup("ezmsg_nope".to_string()))
        );
        assert_eq!(
            fault.attribute("nope"),
            Err(EzcError::AttributeLookup("ezmsg_nope".to_string()))
        );
        assert_eq!(
            fault.attribute("ezmsg_nope"),
            Err(EzcError::AttributeLookup("ezmsg_nope".to_string()))
        );
    }

    #[test]
    fn attribute_reaches_detail_message() {
        let fault = not_found().fault().with("what", "x");
        assert_eq!(
            fault.attribute("details").unwrap(),
            Value::from("Could not find 'x' in '<unknown>'")
        );
        assert_eq!(fault.attribute("what").unwrap(), Value::from("x"));
    }

    #[test]
    fn data_never_shadows_messages() {
        let fault = not_found().fault().with("what", "x").with("ezmsg", "hijack");
        assert_eq!(fault.to_string(), "'x' was not found");
        assert_eq!(
            fault.attribute("ezmsg").unwrap(),
            Value::from("'x' was not found")
        );
    }

    #[test]
    fn no_message_renders_empty() {
        let kind = Kind::declare("Silent").build().unwrap();
        let fault = kind.fault().with("anything", 1);
        assert_eq!(fault.to_string(), "");
        assert_eq!(fault.describe(), "Silent");
    }

    #[test]
    fn render_failure_is_contained_in_display() {
        let kind = Kind::declare("Broken").message("{self.missing}").build().unwrap();
        let fault = kind.fault();
        assert!(fault.render_primary().is_err());
        assert_eq!(fault.to_string(), RENDER_FAILED_TEXT);
    }

    #[test]
    fn self_in_detail_renders_primary() {
        let kind = Kind::declare("Wrapped")
            .message("bad {self.x}")
            .detail("context", "[{self}] while loading")
            .build()
            .unwrap();
        let fault = kind.fault().with("x", 1);
        assert_eq!(fault.render_detail("context").unwrap(), "[bad 1] while loading");
    }

    #[test]
    fn self_referential_message_hits_depth_limit() {
        let kind = Kind::declare("Loop").message("{self}").build().unwrap();
        let fault = kind.fault();
        assert!(matches!(
            fault.render_primary(),
            Err(EzcError::RecursionLimit(_))
        ));
        assert_eq!(fault.to_string(), RENDER_FAILED_TEXT);
    }

    #[test]
    fn bound_message_overrides() {
        let kind = Kind::declare("Greeting")
            .message_with(Message::new("{greeting} {self.who}").with_default("greeting", "Hello"))
            .build()
            .unwrap();
        let fault = kind.fault().with("who", "you");
        let bound = fault.message("ezmsg").unwrap();
        assert_eq!(bound.render().unwrap(), "Hello you");
        assert_eq!(
            fault.message("ezmsg").unwrap().with("greeting", "Bye").render().unwrap(),
            "Bye you"
        );
        assert!(fault.detail_message("none").is_none());
    }

    #[test]
    fn plain_value_under_reserved_name() {
        let kind = Kind::declare("Odd").attr("ezmsg_count", 3).build().unwrap();
        assert_eq!(
            kind.fault().render_detail("count"),
            Err(EzcError::NotAMessage("ezmsg_count".to_string()))
        );
    }

    #[test]
    fn debug_quotes_text() {
        let fault = not_found().fault().with("what", "x");
        assert_eq!(format!("{fault:?}"), "\"'x' was not found\"");

        let silent = Kind::declare("SilentDebug").build().unwrap();
        assert_eq!(format!("{:?}", silent.fault()), "''");
    }
}
