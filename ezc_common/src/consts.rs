//! Workspace-wide constants.
//!
//! Single source of truth for the reserved attribute names and render
//! limits. Imported by all crates; no duplication permitted.

/// Reserved attribute prefix. Attributes starting with it hold messages.
pub const MESSAGE_PREFIX: &str = "ezmsg";

/// Attribute holding the primary message of a kind.
pub const PRIMARY_MESSAGE: &str = MESSAGE_PREFIX;

/// Separator between the reserved prefix and a detail name (`ezmsg_details`).
pub const DETAIL_SEPARATOR: char = '_';

/// Name of the taxonomy root kind.
pub const ROOT_KIND_NAME: &str = "EZCeption";

/// Maximum nesting of renders (`{self}` / `{self.details}` inside messages).
pub const MAX_RENDER_DEPTH: usize = 32;

/// Default translation catalog path.
pub const DEFAULT_CATALOG_PATH: &str = "locale/messages.toml";

/// Text written in place of a message whose render failed.
pub const RENDER_FAILED_TEXT: &str = "<exception str() failed>";

/// Returns true if `name` lies in the reserved message namespace.
#[inline]
pub fn is_message_attribute(name: &str) -> bool {
    name.starts_with(MESSAGE_PREFIX)
}

/// Attribute name of the detail message `detail` (`details` → `ezmsg_details`).
pub fn detail_attribute(detail: &str) -> String {
    format!("{MESSAGE_PREFIX}{DETAIL_SEPARATOR}{detail}")
}
