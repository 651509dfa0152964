//! Error types for declaring kinds and rendering messages.

use ezc::config::ConfigError;
use thiserror::Error;

/// Template syntax errors, reported when a template is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A lone `{` or `}` outside a replacement field.
    #[error("Single '{0}' encountered in format string")]
    SingleBrace(char),

    /// Replacement field opened but never closed.
    #[error("expected '}}' before end of string")]
    Unterminated,

    /// Replacement field inside a replacement field.
    #[error("nested replacement field in '{{{0}'")]
    NestedField(String),

    /// `{}` or `{0}`: templates take keyword fields only.
    #[error("positional field '{{{0}}}' has no argument; templates only take keyword fields")]
    Positional(String),

    /// `!x` with an unknown conversion character.
    #[error("Unknown conversion specifier {0}")]
    UnknownConversion(String),

    /// Malformed `.attr` / `[index]` chain.
    #[error("malformed field accessor in '{0}'")]
    BadAccessor(String),

    /// Malformed format specifier.
    #[error("Invalid format specifier '{0}'")]
    BadSpec(String),
}

/// Errors raised by the framework.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EzcError {
    /// No attribute of that name anywhere along the kind chain.
    #[error("attribute '{0}' is not defined on the kind or its ancestors")]
    AttributeLookup(String),

    /// Template syntax error.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Template references a keyword nobody supplied.
    #[error("missing keyword '{0}'")]
    MissingKey(String),

    /// `.attr` on a value that has no attributes.
    #[error("'{owner}' object has no attribute '{attribute}'")]
    NoAttribute {
        /// Type name of the accessed value
        owner: String,
        /// Requested attribute
        attribute: String,
    },

    /// `[index]` on a value that is not a list.
    #[error("'{type_name}' object is not subscriptable")]
    NotIndexable {
        /// Type name of the accessed value
        type_name: String,
    },

    /// `[index]` outside the list, or not an integer.
    #[error("list index {index} out of range")]
    IndexOutOfRange {
        /// Index text as written in the template
        index: String,
    },

    /// Format specifier not applicable to the value.
    #[error("Unknown format code '{spec}' for object of type '{type_name}'")]
    FormatSpec {
        /// Specifier as written in the template
        spec: String,
        /// Type name of the formatted value
        type_name: String,
    },

    /// An `ezmsg*` attribute that holds a plain value.
    #[error("attribute '{0}' holds a value, not a message")]
    NotAMessage(String),

    /// Messages that keep rendering themselves.
    #[error("maximum render depth {0} exceeded")]
    RecursionLimit(usize),

    /// Bases admit no consistent resolution order.
    #[error("Cannot create a consistent resolution order for kind '{name}'")]
    InconsistentHierarchy {
        /// Kind being declared
        name: String,
    },

    /// Same base listed twice.
    #[error("duplicate base kind '{base}' for kind '{name}'")]
    DuplicateBase {
        /// Kind being declared
        name: String,
        /// Repeated base
        base: String,
    },

    /// Reading or writing an export document failed.
    #[error("export failed: {0}")]
    Export(String),

    /// Loading a translation catalog failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for framework operations.
pub type EzcResult<T> = Result<T, EzcError>;
