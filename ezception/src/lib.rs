//! ezception: declarative error taxonomies
//!
//! Error kinds are declared once, at initialization time, as nodes of an
//! inheritance tree. Each kind carries a primary message template
//! (`ezmsg`) and any number of detail templates (`ezmsg_<name>`). A
//! [`Fault`] captures keyword data where the error happens; its text is
//! rendered from the templates on demand, translated by the active
//! [`Translator`] if one is configured.
//!
//! # Module Structure
//!
//! - [`value`] - Keyword data values and their text forms
//! - [`template`] - Replacement-field templates and the [`Subject`] trait
//! - [`message`] - Message descriptors ([`Message`])
//! - [`translate`] - Translation functions and the process-wide default
//! - [`kind`] - Taxonomy nodes ([`Kind`]) and the derive operation
//! - [`fault`] - Error instances
//! - [`naming`] - Naming of anonymous kinds
//! - [`container`] - Named groups of kinds
//! - [`registry`] - Process-wide template registry and kind table
//! - [`builtin`] - Standard kinds and the taxonomy [`root`]
//! - [`export`] - Serializable registry snapshots
//! - [`macros`] - `kind!` and `taxonomy!`
//!
//! # Usage
//!
//! ```rust
//! use ezception::Kind;
//!
//! let not_found = Kind::declare("NotFoundError")
//!     .base(ezception::root())
//!     .message("{self.what!r} was not found")
//!     .detail("details", "Could not find {self.what!r} in {self.where!r}")
//!     .build()
//!     .unwrap();
//!
//! let fault = not_found.fault().with("what", "x").with("where", "/y/");
//! assert_eq!(fault.to_string(), "'x' was not found");
//! assert_eq!(fault.render_detail("details").unwrap(), "Could not find 'x' in '/y/'");
//! assert!(fault.is_a(ezception::root()));
//! ```

pub mod builtin;
pub mod container;
pub mod error;
pub mod export;
pub mod fault;
pub mod kind;
pub mod macros;
pub mod message;
pub mod naming;
pub mod registry;
pub mod template;
pub mod translate;
pub mod value;

pub use builtin::root;
pub use container::{Container, ContainerBuilder};
pub use error::{EzcError, EzcResult, TemplateError};
pub use fault::Fault;
pub use kind::{Attr, Derive, Kind, KindBuilder, KindId};
pub use message::{Bound, Message};
pub use template::Subject;
pub use translate::{Translation, Translator};
pub use value::{Args, Value};

static_assertions::assert_impl_all!(Kind: Send, Sync);
static_assertions::assert_impl_all!(Fault: Send, Sync);
static_assertions::assert_impl_all!(Message: Send, Sync);
static_assertions::assert_impl_all!(Translator: Send, Sync);
