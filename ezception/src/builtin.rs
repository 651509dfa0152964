//! Standard kinds.
//!
//! The conventional error hierarchy, declared once on first use. These kinds
//! carry no messages; they exist to be mixed into a taxonomy so that faults
//! can be tested against well known categories:
//!
//! ```text
//! BaseException
//! └── Exception
//!     ├── ArithmeticError
//!     │   └── ZeroDivisionError
//!     ├── LookupError
//!     │   ├── IndexError
//!     │   └── KeyError
//!     ├── AttributeError
//!     ├── TypeError
//!     ├── ValueError
//!     ├── RuntimeError
//!     │   └── NotImplementedError
//!     ├── OSError
//!     │   ├── FileNotFoundError
//!     │   └── PermissionError
//!     └── EZCeption (taxonomy root)
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use ezc::consts::{PRIMARY_MESSAGE, ROOT_KIND_NAME};

use crate::kind::{Attr, Kind, declare_single};
use crate::value::Value;

struct Builtins {
    base_exception: Kind,
    exception: Kind,
    arithmetic_error: Kind,
    zero_division_error: Kind,
    lookup_error: Kind,
    index_error: Kind,
    key_error: Kind,
    attribute_error: Kind,
    type_error: Kind,
    value_error: Kind,
    runtime_error: Kind,
    not_implemented_error: Kind,
    os_error: Kind,
    file_not_found_error: Kind,
    permission_error: Kind,
}

impl Builtins {
    fn declare() -> Self {
        fn child(name: &str, base: &Kind) -> Kind {
            declare_single(name, Some(base), BTreeMap::new())
        }

        let base_exception = declare_single("BaseException", None, BTreeMap::new());
        let exception = child("Exception", &base_exception);
        let arithmetic_error = child("ArithmeticError", &exception);
        let zero_division_error = child("ZeroDivisionError", &arithmetic_error);
        let lookup_error = child("LookupError", &exception);
        let index_error = child("IndexError", &lookup_error);
        let key_error = child("KeyError", &lookup_error);
        let attribute_error = child("AttributeError", &exception);
        let type_error = child("TypeError", &exception);
        let value_error = child("ValueError", &exception);
        let runtime_error = child("RuntimeError", &exception);
        let not_implemented_error = child("NotImplementedError", &runtime_error);
        let os_error = child("OSError", &exception);
        let file_not_found_error = child("FileNotFoundError", &os_error);
        let permission_error = child("PermissionError", &os_error);

        Self {
            base_exception,
            exception,
            arithmetic_error,
            zero_division_error,
            lookup_error,
            index_error,
            key_error,
            attribute_error,
            type_error,
            value_error,
            runtime_error,
            not_implemented_error,
            os_error,
            file_not_found_error,
            permission_error,
        }
    }
}

static BUILTINS: LazyLock<Builtins> = LazyLock::new(Builtins::declare);

static ROOT: LazyLock<Kind> = LazyLock::new(|| {
    let attrs = BTreeMap::from([(PRIMARY_MESSAGE.to_string(), Attr::Value(Value::None))]);
    declare_single(ROOT_KIND_NAME, Some(exception()), attrs)
});

/// The taxonomy root. Every kind derived from it is an `Exception`; it has
/// no primary message of its own.
pub fn root() -> &'static Kind {
    &ROOT
}

pub fn base_exception() -> &'static Kind {
    &BUILTINS.base_exception
}

pub fn exception() -> &'static Kind {
    &BUILTINS.exception
}

pub fn arithmetic_error() -> &'static Kind {
    &BUILTINS.arithmetic_error
}

pub fn zero_division_error() -> &'static Kind {
    &BUILTINS.zero_division_error
}

pub fn lookup_error() -> &'static Kind {
    &BUILTINS.lookup_error
}

pub fn index_error() -> &'static Kind {
    &BUILTINS.index_error
}

pub fn key_error() -> &'static Kind {
    &BUILTINS.key_error
}

pub fn attribute_error() -> &'static Kind {
    &BUILTINS.attribute_error
}

pub fn type_error() -> &'static Kind {
    &BUILTINS.type_error
}

pub fn value_error() -> &'static Kind {
    &BUILTINS.value_error
}

pub fn runtime_error() -> &'static Kind {
    &BUILTINS.runtime_error
}

pub fn not_implemented_error() -> &'static Kind {
    &BUILTINS.not_implemented_error
}

pub fn os_error() -> &'static Kind {
    &BUILTINS.os_error
}

pub fn file_not_found_error() -> &'static Kind {
    &BUILTINS.file_not_found_error
}

pub fn permission_error() -> &'static Kind {
    &BUILTINS.permission_error
}

/// Every standard kind, parents before children.
pub fn all() -> [&'static Kind; 15] {
    let b = &*BUILTINS;
    [
        &b.base_exception,
        &b.exception,
        &b.arithmetic_error,
        &b.zero_division_error,
        &b.lookup_error,
        &b.index_error,
        &b.key_error,
        &b.attribute_error,
        &b.type_error,
        &b.value_error,
        &b.runtime_error,
        &b.not_implemented_error,
        &b.os_error,
        &b.file_not_found_error,
        &b.permission_error,
    ]
}

/// Standard kind by name (`"KeyError"`), or the root by its name.
pub fn lookup(name: &str) -> Option<&'static Kind> {
    if name == ROOT_KIND_NAME {
        return Some(root());
    }
    all().into_iter().find(|kind| kind.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_shape() {
        assert!(key_error().is_a(lookup_error()));
        assert!(key_error().is_a(exception()));
        assert!(key_error().is_a(base_exception()));
        assert!(!key_error().is_a(index_error()));
        assert!(zero_division_error().is_a(arithmetic_error()));
        assert!(permission_error().is_a(os_error()));
        assert!(exception().is_a(base_exception()));
        assert!(base_exception().mro().is_empty());
    }

    #[test]
    fn declared_once() {
        assert_eq!(type_error(), type_error());
        assert_eq!(exception().id(), exception().id());
        assert_eq!(lookup("TypeError"), Some(type_error()));
        assert_eq!(lookup("NoSuchError"), None);
    }

    #[test]
    fn root_is_silent_exception() {
        let root = root();
        assert_eq!(root.qualname(), ROOT_KIND_NAME);
        assert!(root.is_a(exception()));
        assert!(!root.is_anonymous());
        assert!(root.primary().is_none());
        assert_eq!(root.fault().to_string(), "");
        assert_eq!(lookup(ROOT_KIND_NAME), Some(root));
    }

    #[test]
    fn builtins_render_empty() {
        assert!(all().iter().all(|kind| kind.fault().to_string().is_empty()));
    }
}
