//! Declaration macros.
//!
//! [`kind!`](crate::kind!) derives one kind from a parent:
//!
//! | Form | Result |
//! |------|--------|
//! | `kind!(Parent[..])` | anonymous, no message |
//! | `kind!(Parent["tpl"])` | anonymous, primary message `tpl` |
//! | `kind!(Parent["Name" => ..])` | named `Name`, no message |
//! | `kind!(Parent["Name" => "tpl"])` | named `Name`, primary message `tpl` |
//!
//! `Parent` is a binding (`base`), a path (`errors::BASE`) or a call
//! (`builtin::root()`). Any form may be followed by `; extra, bases`. The
//! macro evaluates to `EzcResult<Kind>`.
//!
//! [`taxonomy!`](crate::taxonomy!) declares a whole container at once.
//! Members can derive from members declared before them, and anonymous
//! members are named after their attribute:
//!
//! ```rust
//! use ezception::{builtin, kind, taxonomy};
//!
//! let root = ezception::root();
//! let reader = taxonomy! {
//!     Reader {
//!         Error = root[..],
//!         OpenError = Error["Could not open {self.path!r}"],
//!         NotFoundError = OpenError["{self.path!r} was not found"] with [builtin::file_not_found_error()],
//!     }
//! }
//! .unwrap();
//!
//! let not_found = reader.get("NotFoundError").unwrap();
//! assert_eq!(not_found.qualname(), "NotFoundError");
//! assert!(not_found.is_a(reader.get("Error").unwrap()));
//! assert!(not_found.is_a(builtin::os_error()));
//!
//! let value_error = kind!(ezception::root()["BadValue" => "bad {self.value}"]; builtin::value_error()).unwrap();
//! assert_eq!(value_error.fault().with("value", 3).to_string(), "bad 3");
//! ```

/// Derive a kind from `Parent`; see the [module docs](crate::macros).
#[macro_export]
macro_rules! kind {
    (@derive $parent:expr; [..]) => {
        $parent.derive_empty()
    };
    (@derive $parent:expr; [$name:literal => ..]) => {
        $parent.derive_empty().named($name)
    };
    (@derive $parent:expr; [$name:literal => $template:literal]) => {
        $parent.derive($template).named($name)
    };
    (@derive $parent:expr; [$template:literal]) => {
        $parent.derive($template)
    };
    ($($parent:ident)::+ $(($($arg:tt)*))? [$($form:tt)*] $(; $($base:expr),+ $(,)?)?) => {
        $crate::kind!(@derive ($($parent)::+ $(($($arg)*))?); [$($form)*])
            $($(.with_base(&$base))+)?
            .build()
    };
}

/// Declare a container of derived kinds; see the [module docs](crate::macros).
///
/// Evaluates to `EzcResult<Container>`.
#[macro_export]
macro_rules! taxonomy {
    ($container:ident {
        $($member:ident = $parent:ident [$($form:tt)*] $(with [$($base:expr),+ $(,)?])?),* $(,)?
    }) => {
        (|| -> $crate::error::EzcResult<$crate::container::Container> {
            $(
                #[allow(non_snake_case)]
                let $member = $crate::kind!($parent[$($form)*] $(; $($base),+)?)?;
            )*
            Ok($crate::container::ContainerBuilder::new(stringify!($container))
                $(.member(stringify!($member), &$member))*
                .build())
        })()
    };
}

#[cfg(test)]
mod tests {
    use crate::builtin;
    use crate::kind::Kind;

    #[test]
    fn kind_forms() {
        let parent = Kind::declare("MacroParent").message("parent").build().unwrap();

        let anon = kind!(parent[..]).unwrap();
        assert!(anon.is_anonymous());
        assert_eq!(anon.fault().to_string(), "");

        let anon_msg = kind!(parent["hi {self.x}"]).unwrap();
        assert_eq!(anon_msg.name(), "MacroParent['hi {self.x}']");

        let named = kind!(parent["Named" => ..]).unwrap();
        assert_eq!(named.qualname(), "Named");
        assert!(!named.is_anonymous());

        let named_msg = kind!(parent["NamedMsg" => "{self.x}!"]; builtin::type_error()).unwrap();
        assert_eq!(named_msg.fault().with("x", 1).to_string(), "1!");
        assert!(named_msg.is_a(&parent));
        assert!(named_msg.is_a(builtin::type_error()));
    }

    #[test]
    fn kind_from_call_and_path() {
        let anon = kind!(builtin::root()[..]).unwrap();
        assert!(anon.is_a(builtin::root()));
        assert!(anon.is_anonymous());

        let nested = kind!(crate::builtin::root()["CallParent" => "{self.x}?"]; builtin::type_error())
            .unwrap();
        assert_eq!(nested.qualname(), "CallParent");
        assert_eq!(nested.fault().with("x", 2).to_string(), "2?");
        assert!(nested.is_a(builtin::type_error()));

        let trailing = kind!(builtin::root()["{self.y}"]; builtin::value_error(),).unwrap();
        assert!(trailing.is_a(builtin::value_error()));
    }

    #[test]
    fn taxonomy_names_members() {
        let base = Kind::declare("MacroTaxonomyBase").build().unwrap();
        let container = taxonomy! {
            Shapes {
                Error = base[..],
                Circle = Error["{self.r}"],
                Square = Error["Box" => ..] with [builtin::value_error()],
            }
        }
        .unwrap();

        assert_eq!(container.name(), "Shapes");
        assert_eq!(container.len(), 3);
        assert_eq!(container.get("Circle").unwrap().qualname(), "Circle");
        assert_eq!(container.get("Square").unwrap().qualname(), "Box");
        assert!(container.get("Square").unwrap().is_a(builtin::value_error()));
    }
}
