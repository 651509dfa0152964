//! Naming of anonymous kinds.
//!
//! A kind derived without a name is anonymous: its display name is
//! synthesized from its parent and message, and it has no identity of its
//! own yet. When the kind is placed in a container, the attribute it sits
//! under becomes its qualified name.
//!
//! Identities are written once. A kind reachable under two attribute names
//! keeps the first one the resolver visits; members are visited in sorted
//! attribute order.

use tracing::{debug, trace};

use crate::kind::Kind;

/// Name every anonymous kind among `members` after its attribute.
///
/// Already named kinds, explicitly named or not, are left untouched.
/// Returns the number of kinds that received a name.
pub fn resolve<'a, I>(members: I) -> usize
where
    I: IntoIterator<Item = (&'a str, &'a Kind)>,
{
    let mut named = 0;
    for (attribute, kind) in members {
        if !kind.declared_anonymous() {
            continue;
        }
        if kind.assign_qualname(attribute) {
            debug!("Named anonymous kind {} {} as {}", kind.id(), kind.name(), attribute);
            named += 1;
        } else if kind.qualname() != attribute {
            trace!(
                "Kind {} already named {}, keeping it over alias {}",
                kind.id(),
                kind.qualname(),
                attribute
            );
        }
    }
    named
}
