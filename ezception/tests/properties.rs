//! Property tests for rendering and ancestry

use ezception::{Kind, Message, Value, registry, root};
use proptest::prelude::*;

proptest! {
    #[test]
    fn literal_templates_render_verbatim(text in "[^{}]{0,40}") {
        let message = Message::new(text.clone());
        let owner = ezception::Args::new();
        prop_assert_eq!(message.bind(&owner).render().unwrap(), text);
    }

    #[test]
    fn escaped_braces_render_single(text in "[a-z ]{0,20}") {
        let message = Message::new(format!("{{{{{text}}}}}"));
        let owner = ezception::Args::new();
        prop_assert_eq!(message.bind(&owner).render().unwrap(), format!("{{{text}}}"));
    }

    #[test]
    fn data_is_substituted_exactly(what in "[a-zA-Z0-9 /._-]{0,30}", count in any::<i64>()) {
        let kind = Kind::declare("PropKind")
            .message("{self.what} x{self.count}")
            .build()
            .unwrap();
        let fault = kind.fault().with("what", what.as_str()).with("count", count);
        prop_assert_eq!(fault.to_string(), format!("{what} x{count}"));
        prop_assert_eq!(fault.to_string(), fault.to_string());
    }

    #[test]
    fn string_repr_round_trips_quotes(text in "[a-z']{0,10}") {
        let repr = Value::from(text.as_str()).repr();
        prop_assert!(repr.starts_with('\'') || repr.starts_with('"'));
        prop_assert_eq!(repr.chars().next(), repr.chars().last());
    }

    #[test]
    fn derive_chain_ancestry(depth in 1usize..8) {
        let mut chain = vec![root().clone()];
        for _ in 0..depth {
            let next = chain.last().unwrap().derive_empty().build().unwrap();
            chain.push(next);
        }
        let leaf = chain.last().unwrap();
        for ancestor in &chain {
            prop_assert!(leaf.is_a(ancestor));
            prop_assert!(ancestor.is_a(ancestor));
        }
        prop_assert!(!chain[0].is_a(leaf));
    }

    #[test]
    fn templates_register_once(suffix in "[a-z]{1,12}") {
        let template = format!("properties {suffix} {{self.x}}");
        Message::new(template.clone());
        Message::new(template.clone());
        let count = registry::templates().iter().filter(|t| **t == template).count();
        prop_assert_eq!(count, 1);
    }
}
