//! Main test module for snapchain
//!
//! This module includes all test suites:
//! - Integration tests against directory remotes
//! - Property-based tests for chain invariants
//! - Edge cases in listing contents

pub mod property;

#[cfg(test)]
mod edge_cases {
    use ::snapchain::*;

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::from_names(names.iter().copied())
    }

    #[test]
    fn test_reference_examples() {
        let c = catalog(&["a.index.full", "b.index.incr", "c.index.incr"]);
        assert_eq!(
            c.backups(),
            &[Backup::full("a"), Backup::incremental("b"), Backup::incremental("c")]
        );

        let expected = vec![Backup::incremental("c"), Backup::incremental("b"), Backup::full("a")];
        assert_eq!(c.resolve_chain(&Selector::named("c")).unwrap().backups(), expected.as_slice());
        assert_eq!(c.resolve_chain(&Selector::Latest).unwrap().backups(), expected.as_slice());

        let c = catalog(&["a.index.full", "b.index.full"]);
        assert_eq!(c.resolve_chain(&Selector::named("a")).unwrap().backups(), &[Backup::full("a")]);

        assert!(c.resolve_chain(&Selector::named("nope")).unwrap_err().is_not_found());

        let c = catalog(&["a.index.incr"]);
        assert!(c.resolve_chain(&Selector::named("a")).unwrap_err().is_invalid_chain());
    }

    #[test]
    fn test_only_unrecognized_objects() {
        let c = catalog(&["a.data", "b.index", "index.full", ".index.incr"]);
        assert!(c.is_empty());
        assert!(c.resolve_chain(&Selector::Latest).unwrap_err().is_not_found());
    }

    #[test]
    fn test_names_with_dots_and_slashes() {
        let c = catalog(&["host-1/2024.01.01.index.full", "host-1/2024.01.02.index.incr"]);
        assert_eq!(c.names(), vec!["host-1/2024.01.01", "host-1/2024.01.02"]);

        let chain = c.resolve_chain(&Selector::named("host-1/2024.01.02")).unwrap();
        assert_eq!(chain.base().name, "host-1/2024.01.01");
    }

    #[test]
    fn test_same_name_both_kinds() {
        // First occurrence wins for lookups
        let c = catalog(&["a.index.full", "a.index.incr"]);
        assert_eq!(c.find("a").unwrap(), &Backup::full("a"));
        assert_eq!(c.resolve_chain(&Selector::named("a")).unwrap().len(), 1);

        let latest = c.resolve_chain(&Selector::Latest).unwrap();
        assert_eq!(latest.target(), &Backup::incremental("a"));
        assert_eq!(latest.len(), 2);
    }

    #[test]
    fn test_long_incremental_run() {
        let mut names = vec!["base.index.full".to_string()];
        names.extend((0..1000).map(|i| format!("inc{:04}.index.incr", i)));
        let c = Catalog::from_names(&names);

        let chain = c.resolve_chain(&Selector::Latest).unwrap();
        assert_eq!(chain.len(), 1001);
        assert_eq!(chain.target().name, "inc0999");
        assert_eq!(chain.base().name, "base");
        assert_eq!(chain.summary().incrementals, 1000);
    }

    #[test]
    fn test_selector_display_roundtrip() {
        for input in ["latest", "2024-01-01"] {
            let selector: Selector = input.parse().unwrap();
            assert_eq!(selector.to_string(), input);
        }
    }
}
