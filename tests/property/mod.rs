//! Property-based testing for snapchain
//!
//! Uses proptest to check chain invariants over randomly generated
//! listings of full, incremental and unrelated objects.

use ::snapchain::*;
use proptest::prelude::*;

/// One entry of a generated listing
#[derive(Debug, Clone)]
pub enum ListingEntry {
    Index(BackupKind),
    Junk(String),
}

fn kind_strategy() -> impl Strategy<Value = BackupKind> {
    prop_oneof![
        1 => Just(BackupKind::Full),
        3 => Just(BackupKind::Incremental),
    ]
}

/// Object names that never carry an index suffix
fn junk_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9]{1,8}\\.data\\.[0-9]{4}".prop_map(|s| s),
        "[a-z]{1,8}\\.index".prop_map(|s| s),
        "[a-z]{1,8}\\.index\\.full\\.tmp".prop_map(|s| s),
        "[A-Z]{3,10}".prop_map(|s| s),
    ]
}

fn listing_strategy() -> impl Strategy<Value = Vec<ListingEntry>> {
    prop::collection::vec(
        prop_oneof![
            4 => kind_strategy().prop_map(ListingEntry::Index),
            1 => junk_strategy().prop_map(ListingEntry::Junk),
        ],
        0..60,
    )
}

/// Render a generated listing to object names plus the expected backups
fn render(entries: &[ListingEntry]) -> (Vec<String>, Vec<Backup>) {
    let mut names = Vec::new();
    let mut expected = Vec::new();

    for entry in entries {
        match entry {
            ListingEntry::Index(kind) => {
                let backup = Backup::new(format!("b{:04}", expected.len()), *kind);
                names.push(backup.object_name());
                expected.push(backup);
            }
            ListingEntry::Junk(name) => names.push(name.clone()),
        }
    }

    (names, expected)
}

/// Position of the nearest full backup at or before `index`
fn nearest_full(backups: &[Backup], index: usize) -> Option<usize> {
    (0..=index).rev().find(|&i| backups[i].is_full())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Catalog holds exactly the index objects, in listing order
    #[test]
    fn catalog_keeps_only_index_objects(entries in listing_strategy()) {
        let (names, expected) = render(&entries);
        let catalog = Catalog::from_names(&names);
        prop_assert_eq!(catalog.backups(), expected.as_slice());
    }

    /// Every named chain starts at the target, ends at a full backup and
    /// covers a contiguous run of the catalog
    #[test]
    fn named_chains_are_contiguous(entries in listing_strategy()) {
        let (names, expected) = render(&entries);
        let resolver = ChainResolver::new(MemoryRemote::new(names));

        for (index, backup) in expected.iter().enumerate() {
            let result = resolver.find_chain(&Selector::named(backup.name.clone()));

            match nearest_full(&expected, index) {
                Some(base) => {
                    let chain = result.unwrap();
                    prop_assert_eq!(&chain.target().name, &backup.name);
                    prop_assert!(chain.base().is_full());
                    prop_assert_eq!(chain.target_index(), index);
                    prop_assert_eq!(chain.base_index(), base);

                    let run: Vec<Backup> = expected[base..=index].iter().rev().cloned().collect();
                    prop_assert_eq!(chain.backups(), run.as_slice());

                    // Nothing but incrementals between target and base
                    prop_assert!(chain.backups()[..chain.len() - 1].iter().all(Backup::is_incremental));
                }
                None => {
                    prop_assert!(result.unwrap_err().is_invalid_chain());
                }
            }
        }
    }

    /// `latest` resolves to the last catalog entry
    #[test]
    fn latest_targets_last_backup(entries in listing_strategy()) {
        let (names, expected) = render(&entries);
        let resolver = ChainResolver::new(MemoryRemote::new(names));
        let result = resolver.find_chain(&Selector::Latest);

        match expected.last() {
            None => prop_assert!(result.unwrap_err().is_not_found()),
            Some(last) => match nearest_full(&expected, expected.len() - 1) {
                Some(_) => {
                    let chain = result.unwrap();
                    prop_assert_eq!(chain.target(), last)
                }
                None => prop_assert!(result.unwrap_err().is_invalid_chain()),
            },
        }
    }

    /// `find_backup` agrees with the head of `find_chain`
    #[test]
    fn find_backup_matches_chain_head(entries in listing_strategy()) {
        let (names, expected) = render(&entries);
        let resolver = ChainResolver::new(MemoryRemote::new(names));

        for backup in &expected {
            let found = resolver.find_backup(&backup.name).unwrap();
            prop_assert_eq!(&found, backup);

            if let Ok(chain) = resolver.find_chain(&Selector::named(backup.name.clone())) {
                prop_assert_eq!(chain.target(), &found);
            }
        }
    }

    /// Restore order is the exact reverse of chain order
    #[test]
    fn restore_order_reverses_chain(entries in listing_strategy()) {
        let (names, _) = render(&entries);
        let catalog = Catalog::from_names(&names);

        if let Ok(chain) = catalog.resolve_chain(&Selector::Latest) {
            let mut forward: Vec<&Backup> = chain.iter().collect();
            forward.reverse();
            let restore: Vec<&Backup> = chain.restore_order().collect();
            prop_assert_eq!(forward, restore);
            prop_assert!(chain.restore_order().next().unwrap().is_full());
        }
    }
}
