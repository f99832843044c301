//! Property-based invariant tests for after-relationship ordering.
//!
//! 1. Output is a permutation of the input
//! 2. Ordering is idempotent and independent of input order
//! 3. Categories always precede leaves
//! 4. Every resolved item appears after the item it names
//! 5. Problem items form the sorted tail of their group

use std::collections::HashMap;

use node_repository::{order, ItemKind, Orderable};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct Item {
    id: String,
    name: String,
    after: String,
    kind: ItemKind,
}

impl Orderable for Item {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn after_id(&self) -> &str {
        &self.after
    }

    fn kind(&self) -> ItemKind {
        self.kind
    }
}

/// Unique ids `i0..iN`; after ids point at existing ids, missing ones, or nothing.
fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    (0usize..24).prop_flat_map(|len| {
        prop::collection::vec(
            (
                prop_oneof![Just(None::<usize>), (0usize..30).prop_map(Some)],
                "[a-d]{1,2}",
                any::<bool>(),
            ),
            len,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(index, (after, name, is_category))| Item {
                    id: format!("i{}", index),
                    name,
                    after: after.map(|a| format!("i{}", a)).unwrap_or_default(),
                    kind: if is_category {
                        ItemKind::Category
                    } else {
                        ItemKind::Leaf
                    },
                })
                .collect()
        })
    })
}

fn ids(items: &[Item]) -> Vec<String> {
    items.iter().map(|i| i.id.clone()).collect()
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn output_is_permutation(items in items_strategy()) {
        let result = order(items.clone()).unwrap();
        let mut expected = ids(&items);
        let mut actual = ids(&result.items);
        expected.sort();
        actual.sort();
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn ordering_is_idempotent(items in items_strategy()) {
        let first = order(items.clone()).unwrap();
        let second = order(items).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn input_order_does_not_matter(items in items_strategy()) {
        let mut reversed = items.clone();
        reversed.reverse();
        let forward = order(items).unwrap();
        let backward = order(reversed).unwrap();
        prop_assert_eq!(ids(&forward.items), ids(&backward.items));
        prop_assert_eq!(ids(&forward.problems), ids(&backward.problems));
    }

    #[test]
    fn categories_precede_leaves(items in items_strategy()) {
        let result = order(items).unwrap();
        let first_leaf = result
            .items
            .iter()
            .position(|i| i.kind == ItemKind::Leaf)
            .unwrap_or(result.items.len());
        prop_assert!(result.items[first_leaf..].iter().all(|i| i.kind == ItemKind::Leaf));
    }

    #[test]
    fn resolved_items_follow_their_target(items in items_strategy()) {
        let result = order(items).unwrap();
        let position: HashMap<&str, usize> = result
            .items
            .iter()
            .enumerate()
            .map(|(p, i)| (i.id.as_str(), p))
            .collect();

        for item in &result.items {
            if item.after.is_empty() || result.problems.contains(item) {
                continue;
            }
            prop_assert!(position[item.after.as_str()] < position[item.id.as_str()]);
        }
    }

    #[test]
    fn problems_are_sorted_group_tail(items in items_strategy()) {
        let result = order(items).unwrap();
        for kind in [ItemKind::Category, ItemKind::Leaf] {
            let group: Vec<&Item> = result.items.iter().filter(|i| i.kind == kind).collect();
            let problems: Vec<&Item> = result.problems.iter().filter(|i| i.kind == kind).collect();
            let tail = &group[group.len() - problems.len()..];
            prop_assert_eq!(tail, &problems[..]);
            for pair in problems.windows(2) {
                prop_assert!(pair[0].compare_order(pair[1]).is_lt());
            }
        }
    }

    #[test]
    fn items_without_after_are_never_problems(items in items_strategy()) {
        let result = order(items).unwrap();
        prop_assert!(result.problems.iter().all(|i| !i.after.is_empty()));
    }
}
