//! Property-based invariant tests for the byte trie.
//!
//! A `BTreeMap<Vec<u8>, u32>` is the reference model. Keys are drawn from a
//! four-byte alphabet so prefixes are shared heavily.
//!
//! 1. Lookups agree with the model after any insert/remove sequence
//! 2. Iteration order equals the model's sorted order
//! 3. Pruning is idempotent and never changes contents
//! 4. After pruning, the node count equals the number of distinct prefixes
//! 5. After pruning, ambiguous search is sound and total

use std::collections::{BTreeMap, BTreeSet};
use std::ops::ControlFlow;

use n_trie::Trie;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Insert(Vec<u8>, u32),
    Remove(Vec<u8>),
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..4, 1..6)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (key_strategy(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        1 => key_strategy().prop_map(Op::Remove),
    ]
}

fn apply(ops: &[Op]) -> (Trie<u32>, BTreeMap<Vec<u8>, u32>) {
    let mut trie = Trie::default();
    let mut model = BTreeMap::new();
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let prev = trie.insert(k, *v).unwrap();
                assert_eq!(prev, model.insert(k.clone(), *v));
            }
            Op::Remove(k) => {
                assert_eq!(trie.remove(k), model.remove(k));
            }
        }
    }
    (trie, model)
}

// ═══════════════════════════════════════════════════════════════════════
// 1-2. Lookup and order agree with the model
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lookups_match_model(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let (trie, model) = apply(&ops);
        prop_assert_eq!(trie.len(), model.len());
        for op in &ops {
            let key = match op {
                Op::Insert(k, _) | Op::Remove(k) => k,
            };
            prop_assert_eq!(trie.get(key), model.get(key));
        }
    }

    #[test]
    fn iteration_matches_model_order(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let (trie, model) = apply(&ops);
        let got: Vec<(Vec<u8>, u32)> = trie.iter().map(|(k, &v)| (k, v)).collect();
        let want: Vec<(Vec<u8>, u32)> = model.into_iter().collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn visit_agrees_with_iter(
        ops in prop::collection::vec(op_strategy(), 0..60),
        prefix in prop::collection::vec(0u8..4, 0..3),
    ) {
        let (trie, _) = apply(&ops);
        let mut visited = Vec::new();
        let _ = trie.visit(&prefix, |k, &v| {
            visited.push((k.to_vec(), v));
            ControlFlow::Continue(())
        });
        let iterated: Vec<(Vec<u8>, u32)> =
            trie.iter_prefix(&prefix).map(|(k, &v)| (k, v)).collect();
        prop_assert_eq!(visited, iterated);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3-4. Pruning
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prune_is_idempotent(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let (mut trie, model) = apply(&ops);
        trie.prune();
        let nodes = trie.node_count();
        prop_assert_eq!(trie.prune(), 0);
        prop_assert_eq!(trie.node_count(), nodes);

        let got: Vec<(Vec<u8>, u32)> = trie.iter().map(|(k, &v)| (k, v)).collect();
        let want: Vec<(Vec<u8>, u32)> = model.into_iter().collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn pruned_trie_is_minimal(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let (mut trie, model) = apply(&ops);
        trie.prune();
        let prefixes: BTreeSet<&[u8]> = model
            .keys()
            .flat_map(|k| (1..=k.len()).map(move |n| &k[..n]))
            .collect();
        prop_assert_eq!(trie.node_count(), prefixes.len() + 1);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Ambiguous search soundness and totality
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ambiguous_search_matches_model(
        ops in prop::collection::vec(op_strategy(), 0..80),
        probe in key_strategy(),
    ) {
        let (mut trie, model) = apply(&ops);
        trie.prune();
        let hit = trie.search_ambiguous(&probe);

        let longer: BTreeSet<u8> = model
            .keys()
            .filter(|k| k.len() > probe.len() && k.starts_with(&probe))
            .map(|k| k[probe.len()])
            .collect();

        prop_assert_eq!(hit.value, model.get(&probe));
        prop_assert_eq!(hit.children, longer.len());

        // The hint is the smallest longer key's value.
        let smallest = model
            .range(probe.clone()..)
            .find(|(k, _)| k.len() > probe.len() && k.starts_with(&probe))
            .map(|(_, v)| v);
        prop_assert_eq!(hit.partial, smallest);
    }
}
