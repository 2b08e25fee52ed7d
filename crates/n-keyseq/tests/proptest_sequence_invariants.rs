//! Property-based invariant tests for the key sequence layer.
//!
//! A `BTreeMap<Vec<u8>, KeyCode>` is the reference model for the store.
//! Sequences are drawn from a small escape-sequence alphabet so prefixes
//! are shared heavily.
//!
//! 1. **Last write wins**: after any series of updates, lookups agree with
//!    the model.
//! 2. **Ambiguity soundness**: `match_prefix` reports a record exactly when
//!    the model has the probe, and a non-zero count exactly when the model
//!    has a longer key starting with it.
//! 3. **No-match totality**: a probe that is no prefix of any key is
//!    `NoMatch`.
//! 4. **Name decoding is total**: `decode` accepts any string and consumes
//!    at least one character, ending on a char boundary.
//! 5. **Chunking invariance**: the decoder yields the same keys however the
//!    input is split across reads.

use std::collections::{BTreeMap, BTreeSet};

use n_keyseq::codec;
use n_keyseq::defaults;
use n_keyseq::{KeyCode, KeyDecoder, KeyRange, MatchOutcome, SequenceStore, TrieStore};
use n_trie::Case;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

const ALPHABET: &[u8] = b"\x1b[O1;2A~";

fn seq_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(ALPHABET), 1..6)
}

fn code_strategy() -> impl Strategy<Value = KeyCode> {
    (0u32..8, 0u32..64).prop_map(|(tag, ordinal)| {
        let range = KeyRange::ALL[tag as usize];
        KeyCode::new(range, ordinal)
    })
}

fn build(updates: &[(Vec<u8>, KeyCode)]) -> (TrieStore, BTreeMap<Vec<u8>, KeyCode>) {
    let mut store = TrieStore::new(Case::Sensitive);
    let mut model = BTreeMap::new();
    for (seq, code) in updates {
        let stored = store.update(seq, *code).unwrap();
        assert_eq!(stored.code(), *code);
        assert_eq!(stored.bytes(), &seq[..]);
        model.insert(seq.clone(), *code);
    }
    (store, model)
}

fn updates_strategy() -> impl Strategy<Value = Vec<(Vec<u8>, KeyCode)>> {
    prop::collection::vec((seq_strategy(), code_strategy()), 0..60)
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Last write wins
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn last_write_wins(updates in updates_strategy()) {
        let (store, model) = build(&updates);
        prop_assert_eq!(store.len(), model.len());
        for (seq, code) in &model {
            prop_assert_eq!(store.lookup(seq).map(|r| r.code()), Some(*code));
        }
        let flat: Vec<(Vec<u8>, KeyCode)> = store
            .flatten()
            .into_iter()
            .map(|r| (r.bytes().to_vec(), r.code()))
            .collect();
        let want: Vec<(Vec<u8>, KeyCode)> = model.into_iter().collect();
        prop_assert_eq!(flat, want);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2-3. Matching
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ambiguity_is_sound(updates in updates_strategy(), probe in seq_strategy()) {
        let (store, model) = build(&updates);
        let found = store.match_prefix(&probe);

        let next: BTreeSet<u8> = model
            .keys()
            .filter(|k| k.len() > probe.len() && k.starts_with(&probe))
            .map(|k| k[probe.len()])
            .collect();

        prop_assert_eq!(found.code(), model.get(&probe).copied());
        prop_assert_eq!(found.ambiguous, next.len());
        if let Some(partial) = found.partial {
            prop_assert!(partial.bytes().len() > probe.len());
            prop_assert!(partial.bytes().starts_with(&probe));
        } else {
            prop_assert!(next.is_empty());
        }
    }

    #[test]
    fn unrelated_probes_do_not_match(updates in updates_strategy(), probe in seq_strategy()) {
        let (store, model) = build(&updates);
        let related = model.keys().any(|k| k.starts_with(&probe));
        if !related {
            prop_assert_eq!(store.match_prefix(&probe).outcome(), MatchOutcome::NoMatch);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Name decoding
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn decode_is_total(name in "\\PC{1,16}") {
        let decoded = codec::decode(&name).unwrap();
        prop_assert!(decoded.consumed >= 1);
        prop_assert!(decoded.consumed <= name.len());
        prop_assert!(name.is_char_boundary(decoded.consumed));
    }

    #[test]
    fn decode_all_covers_input(name in "[<>a-zA-Z0-9#\\\\-]{0,24}") {
        let codes = codec::decode_all(&name);
        prop_assert!(codes.len() <= name.len());
        prop_assert_eq!(codes.is_empty(), name.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Chunking invariance
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn decoder_ignores_read_boundaries(
        data in prop::collection::vec(
            prop::sample::select(&b"\x1b[O1;25A~x\xc3\xa9"[..]),
            0..40,
        ),
        cuts in prop::collection::vec(0usize..40, 0..6),
    ) {
        let mut store = TrieStore::new(Case::Sensitive);
        defaults::seed(&mut store).unwrap();

        let mut whole = KeyDecoder::new();
        let mut expected = whole.advance(&store, &data);
        expected.extend(whole.flush(&store));

        let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c.min(data.len())).collect();
        cuts.sort_unstable();
        let mut split = KeyDecoder::new();
        let mut got = Vec::new();
        let mut start = 0;
        for cut in cuts.into_iter().chain([data.len()]) {
            got.extend(split.advance(&store, &data[start..cut]));
            start = cut;
        }
        got.extend(split.flush(&store));

        prop_assert_eq!(got, expected);
    }
}
