// SPDX-License-Identifier: MIT
//
// Default terminal sequences.
//
// What common terminals send for keys beyond plain characters: xterm and
// VT220 CSI forms, SS3 application mode, the Linux console, rxvt's shift
// suffixes, and the ESC prefix many terminals use for Alt. The same key
// usually has several spellings. Shift-F3 alone arrives as `ESC [ 1 ; 2 R`,
// `ESC O 2 R`, `ESC [ 1 3 ; 2 ~`, `ESC [ 2 5 ~` or `ESC [ 1 3 $`.
//
// Plain characters need no entry: the decoder falls back to ASCII/UTF-8
// for bytes that begin no sequence. Mouse reports are seeded by their
// introducer only; the decoder reads the report that follows.
//
// Several spellings differ only in letter case (`ESC O P` is F1, `ESC O p`
// keypad 0). A case-insensitive store cannot keep both, so it is seeded
// with the uppercase spelling alone.

use std::collections::btree_map::{BTreeMap, Entry};

use n_trie::Case;

use crate::codec;
use crate::error::Result;
use crate::keycode::{KeyCode, Modifiers, keypad};
use crate::sequence::SequenceStore;

/// Sequences spelled with key names.
const NAMED: &[(&[u8], &str)] = &[
    (b"\x1b", "<Esc>"),
    (b"\x1b\x1b", "<Alt-Esc>"),
    (b"\x7f", "<Backspace>"),
    (b"\x1b\x7f", "<Alt-Backspace>"),
    (b"\x1b[Z", "<Back-Tab>"),
    (b"\x1b[G", "<Keypad-5>"),
    // Linux console
    (b"\x1b[[A", "<F1>"),
    (b"\x1b[[B", "<F2>"),
    (b"\x1b[[C", "<F3>"),
    (b"\x1b[[D", "<F4>"),
    (b"\x1b[[E", "<F5>"),
    // rxvt
    (b"\x1b[a", "<Shift-Up>"),
    (b"\x1b[b", "<Shift-Down>"),
    (b"\x1b[c", "<Shift-Right>"),
    (b"\x1b[d", "<Shift-Left>"),
    (b"\x1bOa", "<Ctrl-Up>"),
    (b"\x1bOb", "<Ctrl-Down>"),
    (b"\x1bOc", "<Ctrl-Right>"),
    (b"\x1bOd", "<Ctrl-Left>"),
    // Application keypad
    (b"\x1bOj", "<Keypad-Star>"),
    (b"\x1bOk", "<Keypad-Plus>"),
    (b"\x1bOl", "<Keypad-Plus>"),
    (b"\x1bOm", "<Keypad-Minus>"),
    (b"\x1bOn", "<Keypad-Del>"),
    (b"\x1bOo", "<Keypad-Divide>"),
    (b"\x1bOM", "<Keypad-Enter>"),
    (b"\x1bOX", "<Keypad-Equals>"),
    // Terminal events
    (b"\x1b[I", "<Focus-In>"),
    (b"\x1b[O", "<Focus-Out>"),
    (b"\x1b[200~", "<Bracketed-Paste>"),
    (b"\x1b[201~", "<Bracketed-Paste-End>"),
    (b"\x1b[M", "<Mouse>"),
    (b"\x1b[<", "<Mouse>"),
];

/// Final bytes of CSI/SS3 cursor keys.
const CURSOR: &[(u8, u32)] = &[
    (b'A', keypad::UP),
    (b'B', keypad::DOWN),
    (b'C', keypad::RIGHT),
    (b'D', keypad::LEFT),
    (b'H', keypad::HOME),
    (b'F', keypad::END),
    (b'E', keypad::CENTER),
];

/// Final bytes of SS3 F1-F4.
const SS3_FUNCTION: &[(u8, u32)] = &[(b'P', 0), (b'Q', 1), (b'R', 2), (b'S', 3)];

/// VT220 `ESC [ n ~` editing keys.
const VT220_EDIT: &[(u32, u32)] = &[
    (1, keypad::HOME),
    (2, keypad::INS),
    (3, keypad::DEL),
    (4, keypad::END),
    (5, keypad::PGUP),
    (6, keypad::PGDN),
    (7, keypad::HOME),
    (8, keypad::END),
];

/// Editing keys xterm also sends with a modifier parameter.
const XTERM_EDIT: &[u32] = &[2, 3, 5, 6];

/// VT220 `ESC [ n ~` function keys (zero-based F index).
const VT220_FUNCTION: &[(u32, u32)] = &[
    (11, 0),
    (12, 1),
    (13, 2),
    (14, 3),
    (15, 4),
    (17, 5),
    (18, 6),
    (19, 7),
    (20, 8),
    (21, 9),
    (23, 10),
    (24, 11),
];

/// rxvt sends Shift-F3..Shift-F10 as `ESC [ 25 ~` through `ESC [ 34 ~`.
const RXVT_SHIFTED: &[(u32, u32)] = &[
    (25, 2),
    (26, 3),
    (28, 4),
    (29, 5),
    (31, 6),
    (32, 7),
    (33, 8),
    (34, 9),
];

/// rxvt's final bytes for `ESC [ n _`: the modifiers each one adds.
const RXVT_SUFFIX: &[(char, Modifiers)] = &[
    ('~', Modifiers::empty()),
    ('$', Modifiers::SHIFT),
    ('^', Modifiers::CTRL),
    ('@', Modifiers::CTRL.union(Modifiers::SHIFT)),
];

/// Every default sequence and its key, in the order they are stored.
/// Later entries win over earlier ones for the same bytes.
///
/// # Errors
///
/// [`KeyError::UnknownName`](crate::KeyError::UnknownName) if a compiled-in
/// key name does not parse.
pub fn sequences() -> Result<Vec<(Vec<u8>, KeyCode)>> {
    let mut out = Vec::with_capacity(1024);

    // Alt as an ESC prefix. Control characters fold like their names do,
    // so ESC TAB is Alt-Tab.
    for byte in (0x00..=0x7e_u8).filter(|&b| b != 0x1b) {
        let code = codec::fold(KeyCode::char(char::from(byte)).with_modifiers(Modifiers::META));
        out.push((vec![0x1b, byte], code));
    }

    for &(bytes, name) in NAMED {
        out.push((bytes.to_vec(), codec::parse(name)?));
    }

    for &(fin, ordinal) in CURSOR {
        let code = KeyCode::keypad(ordinal);
        out.push((csi(&[fin]), code));
        out.push((ss3(&[fin]), code));
    }
    for &(fin, index) in SS3_FUNCTION {
        out.push((ss3(&[fin]), KeyCode::function(index)));
    }

    // `ESC [ n ~` and rxvt's modifier suffixes.
    let tilde_keys = VT220_EDIT
        .iter()
        .map(|&(n, ordinal)| (n, KeyCode::keypad(ordinal)))
        .chain(VT220_FUNCTION.iter().map(|&(n, f)| (n, KeyCode::function(f))))
        .chain(
            RXVT_SHIFTED
                .iter()
                .map(|&(n, f)| (n, KeyCode::function(f).with_modifiers(Modifiers::SHIFT))),
        );
    for (n, code) in tilde_keys {
        for &(suffix, modifiers) in RXVT_SUFFIX {
            out.push((csi(format!("{n}{suffix}").as_bytes()), code.with_modifiers(modifiers)));
        }
    }

    // xterm modifier parameters.
    for param in 2..=8_u8 {
        let Some(modifiers) = Modifiers::from_xterm_param(param) else {
            continue;
        };
        for &(fin, index) in SS3_FUNCTION {
            let code = KeyCode::function(index).with_modifiers(modifiers);
            out.push((csi(format!("1;{param}{}", char::from(fin)).as_bytes()), code));
            out.push((ss3(format!("{param}{}", char::from(fin)).as_bytes()), code));
        }
        for &(fin, ordinal) in CURSOR {
            let code = KeyCode::keypad(ordinal).with_modifiers(modifiers);
            out.push((csi(format!("1;{param}{}", char::from(fin)).as_bytes()), code));
            out.push((ss3(format!("{param}{}", char::from(fin)).as_bytes()), code));
        }
        for &(n, index) in VT220_FUNCTION {
            let code = KeyCode::function(index).with_modifiers(modifiers);
            out.push((csi(format!("{n};{param}~").as_bytes()), code));
        }
        for &n in XTERM_EDIT {
            let Some(&(_, ordinal)) = VT220_EDIT.iter().find(|(m, _)| *m == n) else {
                continue;
            };
            let code = KeyCode::keypad(ordinal).with_modifiers(modifiers);
            out.push((csi(format!("{n};{param}~").as_bytes()), code));
        }
    }

    // Application keypad digits: `ESC O p` is keypad 0 through `ESC O y`.
    for (ordinal, fin) in (0..).zip(b'p'..=b'y') {
        out.push((ss3(&[fin]), KeyCode::keypad(ordinal)));
    }

    Ok(out)
}

/// [`sequences`] as a store comparing bytes under `case` can hold them.
///
/// Under [`Case::Insensitive`], of the spellings that differ only in ASCII
/// case the one sorting first (uppercase at the first difference) is kept
/// and the others are dropped. Under [`Case::Sensitive`] nothing is dropped.
///
/// # Errors
///
/// As [`sequences`].
pub fn sequences_for(case: Case) -> Result<Vec<(Vec<u8>, KeyCode)>> {
    let entries = sequences()?;
    if case == Case::Sensitive {
        return Ok(entries);
    }

    // Folded bytes to the index of the spelling that keeps them.
    let mut keep: BTreeMap<Vec<u8>, usize> = BTreeMap::new();
    for (index, (bytes, _)) in entries.iter().enumerate() {
        match keep.entry(bytes.to_ascii_lowercase()) {
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
            // `<=` so a later entry for the same bytes still wins.
            Entry::Occupied(mut slot) => {
                if *bytes <= entries[*slot.get()].0 {
                    slot.insert(index);
                }
            }
        }
    }

    let mut kept: Vec<usize> = keep.into_values().collect();
    kept.sort_unstable();
    let dropped = entries.len() - kept.len();
    let mut entries: Vec<Option<(Vec<u8>, KeyCode)>> = entries.into_iter().map(Some).collect();
    let folded = kept
        .into_iter()
        .filter_map(|index| entries[index].take())
        .collect();
    tracing::trace!(dropped, "dropped case-only spellings");
    Ok(folded)
}

/// Store every default sequence the store can tell apart. Returns the
/// number of entries written.
///
/// # Errors
///
/// Whatever [`sequences`] or [`SequenceStore::update`] reports.
pub fn seed<S: SequenceStore + ?Sized>(store: &mut S) -> Result<usize> {
    let entries = sequences_for(store.case())?;
    for (bytes, code) in &entries {
        store.update(bytes, *code)?;
    }
    tracing::debug!(entries = entries.len(), stored = store.len(), "seeded default sequences");
    Ok(entries.len())
}

fn csi(body: &[u8]) -> Vec<u8> {
    [b"\x1b[".as_slice(), body].concat()
}

fn ss3(body: &[u8]) -> Vec<u8> {
    [b"\x1bO".as_slice(), body].concat()
}

#[cfg(test)]
mod tests {
    use n_trie::Case;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::keycode::{KeyRange, event, misc};
    use crate::sequence::{MatchOutcome, TrieStore};

    fn seeded() -> TrieStore {
        let mut store = TrieStore::new(Case::Sensitive);
        seed(&mut store).unwrap();
        store
    }

    fn code_of(store: &TrieStore, seq: &[u8]) -> Option<KeyCode> {
        store.lookup(seq).map(|record| record.code())
    }

    #[test]
    fn names_all_parse() {
        assert!(sequences().is_ok());
    }

    #[test]
    fn shift_f3_spellings_agree() {
        let store = seeded();
        let shift_f3 = KeyCode::function(2).with_modifiers(Modifiers::SHIFT);
        for seq in [
            &b"\x1b[1;2R"[..],
            b"\x1bO2R",
            b"\x1b[13;2~",
            b"\x1b[25~",
            b"\x1b[13$",
        ] {
            assert_eq!(code_of(&store, seq), Some(shift_f3), "{}", seq.escape_ascii());
        }
    }

    #[test]
    fn cursor_keys_in_both_modes() {
        let store = seeded();
        assert_eq!(code_of(&store, b"\x1b[A"), Some(KeyCode::UP));
        assert_eq!(code_of(&store, b"\x1bOA"), Some(KeyCode::UP));
        assert_eq!(
            code_of(&store, b"\x1bO2A"),
            Some(KeyCode::UP.with_modifiers(Modifiers::SHIFT))
        );
        assert_eq!(
            code_of(&store, b"\x1b[1;5D"),
            Some(KeyCode::LEFT.with_modifiers(Modifiers::CTRL))
        );
    }

    #[test]
    fn escape_prefix_is_alt() {
        let store = seeded();
        assert_eq!(
            code_of(&store, b"\x1bx"),
            Some(KeyCode::char('x').with_modifiers(Modifiers::META))
        );
        assert_eq!(code_of(&store, b"\x1b\t"), Some(KeyCode::misc(misc::ALT_TAB)));
        assert_eq!(
            code_of(&store, b"\x1b\x7f"),
            Some(KeyCode::misc(misc::ALT_BACKSPACE))
        );
        assert_eq!(
            code_of(&store, b"\x1b\x1b"),
            Some(KeyCode::ESC.with_modifiers(Modifiers::META))
        );
    }

    #[test]
    fn lone_escape_is_ambiguous() {
        let store = seeded();
        let m = store.match_prefix(b"\x1b");
        assert_eq!(m.outcome(), MatchOutcome::Ambiguous);
        assert_eq!(m.code(), Some(KeyCode::ESC));

        // `ESC O` is both Alt-O and the SS3 introducer.
        let m = store.match_prefix(b"\x1bO");
        assert_eq!(m.outcome(), MatchOutcome::Ambiguous);

        // `ESC [ 1` begins sequences but is none itself.
        assert_eq!(store.match_prefix(b"\x1b[1").outcome(), MatchOutcome::Prefix);
    }

    #[test]
    fn keypad_and_events() {
        let store = seeded();
        assert_eq!(code_of(&store, b"\x1bOp"), Some(KeyCode::INS));
        assert_eq!(code_of(&store, b"\x1bOu"), Some(KeyCode::keypad(keypad::CENTER)));
        assert_eq!(
            code_of(&store, b"\x1b[200~").map(|c| c.to_string()),
            Some(String::from("<Bracketed-Paste>"))
        );
        assert_eq!(code_of(&store, b"\x1b[Z"), Some(KeyCode::BACK_TAB));
        assert_eq!(code_of(&store, b"\x7f"), Some(KeyCode::BACKSPACE));
    }

    #[test]
    fn paste_markers() {
        let store = seeded();
        assert_eq!(
            code_of(&store, b"\x1b[201~"),
            Some(KeyCode::new(KeyRange::Event, event::BRACKETED_PASTE_END))
        );
    }

    // ── Case-insensitive stores ─────────────────────────────────────

    fn seeded_insensitive() -> TrieStore {
        let mut store = TrieStore::new(Case::Insensitive);
        seed(&mut store).unwrap();
        store
    }

    #[test]
    fn case_insensitive_keeps_uppercase_spellings() {
        let store = seeded_insensitive();
        assert_eq!(code_of(&store, b"\x1bOP"), Some(KeyCode::function(0)));
        assert_eq!(code_of(&store, b"\x1bOS"), Some(KeyCode::function(3)));
        assert_eq!(code_of(&store, b"\x1b[A"), Some(KeyCode::UP));
        assert_eq!(code_of(&store, b"\x1bOA"), Some(KeyCode::UP));
        assert_eq!(
            code_of(&store, b"\x1bOM"),
            Some(KeyCode::keypad(keypad::ENTER))
        );
        assert_eq!(
            code_of(&store, b"\x1bA"),
            Some(KeyCode::char('A').with_modifiers(Modifiers::META))
        );
        // The lowercase spelling reaches the same record.
        let record = store.lookup(b"\x1bop").unwrap();
        assert_eq!(record.bytes(), b"\x1bOP");
        assert_eq!(record.code(), KeyCode::function(0));
    }

    #[test]
    fn case_insensitive_table_has_no_folded_duplicates() {
        let entries = sequences_for(Case::Insensitive).unwrap();
        let mut folded: Vec<Vec<u8>> = entries.iter().map(|(b, _)| b.to_ascii_lowercase()).collect();
        folded.sort_unstable();
        folded.dedup();
        assert_eq!(folded.len(), entries.len());
        assert_eq!(seeded_insensitive().len(), entries.len());
    }

    #[test]
    fn case_sensitive_table_is_complete() {
        assert_eq!(
            sequences_for(Case::Sensitive).unwrap(),
            sequences().unwrap()
        );
    }

    #[test]
    fn rxvt_suffixes() {
        let store = seeded();
        assert_eq!(
            code_of(&store, b"\x1b[5^"),
            Some(KeyCode::PGUP.with_modifiers(Modifiers::CTRL))
        );
        assert_eq!(
            code_of(&store, b"\x1b[11@"),
            Some(KeyCode::function(0).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT))
        );
    }
}
