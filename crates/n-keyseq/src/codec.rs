// SPDX-License-Identifier: MIT
//
// Key name codec: key codes to and from human-readable names.
//
// Names look like `<Alt-Ctrl-F1>`, `<Keypad-Enter>`, `<Back-Tab>`. Plain
// printable characters stand for themselves, with `< \ { } #` escaped by a
// backslash. Keywords match without regard to ASCII case.
//
// Decoding folds modifier spellings that terminals cannot tell apart onto
// one code: `<Ctrl-a>` is the C0 control 0x01, `<Shift-Tab>` is
// `<Back-Tab>`. Encoding never produces a name that folds, so every code in
// `names::static_codes()` decodes back to itself.

use crate::error::{KeyError, Result};
use crate::keycode::{KeyCode, KeyRange, Modifiers, ORDINAL_MASK, misc};
use crate::multikey::MultikeyTable;
use crate::names::{
    self, BUTTON_NAMES, CHAR_ALIASES, CHAR_NAMES, EVENT_NAMES, KEYPAD_PREFIXES, MISC_NAMES,
    MODIFIER_ALIASES, MODIFIER_NAMES, MULTIKEY_PREFIX, PRIVATE_PREFIX,
};

/// Result of [`decode`]: the key and how many bytes of the name it used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub code: KeyCode,
    pub consumed: usize,
}

// ── Decoding ────────────────────────────────────────────────────────────────

/// Decode the key at the start of `name`.
///
/// Best effort: text that is not a valid bracketed name decodes as a
/// literal `<` consuming one byte. Returns `None` only for empty input.
#[must_use]
pub fn decode(name: &str) -> Option<Decoded> {
    let first = name.chars().next()?;
    let decoded = match first {
        '<' => decode_bracket(name).unwrap_or_else(|| {
            tracing::debug!(name, "unrecognized key name, taking `<` literally");
            literal('<', 1)
        }),
        '\\' => match name[1..].chars().next() {
            Some(ch) => literal(ch, 1 + ch.len_utf8()),
            None => literal('\\', 1),
        },
        '#' => decode_raw(&name[1..]).unwrap_or_else(|| literal('#', 1)),
        ch => literal(ch, ch.len_utf8()),
    };
    Some(decoded)
}

/// Decode every key of a key string such as `"ab<F1>"`.
#[must_use]
pub fn decode_all(keys: &str) -> Vec<KeyCode> {
    let mut codes = Vec::new();
    let mut pos = 0;
    while let Some(decoded) = decode(&keys[pos..]) {
        codes.push(decoded.code);
        pos += decoded.consumed;
    }
    codes
}

/// Decode exactly one key, rejecting anything not understood in full.
///
/// # Errors
///
/// [`KeyError::UnknownName`] when `name` is empty or holds more than one
/// key, including a malformed bracketed name.
pub fn parse(name: &str) -> Result<KeyCode> {
    match decode(name) {
        Some(decoded) if decoded.consumed == name.len() => Ok(decoded.code),
        Some(decoded) => Err(KeyError::unknown_name(name, decoded.consumed)),
        None => Err(KeyError::unknown_name(name, 0)),
    }
}

const fn literal(ch: char, consumed: usize) -> Decoded {
    Decoded {
        code: KeyCode::char(ch),
        consumed,
    }
}

/// Bare `#<n>`: a full raw code.
fn decode_raw(digits: &str) -> Option<Decoded> {
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    let raw = parse_decimal(&digits[..len])?;
    let code = KeyCode::from_raw(raw)?;
    Some(Decoded {
        code,
        consumed: 1 + len,
    })
}

fn decode_bracket(name: &str) -> Option<Decoded> {
    let body = &name[1..];
    let mut rest = body;
    let mut modifiers = Modifiers::empty();

    let (code, key_len) = loop {
        // A single character closed by `>` is always literal, so
        // `<Alt->>` and `<Alt-->` need no escaping.
        if let Some(ch) = rest.chars().next() {
            if rest[ch.len_utf8()..].starts_with('>') {
                break (fold(KeyCode::char(ch).with_modifiers(modifiers)), ch.len_utf8());
            }
        }
        if let Some((modifier, after)) = strip_modifier(rest) {
            modifiers |= modifier;
            rest = after;
            continue;
        }
        let token = &rest[..rest.find('>')?];
        let code = keyword(token, modifiers)?;
        break (code, token.len());
    };

    Some(Decoded {
        code,
        consumed: 1 + (body.len() - rest.len()) + key_len + 1,
    })
}

fn strip_modifier(s: &str) -> Option<(Modifiers, &str)> {
    MODIFIER_ALIASES.iter().find_map(|&(word, modifier)| {
        let after = strip_prefix_ci(s, word)?;
        after.strip_prefix('-').map(|after| (modifier, after))
    })
}

/// Resolve a multi-character key word, applying `modifiers`.
fn keyword(token: &str, modifiers: Modifiers) -> Option<KeyCode> {
    if let Some(ch) = names::ordinal_of(CHAR_NAMES, token)
        .or_else(|| names::alias_of(CHAR_ALIASES, token))
    {
        return Some(fold(
            KeyCode::new(KeyRange::Character, ch).with_modifiers(modifiers),
        ));
    }

    let base = if let Some(digits) = token.strip_prefix('#') {
        // Numeric codes are taken as written, never folded.
        KeyCode::from_raw(parse_decimal(digits)?)?
    } else if let Some(n) = strip_prefix_ci(token, "F").and_then(parse_decimal) {
        if n == 0 || n - 1 > ORDINAL_MASK {
            return None;
        }
        KeyCode::function(n - 1)
    } else if let Some(word) = KEYPAD_PREFIXES
        .iter()
        .find_map(|prefix| strip_prefix_ci(token, prefix))
    {
        let ordinal = parse_decimal(word).or_else(|| names::keypad_ordinal(word, false))?;
        KeyCode::keypad(ordinal)
    } else if let Some(ordinal) = names::keypad_ordinal(token, true) {
        KeyCode::keypad(ordinal)
    } else if let Some(ordinal) = names::ordinal_of(MISC_NAMES, token) {
        KeyCode::misc(ordinal)
    } else if let Some(ordinal) = names::ordinal_of(BUTTON_NAMES, token) {
        KeyCode::new(KeyRange::Button, ordinal)
    } else if let Some(ordinal) = names::ordinal_of(EVENT_NAMES, token) {
        KeyCode::new(KeyRange::Event, ordinal)
    } else if let Some(n) = strip_prefix_ci(token, PRIVATE_PREFIX).and_then(parse_decimal) {
        KeyCode::new(KeyRange::Private, n)
    } else if let Some(n) = strip_prefix_ci(token, MULTIKEY_PREFIX).and_then(parse_decimal) {
        KeyCode::new(KeyRange::Multikey, n)
    } else {
        return None;
    };
    Some(base.with_modifiers(modifiers))
}

/// Fold a character code onto the code a terminal actually sends for it.
///
/// Ctrl with a character in 0x40..=0x7F becomes the C0 control (`Ctrl-?`
/// becomes DEL). Then Tab and Backspace with a modifier become their
/// dedicated misc keys. Non-character codes are returned unchanged.
#[must_use]
pub fn fold(code: KeyCode) -> KeyCode {
    if code.range() != KeyRange::Character {
        return code;
    }
    let mut modifiers = code.modifiers();
    let mut ch = code.ordinal();

    if modifiers.contains(Modifiers::CTRL) {
        if ch == u32::from(b'?') {
            ch = 0x7f;
            modifiers.remove(Modifiers::CTRL);
        } else if (0x40..=0x7f).contains(&ch) {
            ch &= 0x1f;
            modifiers.remove(Modifiers::CTRL);
        }
    }

    let dedicated = match ch {
        0x09 => [
            (Modifiers::SHIFT, misc::BACK_TAB),
            (Modifiers::CTRL, misc::CTRL_TAB),
            (Modifiers::META, misc::ALT_TAB),
        ]
        .into_iter()
        .find(|(m, _)| modifiers.contains(*m)),
        0x08 => [
            (Modifiers::CTRL, misc::CTRL_BACKSPACE),
            (Modifiers::META, misc::ALT_BACKSPACE),
            (Modifiers::SHIFT, misc::SHIFT_BACKSPACE),
        ]
        .into_iter()
        .find(|(m, _)| modifiers.contains(*m)),
        _ => None,
    };

    match dedicated {
        Some((modifier, ordinal)) => {
            KeyCode::misc(ordinal).with_modifiers(modifiers.difference(modifier))
        }
        None => KeyCode::new(KeyRange::Character, ch).with_modifiers(modifiers),
    }
}

// ── Encoding ────────────────────────────────────────────────────────────────

/// Canonical name of `code`.
///
/// Multikey codes render as `<Multikey-n>`; use [`encode_with`] to show
/// their sequence bytes instead.
#[must_use]
pub fn encode(code: KeyCode) -> String {
    if let Some(ch) = bare_char(code) {
        let mut out = String::with_capacity(2);
        if matches!(ch, '<' | '\\' | '{' | '}' | '#') {
            out.push('\\');
        }
        out.push(ch);
        return out;
    }

    let (modifiers, key) = key_name(code);
    let mut out = String::from("<");
    for &(modifier, word) in MODIFIER_NAMES {
        if modifiers.contains(modifier) {
            out.push_str(word);
            out.push('-');
        }
    }
    out.push_str(&key);
    out.push('>');
    out
}

/// Like [`encode`], but a multikey assigned in `table` renders as its
/// sequence, one character name per byte (`<Esc>[1;2P`).
#[must_use]
pub fn encode_with(code: KeyCode, table: &MultikeyTable<'_>) -> String {
    match table.sequence(code) {
        Some(bytes) => bytes
            .iter()
            .map(|&byte| encode(KeyCode::char(char::from(byte))))
            .collect(),
        None => encode(code),
    }
}

/// Unmodified printable characters render without brackets.
fn bare_char(code: KeyCode) -> Option<char> {
    if !code.modifiers().is_empty() {
        return None;
    }
    let ch = code.as_char()?;
    (ch != ' ' && !ch.is_control()).then_some(ch)
}

fn raw_name(code: KeyCode) -> String {
    format!("#{}", code.base().raw())
}

/// Modifiers to render plus the key word inside the brackets.
fn key_name(code: KeyCode) -> (Modifiers, String) {
    let modifiers = code.modifiers();
    let ordinal = code.ordinal();
    let table_name = |table: &[(u32, &'static str)]| {
        names::name_of(table, ordinal).map_or_else(|| raw_name(code), str::to_owned)
    };

    let key = match code.range() {
        KeyRange::Character => return char_name(code),
        KeyRange::Function => format!("F{}", ordinal + 1),
        KeyRange::Keypad => match names::keypad_name(ordinal) {
            Some(k) if k.bare => k.name.to_owned(),
            Some(k) => format!("{}{}", KEYPAD_PREFIXES[0], k.name),
            None => format!("{}{ordinal}", KEYPAD_PREFIXES[0]),
        },
        KeyRange::Misc => table_name(MISC_NAMES),
        KeyRange::Button => table_name(BUTTON_NAMES),
        KeyRange::Event => table_name(EVENT_NAMES),
        KeyRange::Private => format!("{PRIVATE_PREFIX}{ordinal}"),
        KeyRange::Multikey => format!("{MULTIKEY_PREFIX}{ordinal}"),
    };
    (modifiers, key)
}

fn char_name(code: KeyCode) -> (Modifiers, String) {
    let modifiers = code.modifiers();
    let ordinal = code.ordinal();

    // A name that would fold on decoding can only be written numerically.
    if fold(code) != code {
        return (modifiers, raw_name(code));
    }
    if let Some(name) = names::name_of(CHAR_NAMES, ordinal) {
        return (modifiers, name.to_owned());
    }
    let Some(ch) = code.as_char() else {
        return (modifiers, raw_name(code));
    };
    match ch {
        '\x7f' if !modifiers.contains(Modifiers::CTRL) => {
            (modifiers | Modifiers::CTRL, String::from("?"))
        }
        '\0'..='\x1f' if !modifiers.contains(Modifiers::CTRL) => {
            let key = char::from_u32(ordinal + 0x40).map_or_else(|| raw_name(code), String::from);
            (modifiers | Modifiers::CTRL, key)
        }
        ch if ch.is_control() => (modifiers, raw_name(code)),
        ch => (modifiers, ch.to_string()),
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

/// A non-empty run of ASCII digits that fits in `u32`.
fn parse_decimal(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::keycode::{button, event, keypad};
    use crate::names::static_codes;

    fn dec(name: &str) -> KeyCode {
        parse(name).unwrap()
    }

    fn consumed(name: &str) -> usize {
        decode(name).unwrap().consumed
    }

    // ── Round trip ──────────────────────────────────────────────────

    #[test]
    fn static_codes_round_trip() {
        for code in static_codes() {
            let name = encode(code);
            let decoded = decode(&name).unwrap();
            assert_eq!(decoded.code, code, "name {name}");
            assert_eq!(decoded.consumed, name.len(), "name {name}");
        }
    }

    #[test]
    fn alt_ctrl_f1() {
        let code = dec("<Alt-Ctrl-F1>");
        assert_eq!(
            code,
            KeyCode::function(0).with_modifiers(Modifiers::META | Modifiers::CTRL)
        );
        assert_eq!(code.raw(), 0x3100_0000);
        assert_eq!(encode(code), "<Alt-Ctrl-F1>");
    }

    #[test]
    fn modifiers_render_in_fixed_order() {
        assert_eq!(dec("<Shift-Meta-Control-F2>"), dec("<Alt-Ctrl-Shift-F2>"));
        assert_eq!(encode(dec("<shift-ctrl-alt-up>")), "<Alt-Ctrl-Shift-Up>");
    }

    // ── Folding ─────────────────────────────────────────────────────

    #[test]
    fn shift_tab_is_back_tab() {
        assert_eq!(dec("<Shift-Tab>"), KeyCode::BACK_TAB);
        assert_eq!(dec("<Back-Tab>"), KeyCode::BACK_TAB);
        assert_eq!(encode(dec("<Shift-Tab>")), "<Back-Tab>");
    }

    #[test]
    fn tab_and_backspace_variants() {
        assert_eq!(dec("<Ctrl-Tab>"), KeyCode::misc(misc::CTRL_TAB));
        assert_eq!(dec("<Alt-Tab>"), KeyCode::misc(misc::ALT_TAB));
        assert_eq!(dec("<Ctrl-Backspace>"), KeyCode::misc(misc::CTRL_BACKSPACE));
        assert_eq!(dec("<Alt-Backspace>"), KeyCode::misc(misc::ALT_BACKSPACE));
        assert_eq!(dec("<Shift-Backspace>"), KeyCode::misc(misc::SHIFT_BACKSPACE));
        assert_eq!(
            dec("<Alt-Shift-Tab>"),
            KeyCode::BACK_TAB.with_modifiers(Modifiers::META)
        );
    }

    #[test]
    fn ctrl_letters_fold_to_c0() {
        assert_eq!(dec("<Ctrl-a>"), KeyCode::char('\x01'));
        assert_eq!(dec("<Ctrl-A>"), KeyCode::char('\x01'));
        assert_eq!(dec("<Ctrl-[>"), KeyCode::ESC);
        assert_eq!(dec("<Ctrl-?>"), KeyCode::char('\x7f'));
        assert_eq!(dec("<Ctrl-@>"), KeyCode::char('\0'));
        assert_eq!(
            dec("<Alt-Ctrl-x>"),
            KeyCode::char('\x18').with_modifiers(Modifiers::META)
        );
    }

    #[test]
    fn numeric_codes_are_not_folded() {
        let code = KeyCode::char('a').with_modifiers(Modifiers::CTRL);
        assert_eq!(encode(code), "<Ctrl-#97>");
        assert_eq!(dec("<Ctrl-#97>"), code);
    }

    // ── Names ───────────────────────────────────────────────────────

    #[test]
    fn aliases_and_case() {
        assert_eq!(dec("<Escape>"), KeyCode::ESC);
        assert_eq!(dec("<return>"), KeyCode::ENTER);
        assert_eq!(dec("<PageDown>"), KeyCode::PGDN);
        assert_eq!(dec("<Grey-Plus>"), KeyCode::keypad(keypad::PLUS));
        assert_eq!(dec("<KEYPAD-7>"), KeyCode::HOME);
        assert_eq!(dec("<f12>"), KeyCode::function(11));
    }

    #[test]
    fn keypad_rendering() {
        assert_eq!(encode(KeyCode::UP), "<Up>");
        assert_eq!(encode(KeyCode::keypad(keypad::CENTER)), "<Keypad-5>");
        assert_eq!(encode(KeyCode::keypad(keypad::ENTER)), "<Keypad-Enter>");
        assert_eq!(encode(KeyCode::keypad(keypad::NUMLOCK)), "<NumLock>");
    }

    #[test]
    fn other_ranges() {
        assert_eq!(
            dec("<Button2-Double>"),
            KeyCode::new(KeyRange::Button, button::ordinal(2, button::Action::Double))
        );
        assert_eq!(dec("<Wheel-Up>"), KeyCode::new(KeyRange::Button, button::WHEEL_UP));
        assert_eq!(
            dec("<Focus-Out>"),
            KeyCode::new(KeyRange::Event, event::FOCUS_OUT)
        );
        assert_eq!(dec("<Paste>"), KeyCode::misc(misc::PASTE));
        assert_eq!(dec("<Private-7>"), KeyCode::new(KeyRange::Private, 7));
        assert_eq!(dec("<Multikey-3>"), KeyCode::new(KeyRange::Multikey, 3));
        assert_eq!(encode(KeyCode::new(KeyRange::Misc, 999)), "<#50332647>");
    }

    #[test]
    fn control_characters_render_with_ctrl() {
        assert_eq!(encode(KeyCode::char('\x01')), "<Ctrl-A>");
        assert_eq!(encode(KeyCode::char('\x1c')), "<Ctrl-\\>");
        assert_eq!(encode(KeyCode::char('\x7f')), "<Ctrl-?>");
        assert_eq!(encode(KeyCode::ESC), "<Esc>");
        assert_eq!(encode(KeyCode::SPACE), "<Space>");
    }

    // ── Literals and escapes ────────────────────────────────────────

    #[test]
    fn plain_characters_are_bare() {
        assert_eq!(encode(KeyCode::char('a')), "a");
        assert_eq!(encode(KeyCode::char('é')), "é");
        assert_eq!(encode(KeyCode::char('<')), "\\<");
        assert_eq!(encode(KeyCode::char('#')), "\\#");
        assert_eq!(encode(KeyCode::char('}')), "\\}");
        assert_eq!(dec("\\<"), KeyCode::char('<'));
        assert_eq!(dec("\\\\"), KeyCode::char('\\'));
    }

    #[test]
    fn punctuation_inside_brackets() {
        let alt = |ch| KeyCode::char(ch).with_modifiers(Modifiers::META);
        assert_eq!(dec("<Alt->>"), alt('>'));
        assert_eq!(dec("<Alt-->"), alt('-'));
        assert_eq!(dec("<Alt-<>"), alt('<'));
        assert_eq!(dec("<Alt-#>"), alt('#'));
        assert_eq!(encode(alt('>')), "<Alt->>");
    }

    #[test]
    fn bare_raw_codes() {
        assert_eq!(dec("#65"), KeyCode::char('A'));
        assert_eq!(consumed("#x"), 1);
        assert_eq!(decode("#x").unwrap().code, KeyCode::char('#'));
    }

    // ── Degraded input ──────────────────────────────────────────────

    #[test]
    fn unknown_names_take_the_bracket_literally() {
        let decoded = decode("<Foo>").unwrap();
        assert_eq!(decoded.code, KeyCode::char('<'));
        assert_eq!(decoded.consumed, 1);
        assert_eq!(consumed("<F0>"), 1);
        assert_eq!(consumed("<Alt-F1"), 1);
        assert_eq!(consumed("<>"), 1);
        assert!(decode("").is_none());
    }

    #[test]
    fn strict_parse_reports_progress() {
        assert_eq!(
            parse("<Foo>"),
            Err(KeyError::UnknownName {
                name: "<Foo>".into(),
                consumed: 1
            })
        );
        assert!(parse("ab").is_err());
        assert!(parse("").is_err());
        assert_eq!("<Up>".parse::<KeyCode>(), Ok(KeyCode::UP));
    }

    #[test]
    fn key_strings() {
        assert_eq!(
            decode_all("ab<F1><Foo>"),
            vec![
                KeyCode::char('a'),
                KeyCode::char('b'),
                KeyCode::function(0),
                KeyCode::char('<'),
                KeyCode::char('F'),
                KeyCode::char('o'),
                KeyCode::char('o'),
                KeyCode::char('>'),
            ]
        );
    }

    #[test]
    fn display_and_debug() {
        assert_eq!(KeyCode::function(4).to_string(), "<F5>");
        assert_eq!(format!("{:?}", KeyCode::char('a')), "KeyCode(0x00000061 a)");
    }
}
