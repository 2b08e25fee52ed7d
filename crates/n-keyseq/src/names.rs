// SPDX-License-Identifier: MIT
//
// Compiled-in key name tables.
//
// One table per range maps ordinals to their canonical names. Aliases are
// accepted when decoding but never produced when encoding. Keyword matching
// is ASCII case-insensitive.

use crate::keycode::{KeyCode, KeyRange, Modifiers, button, event, keypad, misc};

/// Named characters. Every other character renders as itself, or as
/// `Ctrl-X` for C0 controls.
pub const CHAR_NAMES: &[(u32, &str)] = &[
    (0x08, "Backspace"),
    (0x09, "Tab"),
    (0x0d, "Enter"),
    (0x1b, "Esc"),
    (0x20, "Space"),
];

/// Extra spellings of named characters.
pub const CHAR_ALIASES: &[(&str, u32)] = &[("Escape", 0x1b), ("Return", 0x0d)];

/// A keypad key: ordinal, name, and whether it renders without the
/// `Keypad-` prefix.
#[derive(Debug, Clone, Copy)]
pub struct KeypadName {
    pub ordinal: u32,
    pub name: &'static str,
    pub bare: bool,
}

const fn kp(ordinal: u32, name: &'static str, bare: bool) -> KeypadName {
    KeypadName {
        ordinal,
        name,
        bare,
    }
}

/// Keypad vocabulary. The centre key (ordinal 5) has no name and renders
/// as `Keypad-5`.
pub const KEYPAD_NAMES: &[KeypadName] = &[
    kp(keypad::INS, "Ins", true),
    kp(keypad::END, "End", true),
    kp(keypad::DOWN, "Down", true),
    kp(keypad::PGDN, "PgDn", true),
    kp(keypad::LEFT, "Left", true),
    kp(keypad::RIGHT, "Right", true),
    kp(keypad::HOME, "Home", true),
    kp(keypad::UP, "Up", true),
    kp(keypad::PGUP, "PgUp", true),
    kp(keypad::DEL, "Del", true),
    kp(keypad::PLUS, "Plus", false),
    kp(keypad::MINUS, "Minus", false),
    kp(keypad::STAR, "Star", false),
    kp(keypad::DIVIDE, "Divide", false),
    kp(keypad::EQUALS, "Equals", false),
    kp(keypad::ENTER, "Enter", false),
    kp(keypad::PAUSE, "Pause", true),
    kp(keypad::PRTSC, "PrtSc", true),
    kp(keypad::SCROLL, "Scroll", true),
    kp(keypad::NUMLOCK, "NumLock", true),
];

/// Longer spellings of keypad keys, accepted bare or after `Keypad-`.
pub const KEYPAD_ALIASES: &[(&str, u32)] = &[
    ("Insert", keypad::INS),
    ("Delete", keypad::DEL),
    ("PageUp", keypad::PGUP),
    ("PageDown", keypad::PGDN),
    ("PrintScreen", keypad::PRTSC),
    ("ScrollLock", keypad::SCROLL),
];

/// Prefixes introducing a keypad key.
pub const KEYPAD_PREFIXES: &[&str] = &["Keypad-", "Grey-"];

pub const MISC_NAMES: &[(u32, &str)] = &[
    (misc::BACK_TAB, "Back-Tab"),
    (misc::CTRL_TAB, "Ctrl-Tab"),
    (misc::ALT_TAB, "Alt-Tab"),
    (misc::CTRL_BACKSPACE, "Ctrl-Backspace"),
    (misc::ALT_BACKSPACE, "Alt-Backspace"),
    (misc::SHIFT_BACKSPACE, "Shift-Backspace"),
    (misc::UNDO, "Undo"),
    (misc::REDO, "Redo"),
    (misc::COPY, "Copy"),
    (misc::CUT, "Cut"),
    (misc::PASTE, "Paste"),
    (misc::HELP, "Help"),
    (misc::SEARCH, "Search"),
    (misc::REPLACE, "Replace"),
    (misc::CANCEL, "Cancel"),
    (misc::COMMAND, "Command"),
    (misc::EXIT, "Exit"),
    (misc::NEXT, "Next"),
    (misc::PREV, "Prev"),
    (misc::OPEN, "Open"),
    (misc::SAVE, "Save"),
    (misc::MENU, "Menu"),
    (misc::BREAK, "Break"),
];

/// First misc ordinal that is a command rather than a folded variant.
pub const FIRST_MISC_COMMAND: u32 = misc::UNDO;

pub const BUTTON_NAMES: &[(u32, &str)] = &[
    (button::MOUSE, "Mouse"),
    (1, "Button1-Down"),
    (2, "Button1-Up"),
    (3, "Button1-Double"),
    (4, "Button1-Motion"),
    (5, "Button2-Down"),
    (6, "Button2-Up"),
    (7, "Button2-Double"),
    (8, "Button2-Motion"),
    (9, "Button3-Down"),
    (10, "Button3-Up"),
    (11, "Button3-Double"),
    (12, "Button3-Motion"),
    (button::WHEEL_UP, "Wheel-Up"),
    (button::WHEEL_DOWN, "Wheel-Down"),
    (button::WHEEL_LEFT, "Wheel-Left"),
    (button::WHEEL_RIGHT, "Wheel-Right"),
];

pub const EVENT_NAMES: &[(u32, &str)] = &[
    (event::BRACKETED_PASTE, "Bracketed-Paste"),
    (event::FOCUS_IN, "Focus-In"),
    (event::FOCUS_OUT, "Focus-Out"),
    (event::RESIZE, "Resize"),
    (event::BRACKETED_PASTE_END, "Bracketed-Paste-End"),
];

/// Modifier prefixes, in the order names render them.
pub const MODIFIER_NAMES: &[(Modifiers, &str)] = &[
    (Modifiers::META, "Alt"),
    (Modifiers::CTRL, "Ctrl"),
    (Modifiers::SHIFT, "Shift"),
];

/// Modifier spellings accepted when decoding (each followed by `-`).
pub const MODIFIER_ALIASES: &[(&str, Modifiers)] = &[
    ("Alt", Modifiers::META),
    ("Meta", Modifiers::META),
    ("Ctrl", Modifiers::CTRL),
    ("Control", Modifiers::CTRL),
    ("Shift", Modifiers::SHIFT),
];

pub const PRIVATE_PREFIX: &str = "Private-";
pub const MULTIKEY_PREFIX: &str = "Multikey-";

// ── Lookup ──────────────────────────────────────────────────────────────────

/// Name of `ordinal` in an (ordinal, name) table.
pub fn name_of(table: &[(u32, &'static str)], ordinal: u32) -> Option<&'static str> {
    table
        .iter()
        .find(|&&(ord, _)| ord == ordinal)
        .map(|&(_, name)| name)
}

/// Ordinal of `name` in an (ordinal, name) table, ignoring ASCII case.
pub fn ordinal_of(table: &[(u32, &str)], name: &str) -> Option<u32> {
    table
        .iter()
        .find(|(_, n)| n.eq_ignore_ascii_case(name))
        .map(|&(ord, _)| ord)
}

/// Ordinal of `name` in a (name, ordinal) alias table, ignoring ASCII case.
pub fn alias_of(table: &[(&str, u32)], name: &str) -> Option<u32> {
    table
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, ord)| ord)
}

pub fn keypad_name(ordinal: u32) -> Option<KeypadName> {
    KEYPAD_NAMES.iter().copied().find(|k| k.ordinal == ordinal)
}

/// Keypad ordinal for a vocabulary word. `bare_only` restricts the search
/// to keys that may appear without the `Keypad-` prefix.
pub fn keypad_ordinal(word: &str, bare_only: bool) -> Option<u32> {
    KEYPAD_NAMES
        .iter()
        .find(|k| (k.bare || !bare_only) && k.name.eq_ignore_ascii_case(word))
        .map(|k| k.ordinal)
        .or_else(|| alias_of(KEYPAD_ALIASES, word))
}

// ── Static code table ───────────────────────────────────────────────────────

/// Every code reachable from the compiled-in tables.
///
/// For each of these, `decode(&encode(code))` gives back `code` and
/// consumes the whole name. Modifier combinations that decoding folds onto
/// other codes (Ctrl+letter, Shift-Tab, ...) are left out.
#[must_use]
pub fn static_codes() -> Vec<KeyCode> {
    let all_modifiers: Vec<Modifiers> = (0..8u32)
        .map(|i| Modifiers::from_bits_truncate(i << 28))
        .collect();
    let mut codes = Vec::new();

    // Characters: every ASCII code plain, printables with Alt, and the
    // names that take any modifier (the plain ones are already in).
    for ch in 0..=0x7f {
        codes.push(KeyCode::new(KeyRange::Character, ch));
    }
    for ch in 0x21..=0x7e {
        codes.push(KeyCode::new(KeyRange::Character, ch).with_modifiers(Modifiers::META));
    }
    for &ch in &[0x0d, 0x1b, 0x20] {
        for &m in &all_modifiers[1..] {
            codes.push(KeyCode::new(KeyRange::Character, ch).with_modifiers(m));
        }
    }
    for ch in ['é', 'ß', '€', '字'] {
        codes.push(KeyCode::char(ch));
        codes.push(KeyCode::char(ch).with_modifiers(Modifiers::META));
    }

    for &m in &all_modifiers {
        for f in 0..36 {
            codes.push(KeyCode::function(f).with_modifiers(m));
        }
        for k in 0..=keypad::NUMLOCK {
            codes.push(KeyCode::keypad(k).with_modifiers(m));
        }
        for &(ord, _) in MISC_NAMES.iter().filter(|(o, _)| *o >= FIRST_MISC_COMMAND) {
            codes.push(KeyCode::misc(ord).with_modifiers(m));
        }
        for &(ord, _) in BUTTON_NAMES {
            codes.push(KeyCode::new(KeyRange::Button, ord).with_modifiers(m));
        }
    }

    for &(ord, _) in MISC_NAMES.iter().filter(|(o, _)| *o < FIRST_MISC_COMMAND) {
        codes.push(KeyCode::misc(ord));
    }
    for &(ord, _) in EVENT_NAMES {
        codes.push(KeyCode::new(KeyRange::Event, ord));
    }
    for n in [0, 1, 255] {
        codes.push(KeyCode::new(KeyRange::Private, n));
        codes.push(KeyCode::new(KeyRange::Multikey, n));
    }
    codes
}
