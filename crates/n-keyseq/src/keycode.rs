// SPDX-License-Identifier: MIT
//
// Packed key codes.
//
// A key code is a `u32` with three fields:
//
//   bit  31      reserved (always zero)
//   bits 28..31  modifiers: Meta/Alt, Ctrl, Shift
//   bits 24..28  range tag: Character, Function, Keypad, Misc, Multikey,
//                Private, Button, Event
//   bits  0..24  ordinal within the range (a Unicode scalar for
//                characters, zero-based index otherwise)
//
// Every `KeyCode` value carries a valid range tag, so the range is always
// recovered by masking. Codes built from raw integers go through
// `KeyCode::from_raw`, which rejects unknown tags.

use std::fmt;

use bitflags::bitflags;

use crate::codec;

/// Mask of the ordinal field.
pub const ORDINAL_MASK: u32 = 0x00ff_ffff;
/// Mask of the range tag field.
pub const RANGE_MASK: u32 = 0x0f00_0000;
/// Mask of the modifier field.
pub const MODIFIER_MASK: u32 = 0x7000_0000;

const RANGE_SHIFT: u32 = 24;

bitflags! {
    /// Modifier bits of a key code.
    ///
    /// Alt and Meta are the same bit; names render it as `Alt`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
    pub struct Modifiers: u32 {
        const META  = 0x1000_0000;
        const CTRL  = 0x2000_0000;
        const SHIFT = 0x4000_0000;
    }
}

impl Modifiers {
    /// Alias of [`META`](Self::META).
    pub const ALT: Self = Self::META;

    /// Modifier for an xterm-style CSI parameter (`1 + bitmask`, where the
    /// bitmask is Shift=1, Alt=2, Ctrl=4). Out-of-range parameters give
    /// `None`.
    #[must_use]
    pub const fn from_xterm_param(param: u8) -> Option<Self> {
        if param < 2 || param > 8 {
            return None;
        }
        let mask = param - 1;
        let mut bits = 0;
        if mask & 1 != 0 {
            bits |= Self::SHIFT.bits();
        }
        if mask & 2 != 0 {
            bits |= Self::META.bits();
        }
        if mask & 4 != 0 {
            bits |= Self::CTRL.bits();
        }
        Some(Self::from_bits_retain(bits))
    }
}

/// The range a key code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum KeyRange {
    /// A Unicode character, control characters included.
    Character = 0,
    /// Function keys, F1 stored as ordinal 0.
    Function = 1,
    /// Cursor, editing, and numeric keypad keys.
    Keypad = 2,
    /// Dedicated tab/backspace variants and command keys (Undo, Copy, ...).
    Misc = 3,
    /// Codes allocated at runtime for otherwise unknown sequences.
    Multikey = 4,
    /// Private or vendor keys.
    Private = 5,
    /// Mouse buttons and wheel.
    Button = 6,
    /// Terminal events: bracketed paste, focus, resize.
    Event = 7,
}

impl KeyRange {
    /// All ranges in tag order.
    pub const ALL: [Self; 8] = [
        Self::Character,
        Self::Function,
        Self::Keypad,
        Self::Misc,
        Self::Multikey,
        Self::Private,
        Self::Button,
        Self::Event,
    ];

    /// Range for a tag value, if it is one.
    #[must_use]
    pub const fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::Character),
            1 => Some(Self::Function),
            2 => Some(Self::Keypad),
            3 => Some(Self::Misc),
            4 => Some(Self::Multikey),
            5 => Some(Self::Private),
            6 => Some(Self::Button),
            7 => Some(Self::Event),
            _ => None,
        }
    }

    /// The tag already shifted into place.
    #[must_use]
    pub const fn bits(self) -> u32 {
        (self as u32) << RANGE_SHIFT
    }
}

// ── Ordinals ────────────────────────────────────────────────────────────────

/// Ordinals of the keypad range.
pub mod keypad {
    pub const INS: u32 = 0;
    pub const END: u32 = 1;
    pub const DOWN: u32 = 2;
    pub const PGDN: u32 = 3;
    pub const LEFT: u32 = 4;
    /// The unlabelled centre key (keypad 5).
    pub const CENTER: u32 = 5;
    pub const RIGHT: u32 = 6;
    pub const HOME: u32 = 7;
    pub const UP: u32 = 8;
    pub const PGUP: u32 = 9;
    pub const DEL: u32 = 10;
    pub const PLUS: u32 = 11;
    pub const MINUS: u32 = 12;
    pub const STAR: u32 = 13;
    pub const DIVIDE: u32 = 14;
    pub const EQUALS: u32 = 15;
    pub const ENTER: u32 = 16;
    pub const PAUSE: u32 = 17;
    pub const PRTSC: u32 = 18;
    pub const SCROLL: u32 = 19;
    pub const NUMLOCK: u32 = 20;
}

/// Ordinals of the misc range.
pub mod misc {
    pub const BACK_TAB: u32 = 0;
    pub const CTRL_TAB: u32 = 1;
    pub const ALT_TAB: u32 = 2;
    pub const CTRL_BACKSPACE: u32 = 3;
    pub const ALT_BACKSPACE: u32 = 4;
    pub const SHIFT_BACKSPACE: u32 = 5;
    pub const UNDO: u32 = 6;
    pub const REDO: u32 = 7;
    pub const COPY: u32 = 8;
    pub const CUT: u32 = 9;
    pub const PASTE: u32 = 10;
    pub const HELP: u32 = 11;
    pub const SEARCH: u32 = 12;
    pub const REPLACE: u32 = 13;
    pub const CANCEL: u32 = 14;
    pub const COMMAND: u32 = 15;
    pub const EXIT: u32 = 16;
    pub const NEXT: u32 = 17;
    pub const PREV: u32 = 18;
    pub const OPEN: u32 = 19;
    pub const SAVE: u32 = 20;
    pub const MENU: u32 = 21;
    pub const BREAK: u32 = 22;
}

/// Ordinals of the button range.
///
/// Buttons 1-3 each have Down, Up, Double, and Motion, starting at 1.
pub mod button {
    pub const MOUSE: u32 = 0;
    pub const WHEEL_UP: u32 = 13;
    pub const WHEEL_DOWN: u32 = 14;
    pub const WHEEL_LEFT: u32 = 15;
    pub const WHEEL_RIGHT: u32 = 16;

    /// Button actions, in ordinal order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Action {
        Down = 0,
        Up = 1,
        Double = 2,
        Motion = 3,
    }

    /// Ordinal of `button` performing `action`.
    ///
    /// # Panics
    ///
    /// If `button` is not 1, 2 or 3.
    #[must_use]
    pub const fn ordinal(button: u32, action: Action) -> u32 {
        assert!(matches!(button, 1..=3), "mouse buttons are numbered 1 to 3");
        1 + (button - 1) * 4 + action as u32
    }
}

/// Ordinals of the event range.
pub mod event {
    pub const BRACKETED_PASTE: u32 = 0;
    pub const FOCUS_IN: u32 = 1;
    pub const FOCUS_OUT: u32 = 2;
    pub const RESIZE: u32 = 3;
    pub const BRACKETED_PASTE_END: u32 = 4;
}

// ── KeyCode ─────────────────────────────────────────────────────────────────

/// A packed key code: range tag, modifiers, and ordinal.
///
/// `Display` renders the canonical name (`<Alt-Ctrl-F1>`), `FromStr`
/// parses one strictly.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(u32);

impl KeyCode {
    pub const ESC: Self = Self::char('\x1b');
    pub const ENTER: Self = Self::char('\r');
    pub const TAB: Self = Self::char('\t');
    pub const BACKSPACE: Self = Self::char('\x08');
    pub const SPACE: Self = Self::char(' ');

    pub const UP: Self = Self::keypad(keypad::UP);
    pub const DOWN: Self = Self::keypad(keypad::DOWN);
    pub const LEFT: Self = Self::keypad(keypad::LEFT);
    pub const RIGHT: Self = Self::keypad(keypad::RIGHT);
    pub const HOME: Self = Self::keypad(keypad::HOME);
    pub const END: Self = Self::keypad(keypad::END);
    pub const PGUP: Self = Self::keypad(keypad::PGUP);
    pub const PGDN: Self = Self::keypad(keypad::PGDN);
    pub const INS: Self = Self::keypad(keypad::INS);
    pub const DEL: Self = Self::keypad(keypad::DEL);

    pub const BACK_TAB: Self = Self::new(KeyRange::Misc, misc::BACK_TAB);
    pub const MOUSE: Self = Self::new(KeyRange::Button, button::MOUSE);

    /// Build a code from a range and an ordinal. The ordinal is truncated to
    /// 24 bits.
    #[must_use]
    pub const fn new(range: KeyRange, ordinal: u32) -> Self {
        Self(range.bits() | (ordinal & ORDINAL_MASK))
    }

    /// A plain character.
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::new(KeyRange::Character, ch as u32)
    }

    /// Function key by zero-based index (`function(0)` is F1).
    #[must_use]
    pub const fn function(index: u32) -> Self {
        Self::new(KeyRange::Function, index)
    }

    /// Keypad key by ordinal (see [`keypad`]).
    #[must_use]
    pub const fn keypad(ordinal: u32) -> Self {
        Self::new(KeyRange::Keypad, ordinal)
    }

    /// Misc key by ordinal (see [`misc`]).
    #[must_use]
    pub const fn misc(ordinal: u32) -> Self {
        Self::new(KeyRange::Misc, ordinal)
    }

    /// Rebuild a code from its integer form. Rejects unknown range tags and
    /// the reserved top bit.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        if raw & 0x8000_0000 != 0 {
            return None;
        }
        match KeyRange::from_tag((raw & RANGE_MASK) >> RANGE_SHIFT) {
            Some(_) => Some(Self(raw)),
            None => None,
        }
    }

    /// The integer form.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn range(self) -> KeyRange {
        match KeyRange::from_tag((self.0 & RANGE_MASK) >> RANGE_SHIFT) {
            Some(range) => range,
            // Constructors only ever produce valid tags.
            None => KeyRange::Character,
        }
    }

    #[must_use]
    pub const fn ordinal(self) -> u32 {
        self.0 & ORDINAL_MASK
    }

    #[must_use]
    pub const fn modifiers(self) -> Modifiers {
        Modifiers::from_bits_truncate(self.0 & MODIFIER_MASK)
    }

    /// The same key without modifiers.
    #[must_use]
    pub const fn base(self) -> Self {
        Self(self.0 & !MODIFIER_MASK)
    }

    /// Add modifiers.
    #[must_use]
    pub const fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self(self.0 | modifiers.bits())
    }

    /// Remove modifiers.
    #[must_use]
    pub const fn without_modifiers(self, modifiers: Modifiers) -> Self {
        Self(self.0 & !modifiers.bits())
    }

    /// The character, for unmodified or modified character-range codes.
    #[must_use]
    pub const fn as_char(self) -> Option<char> {
        match self.range() {
            KeyRange::Character => char::from_u32(self.ordinal()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_multikey(self) -> bool {
        matches!(self.range(), KeyRange::Multikey)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::encode(*self))
    }
}

impl fmt::Debug for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyCode({:#010x} {})", self.0, codec::encode(*self))
    }
}

impl std::str::FromStr for KeyCode {
    type Err = crate::error::KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::parse(s)
    }
}
