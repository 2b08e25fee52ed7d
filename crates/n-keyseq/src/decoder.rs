// SPDX-License-Identifier: MIT
//
// Incremental key decoder: raw terminal bytes in, key codes out.
//
// Each step takes the longest stored sequence at the head of the buffer.
// Bytes that begin no stored sequence decode as one ASCII or UTF-8
// character. When the buffered bytes could still grow into a longer
// sequence, the decoder waits for more input.
//
// A sequence bound to `<Mouse>` is a report introducer: the decoder reads
// the report after it and emits the button it names.
//
// The decoder never reads a clock. A lone ESC is both the Escape key and
// the start of most sequences, so the caller decides how long to wait and
// then calls `flush` to commit whatever is pending.

use crate::keycode::button::{self, Action};
use crate::keycode::{KeyCode, KeyRange, Modifiers};
use crate::sequence::SequenceStore;

/// Byte-at-a-time key decoder over a [`SequenceStore`].
#[derive(Debug, Clone, Default)]
pub struct KeyDecoder {
    /// Bytes received but not yet decoded.
    buf: Vec<u8>,
}

impl KeyDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed raw bytes and return every key that can be decoded.
    ///
    /// Bytes that may still be the start of a longer sequence are kept and
    /// combined with the next call. Call [`flush`](Self::flush) after a
    /// timeout to commit them.
    pub fn advance<S: SequenceStore + ?Sized>(&mut self, store: &S, data: &[u8]) -> Vec<KeyCode> {
        self.buf.extend_from_slice(data);
        self.drain(store, false)
    }

    /// Decode all pending bytes without waiting for more: a pending prefix
    /// becomes the longest sequence it completes, or plain characters.
    pub fn flush<S: SequenceStore + ?Sized>(&mut self, store: &S) -> Vec<KeyCode> {
        self.drain(store, true)
    }

    /// Are there bytes waiting for more input?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    fn drain<S: SequenceStore + ?Sized>(&mut self, store: &S, flushing: bool) -> Vec<KeyCode> {
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match next_key(store, &self.buf[pos..], flushing) {
                Parsed::Key(code, consumed) => {
                    keys.push(code);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => {
                    tracing::trace!(byte = self.buf[pos], "skipping undecodable byte");
                    pos += n;
                }
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }
        keys
    }
}

/// Result of decoding one key from the head of the buffer.
enum Parsed {
    /// A key, consuming `usize` bytes.
    Key(KeyCode, usize),
    /// More bytes are needed.
    Incomplete,
    /// Undecodable byte(s), skip `usize` bytes.
    Skip(usize),
}

fn next_key<S: SequenceStore + ?Sized>(store: &S, buf: &[u8], flushing: bool) -> Parsed {
    let mut best = None;
    let mut live = false;

    for len in 1..=buf.len() {
        let found = store.match_prefix(&buf[..len]);
        if let Some(code) = found.code() {
            best = Some((code, len));
        }
        live = found.ambiguous > 0;
        if !live {
            break;
        }
    }

    if live && !flushing {
        return Parsed::Incomplete;
    }
    match best {
        Some((code, len)) if code == KeyCode::MOUSE => mouse_report(buf, len, flushing),
        Some((code, len)) => Parsed::Key(code, len),
        None => plain_char(buf, flushing),
    }
}

// ── Mouse reports ───────────────────────────────────────────────────────────

/// What follows a mouse report introducer.
enum Report {
    /// The button, and the payload length.
    Done(KeyCode, usize),
    Incomplete,
    /// Not a report; the first `usize` payload bytes are dropped.
    Invalid(usize),
}

/// Decode the report after an `intro`-byte introducer. An introducer ending
/// in `<` is SGR (`Pb ; Px ; Py` closed by `M` or `m`), anything else X10
/// (three raw bytes, each offset by 32). Coordinates are dropped.
fn mouse_report(buf: &[u8], intro: usize, flushing: bool) -> Parsed {
    let payload = &buf[intro..];
    let report = if buf[intro - 1] == b'<' {
        sgr_report(payload)
    } else {
        x10_report(payload)
    };
    match report {
        Report::Done(code, len) => Parsed::Key(code, intro + len),
        Report::Incomplete if !flushing => Parsed::Incomplete,
        // Cut off for good: the report is lost, the event is not.
        Report::Incomplete => Parsed::Key(KeyCode::MOUSE, buf.len()),
        Report::Invalid(len) => {
            tracing::debug!(dropped = len, "malformed mouse report");
            Parsed::Key(KeyCode::MOUSE, intro + len)
        }
    }
}

fn x10_report(payload: &[u8]) -> Report {
    match payload {
        [cb, _, _, ..] => Report::Done(button_code(u16::from(cb.wrapping_sub(32)), false), 3),
        _ => Report::Incomplete,
    }
}

fn sgr_report(payload: &[u8]) -> Report {
    let Some(end) = payload
        .iter()
        .position(|&b| !b.is_ascii_digit() && b != b';')
    else {
        return Report::Incomplete;
    };
    if !matches!(payload[end], b'M' | b'm') {
        return Report::Invalid(end);
    }
    let cb = payload[..end]
        .split(|&b| b == b';')
        .next()
        .and_then(|digits| std::str::from_utf8(digits).ok()?.parse::<u16>().ok())
        .unwrap_or(0);
    Report::Done(button_code(cb, payload[end] == b'm'), end + 1)
}

/// Button code for an xterm button byte: low two bits pick the button
/// (3 is "none"), 4/8/16 are Shift/Alt/Ctrl, 32 is motion, 64 the wheel.
fn button_code(cb: u16, release: bool) -> KeyCode {
    let base = u32::from(cb & 3);
    let ordinal = if cb & 64 != 0 {
        button::WHEEL_UP + base
    } else if base == 3 {
        button::MOUSE
    } else if cb & 32 != 0 {
        button::ordinal(base + 1, Action::Motion)
    } else if release {
        button::ordinal(base + 1, Action::Up)
    } else {
        button::ordinal(base + 1, Action::Down)
    };

    let mut modifiers = Modifiers::empty();
    if cb & 4 != 0 {
        modifiers |= Modifiers::SHIFT;
    }
    if cb & 8 != 0 {
        modifiers |= Modifiers::META;
    }
    if cb & 16 != 0 {
        modifiers |= Modifiers::CTRL;
    }
    KeyCode::new(KeyRange::Button, ordinal).with_modifiers(modifiers)
}

/// One ASCII or UTF-8 character.
fn plain_char(buf: &[u8], flushing: bool) -> Parsed {
    let expected = utf8_char_len(buf[0]);
    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return if flushing {
            Parsed::Skip(1)
        } else {
            Parsed::Incomplete
        };
    }
    match std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
    {
        Some(ch) => Parsed::Key(KeyCode::char(ch), expected),
        None => Parsed::Skip(1),
    }
}

/// Length of a UTF-8 sequence from its lead byte, 0 for a byte that cannot
/// start one.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}
