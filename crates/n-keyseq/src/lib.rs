// SPDX-License-Identifier: MIT
//
// n-keyseq — key codes, key names, and terminal escape-sequence decoding.
//
// Sits between raw terminal input and whatever consumes keys:
//
// - `KeyCode`: packed range, modifiers and ordinal in one `u32`.
// - `codec`: `<Alt-Ctrl-F1>`-style names to and from key codes.
// - `SequenceStore` / `TrieStore`: byte sequences to key codes, with
//   exact, ambiguous and prefix matching.
// - `defaults`: what xterm, VT220, rxvt and the Linux console send.
// - `KeyDecoder`: incremental byte feeder, longest match wins.
// - `MultikeyTable`: codes handed out at runtime for unnamed sequences.
// - `Keyboard`: all of the above as one owned object.

pub mod codec;
pub mod config;
pub mod decoder;
pub mod defaults;
pub mod error;
pub mod keyboard;
pub mod keycode;
pub mod multikey;
pub mod names;
pub mod sequence;

pub use codec::Decoded;
pub use config::KeyboardConfig;
pub use decoder::KeyDecoder;
pub use error::{KeyError, Result};
pub use keyboard::Keyboard;
pub use keycode::{KeyCode, KeyRange, Modifiers};
pub use multikey::MultikeyTable;
pub use sequence::{KeySequence, Match, MatchOutcome, SequenceStore, TrieStore};
