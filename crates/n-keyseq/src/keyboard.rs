// SPDX-License-Identifier: MIT
//
// Keyboard: the key subsystem as one owned object.
//
// Owns the configuration, the sequence store and the multikey table. Built
// once, torn down once with `shutdown`. Sequences registered as multikeys
// are borrowed for the keyboard's lifetime `'a`.

use crate::codec;
use crate::config::KeyboardConfig;
use crate::decoder::KeyDecoder;
use crate::defaults;
use crate::error::Result;
use crate::keycode::KeyCode;
use crate::multikey::MultikeyTable;
use crate::sequence::{Match, SequenceStore, TrieStore};

/// Terminal keyboard: sequences, names, and runtime multikeys.
///
/// # Example
///
/// ```
/// use n_keyseq::{Keyboard, KeyboardConfig, KeyCode};
///
/// let mut keyboard = Keyboard::new(KeyboardConfig::default()).unwrap();
/// assert_eq!(keyboard.lookup(b"\x1b[A"), Some(KeyCode::UP));
///
/// keyboard.bind(b"\x1b[99~", "<Help>").unwrap();
/// assert_eq!(keyboard.name_of(keyboard.lookup(b"\x1b[99~").unwrap()), "<Help>");
/// ```
#[derive(Debug)]
pub struct Keyboard<'a> {
    config: KeyboardConfig,
    store: TrieStore,
    multikeys: MultikeyTable<'a>,
}

impl<'a> Keyboard<'a> {
    /// Build the keyboard, seeding the default sequences unless the config
    /// says otherwise.
    ///
    /// # Errors
    ///
    /// [`KeyError::Trie`](crate::KeyError::Trie) if the store cannot grow.
    pub fn new(config: KeyboardConfig) -> Result<Self> {
        let config = config.validated();
        let mut store = TrieStore::new(config.case());
        let seeded = if config.seed_defaults {
            defaults::seed(&mut store)?
        } else {
            0
        };
        tracing::info!(
            sequences = store.len(),
            seeded,
            case_insensitive = config.case_insensitive,
            "keyboard ready"
        );
        Ok(Self {
            multikeys: MultikeyTable::new(config.multikey_limit),
            config,
            store,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    /// Map `seq` to the key named `name` (`"<Ctrl-F5>"`).
    ///
    /// # Errors
    ///
    /// [`KeyError::UnknownName`](crate::KeyError::UnknownName) for a name
    /// that does not parse, or a store error.
    pub fn bind(&mut self, seq: &[u8], name: &str) -> Result<KeyCode> {
        let code = codec::parse(name)?;
        self.bind_code(seq, code)
    }

    /// Map `seq` to `code`, replacing any earlier mapping.
    ///
    /// # Errors
    ///
    /// [`KeyError::Trie`](crate::KeyError::Trie) if the store cannot grow.
    pub fn bind_code(&mut self, seq: &[u8], code: KeyCode) -> Result<KeyCode> {
        Ok(self.store.update(seq, code)?.code())
    }

    /// Code for `seq`, allocating a multikey if it has none yet.
    ///
    /// # Errors
    ///
    /// [`KeyError::MultikeyExhausted`](crate::KeyError::MultikeyExhausted)
    /// when no multikey is left, [`KeyError::Alloc`](crate::KeyError::Alloc)
    /// when the multikey table cannot grow, or a store error.
    pub fn register(&mut self, seq: &'a [u8]) -> Result<KeyCode> {
        if let Some(record) = self.store.lookup(seq) {
            return Ok(record.code());
        }
        let code = self.multikeys.allocate()?;
        self.multikeys.assign(code, seq)?;
        self.store.update(seq, code)?;
        tracing::debug!(seq = %seq.escape_ascii(), %code, "registered multikey");
        Ok(code)
    }

    #[must_use]
    pub fn lookup(&self, seq: &[u8]) -> Option<KeyCode> {
        self.store.lookup(seq).map(|record| record.code())
    }

    #[must_use]
    pub fn match_prefix(&self, seq: &[u8]) -> Match<'_> {
        self.store.match_prefix(seq)
    }

    /// Display name of `code`; multikeys show their sequence.
    #[must_use]
    pub fn name_of(&self, code: KeyCode) -> String {
        codec::encode_with(code, &self.multikeys)
    }

    #[must_use]
    pub const fn store(&self) -> &TrieStore {
        &self.store
    }

    #[must_use]
    pub const fn multikeys(&self) -> &MultikeyTable<'a> {
        &self.multikeys
    }

    /// A fresh decoder, independent of any keyboard. Feed it through
    /// [`feed`](Self::feed) or against [`store`](Self::store).
    #[must_use]
    pub fn decoder() -> KeyDecoder {
        KeyDecoder::new()
    }

    /// Decode `data` with `decoder` against this keyboard's sequences.
    pub fn feed(&self, decoder: &mut KeyDecoder, data: &[u8]) -> Vec<KeyCode> {
        decoder.advance(&self.store, data)
    }

    /// Tear down. Returns the number of sequence records released.
    pub fn shutdown(self) -> usize {
        let multikeys = self.multikeys.len();
        let released = self.store.shutdown();
        tracing::info!(released, multikeys, "keyboard shut down");
        released
    }
}
