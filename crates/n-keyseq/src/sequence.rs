// SPDX-License-Identifier: MIT
//
// Key sequence store: byte sequences a terminal sends, mapped to key codes.
//
// `SequenceStore` is the one interface the input layer talks to; `TrieStore`
// implements it over `n_trie::Trie`. Records are boxed so that replacing a
// sequence's code updates the record where it already lives.
//
// Single writer, single reader. `update` takes `&mut self`, so a `visit` or
// `flatten` snapshot can never observe a half-applied update.

use std::fmt;
use std::ops::ControlFlow;

use n_trie::{Case, Trie};

use crate::error::Result;
use crate::keycode::KeyCode;

/// A terminal byte sequence and the key it stands for.
#[derive(Clone, PartialEq, Eq)]
pub struct KeySequence {
    code: KeyCode,
    bytes: Box<[u8]>,
}

impl KeySequence {
    #[must_use]
    pub fn new(bytes: &[u8], code: KeyCode) -> Self {
        Self {
            code,
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> KeyCode {
        self.code
    }

    /// The sequence as stored (original case, even in a case-insensitive
    /// store).
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeySequence(\"{}\" => {})", self.bytes.escape_ascii(), self.code)
    }
}

/// How a buffered prefix relates to the stored sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A sequence ends here and nothing longer continues it.
    Complete,
    /// A sequence ends here, and longer ones continue it.
    Ambiguous,
    /// No sequence ends here, but longer ones continue it. Keep buffering.
    Prefix,
    /// Neither. The bytes do not begin any stored sequence.
    NoMatch,
}

/// Result of [`SequenceStore::match_prefix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    /// Record stored under exactly the searched bytes.
    pub record: Option<&'a KeySequence>,
    /// Number of distinct next bytes that continue the searched bytes.
    pub ambiguous: usize,
    /// One record that continues the searched bytes, for display.
    pub partial: Option<&'a KeySequence>,
}

impl Match<'_> {
    const NONE: Self = Self {
        record: None,
        ambiguous: 0,
        partial: None,
    };

    #[must_use]
    pub const fn outcome(&self) -> MatchOutcome {
        match (self.record.is_some(), self.ambiguous > 0) {
            (true, false) => MatchOutcome::Complete,
            (true, true) => MatchOutcome::Ambiguous,
            (false, true) => MatchOutcome::Prefix,
            (false, false) => MatchOutcome::NoMatch,
        }
    }

    /// Code of the exact record, if any.
    #[must_use]
    pub fn code(&self) -> Option<KeyCode> {
        self.record.map(KeySequence::code)
    }
}

/// Storage for key sequences.
pub trait SequenceStore {
    /// Record stored under exactly `seq`.
    fn lookup(&self, seq: &[u8]) -> Option<&KeySequence>;

    /// Map `seq` to `code`, replacing any previous mapping. Returns the
    /// stored record.
    ///
    /// # Errors
    ///
    /// [`KeyError::Trie`](crate::KeyError::Trie) if storage cannot grow.
    fn update(&mut self, seq: &[u8], code: KeyCode) -> Result<&KeySequence>;

    /// Classify `seq` against the stored sequences.
    fn match_prefix(&self, seq: &[u8]) -> Match<'_>;

    /// How sequence bytes are compared. Under [`Case::Insensitive`],
    /// sequences that differ only in ASCII case share one record.
    fn case(&self) -> Case;

    /// Visit every record whose sequence starts with `prefix`, in byte
    /// order, until the visitor breaks.
    fn visit<'s>(
        &'s self,
        prefix: &[u8],
        visitor: &mut dyn FnMut(&'s KeySequence) -> ControlFlow<()>,
    ) -> ControlFlow<()>;

    /// Every record, in byte order.
    fn flatten(&self) -> Vec<&KeySequence> {
        let mut out = Vec::with_capacity(self.len());
        let _ = self.visit(&[], &mut |record| {
            out.push(record);
            ControlFlow::Continue(())
        });
        out
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// [`SequenceStore`] backed by a byte trie.
#[derive(Debug, Default)]
pub struct TrieStore {
    trie: Trie<Box<KeySequence>>,
}

impl TrieStore {
    #[must_use]
    pub const fn new(case: Case) -> Self {
        Self {
            trie: Trie::new(case),
        }
    }

    /// Release every record. Returns how many there were.
    pub fn shutdown(mut self) -> usize {
        let released = self.trie.len();
        self.trie.clear();
        tracing::debug!(released, "sequence store shut down");
        released
    }
}

impl SequenceStore for TrieStore {
    fn lookup(&self, seq: &[u8]) -> Option<&KeySequence> {
        self.trie.get(seq).map(|record| &**record)
    }

    fn update(&mut self, seq: &[u8], code: KeyCode) -> Result<&KeySequence> {
        let stored = self.trie.replace_with(seq, |key, existing| match existing {
            Some(mut record) => {
                record.code = code;
                Some(record)
            }
            None => Some(Box::new(KeySequence::new(key, code))),
        })?;
        let Some(record) = stored else {
            unreachable!("replacer always stores a record");
        };
        Ok(&**record)
    }

    fn match_prefix(&self, seq: &[u8]) -> Match<'_> {
        if seq.is_empty() {
            return Match::NONE;
        }
        let hit = self.trie.search_ambiguous(seq);
        let found = Match {
            record: hit.value.map(|record| &**record),
            ambiguous: hit.children,
            partial: hit.partial.map(|record| &**record),
        };
        tracing::trace!(
            seq = %seq.escape_ascii(),
            outcome = ?found.outcome(),
            ambiguous = found.ambiguous,
            "match"
        );
        found
    }

    fn case(&self) -> Case {
        self.trie.case()
    }

    fn visit<'s>(
        &'s self,
        prefix: &[u8],
        visitor: &mut dyn FnMut(&'s KeySequence) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        self.trie.visit(prefix, |_, record| visitor(&**record))
    }

    fn len(&self) -> usize {
        self.trie.len()
    }
}
