// SPDX-License-Identifier: MIT
//
// Wildcard patterns.
//
// A pattern is a sequence of atoms: literal bytes and wildcards. A wildcard
// matches one or more bytes. It is stored as a separate child of the node,
// not as an edge, so every byte value stays available for literal keys.
//
// Matching prefers literal edges. When a literal edge and a wildcard are
// both possible, the wildcard alternative is remembered; if the literal
// path later fails, the search resumes from that one remembered branch
// point (the most recent one). A wildcard first absorbs a single byte and
// then keeps absorbing while its child has no literal edge for the next
// byte. This is a bounded search, not a full regular-expression engine.

use crate::error::Result;
use crate::node::Node;
use crate::trie::Trie;

/// One step of a wildcard pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Atom {
    /// Matches exactly this byte (subject to the trie's [`Case`](crate::Case)).
    Byte(u8),
    /// Matches one or more bytes.
    Wild,
}

impl Atom {
    /// Build a pattern from bytes where `marker` stands for a wildcard.
    ///
    /// Only safe when `marker` can never appear literally in the patterns
    /// being stored.
    #[must_use]
    pub fn parse_marked(bytes: &[u8], marker: u8) -> Vec<Self> {
        bytes
            .iter()
            .map(|&b| if b == marker { Self::Wild } else { Self::Byte(b) })
            .collect()
    }
}

impl<V> Trie<V> {
    /// Store `value` under a wildcard pattern, returning the value it
    /// replaced.
    ///
    /// # Errors
    ///
    /// [`TrieError::Alloc`](crate::TrieError::Alloc) if an edge vector
    /// cannot grow.
    pub fn insert_wild(&mut self, pattern: &[Atom], value: V) -> Result<Option<V>> {
        let mut previous = None;
        self.replace_wild(pattern, |_, old| {
            previous = old;
            Some(value)
        })?;
        Ok(previous)
    }

    /// Wildcard counterpart of [`replace_with`](Trie::replace_with).
    ///
    /// # Errors
    ///
    /// [`TrieError::Alloc`](crate::TrieError::Alloc) if an edge vector
    /// cannot grow.
    pub fn replace_wild<F>(&mut self, pattern: &[Atom], replace: F) -> Result<Option<&mut V>>
    where
        F: FnOnce(&[Atom], Option<V>) -> Option<V>,
    {
        self.upsert(pattern.len(), |i| pattern[i], |old| replace(pattern, old))
    }

    /// Find the value whose pattern matches `key`.
    ///
    /// Literal edges win over wildcards; see the module notes for the
    /// single-backtrack rule.
    #[must_use]
    pub fn search_wild(&self, key: &[u8]) -> Option<&V> {
        let case = self.case();
        let mut node: &Node<V> = self.root();
        let mut i = 0;
        // Wildcard child currently absorbing bytes, if we are inside one.
        let mut absorbing: Option<&Node<V>> = None;
        // Most recent unresolved branch: resume inside this wildcard child
        // having absorbed the byte at this index.
        let mut retry: Option<(&Node<V>, usize)> = None;

        loop {
            let advanced = if i == key.len() {
                if let Some(value) = &node.value {
                    return Some(value);
                }
                false
            } else if let Some(child) = node.child(key[i], case) {
                if let Some(wild) = node.wild.as_deref() {
                    retry = Some((wild, i));
                } else if absorbing.is_some_and(|w| std::ptr::eq(w, node)) {
                    retry = Some((node, i));
                }
                node = child;
                i += 1;
                true
            } else if let Some(wild) = node.wild.as_deref() {
                node = wild;
                absorbing = Some(wild);
                i += 1;
                true
            } else if absorbing.is_some_and(|w| std::ptr::eq(w, node)) {
                i += 1;
                true
            } else {
                false
            };

            if !advanced {
                let (wild, at) = retry.take()?;
                node = wild;
                absorbing = Some(wild);
                i = at + 1;
            }
        }
    }
}
