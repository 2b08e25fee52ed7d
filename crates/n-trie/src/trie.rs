// SPDX-License-Identifier: MIT
//
// Trie — an ordered associative container keyed by byte strings.
//
// Keys share storage for their common prefixes. Lookup descends one node
// per key byte with a binary search over the node's sorted edges, so a
// search costs O(k · log b) for a k-byte key and b ≤ 256 edges per node.
//
// # Values and tombstones
//
// A node carries `Option<V>`. Storing `None` (through `remove`, or a
// replacer that returns `None`) clears the value but keeps the nodes; call
// [`Trie::prune`] to release value-less, childless subtrees. Until then
// [`Trie::search_ambiguous`] still counts edges that lead only to
// tombstones.
//
// # Threading
//
// There is no internal synchronization. Every mutation takes `&mut self`,
// so the borrow checker already rules out mutating while an iterator or
// visitor is walking the same trie. Sharing one across threads needs an
// external lock.

use std::ops::ControlFlow;

use crate::error::Result;
use crate::iter::Iter;
use crate::node::{Case, Node};
use crate::wild::Atom;

/// Result of [`Trie::search_ambiguous`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ambiguous<'a, V> {
    /// Value stored under exactly the searched key.
    pub value: Option<&'a V>,
    /// Distinct next bytes from the matched node. Zero means no stored key
    /// extends the searched key.
    pub children: usize,
    /// When `children > 0`, the lexicographically smallest value stored
    /// strictly below the matched node. A display hint only.
    pub partial: Option<&'a V>,
}

impl<V> Ambiguous<'_, V> {
    const fn none() -> Self {
        Self {
            value: None,
            children: 0,
            partial: None,
        }
    }
}

/// Byte-string keyed prefix tree.
///
/// # Example
///
/// ```
/// use n_trie::{Case, Trie};
///
/// let mut trie = Trie::new(Case::Sensitive);
/// trie.insert(b"\x1bOA", "up").unwrap();
/// trie.insert(b"\x1bO2A", "shift-up").unwrap();
///
/// assert_eq!(trie.get(b"\x1bOA"), Some(&"up"));
/// assert_eq!(trie.get(b"\x1bO"), None);
///
/// let hit = trie.search_ambiguous(b"\x1bO");
/// assert_eq!(hit.value, None);
/// assert_eq!(hit.children, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Trie<V> {
    root: Node<V>,
    case: Case,
    len: usize,
}

/// How one descent step continues from a node.
enum Step {
    Edge(usize),
    Wild,
    Stop,
}

impl<V> Trie<V> {
    /// Create an empty trie.
    #[must_use]
    pub const fn new(case: Case) -> Self {
        Self {
            root: Node::new(),
            case,
            len: 0,
        }
    }

    /// Byte comparison mode chosen at construction.
    #[must_use]
    pub const fn case(&self) -> Case {
        self.case
    }

    /// Number of stored values, wildcard entries included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True when no value is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total nodes, root included. Tombstoned nodes count until pruned.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    // ── Search ──────────────────────────────────────────────────────────

    pub(crate) fn descend(&self, key: &[u8]) -> Option<&Node<V>> {
        let mut node = &self.root;
        for &byte in key {
            node = node.child(byte, self.case)?;
        }
        Some(node)
    }

    /// Like [`descend`](Self::descend), also returning the stored edge
    /// bytes along the path (they differ from `key` only when
    /// case-insensitive).
    pub(crate) fn descend_path(&self, key: &[u8]) -> Option<(&Node<V>, Vec<u8>)> {
        let mut node = &self.root;
        let mut path = Vec::with_capacity(key.len());
        for &byte in key {
            let i = node.find(byte, self.case).ok()?;
            path.push(node.edges[i].byte);
            node = &*node.edges[i].child;
        }
        Some((node, path))
    }

    /// Value stored under exactly `key`.
    ///
    /// A key that stops part way down the trie, at a node without a value,
    /// is "not found" even though longer keys start with it.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.descend(key)?.value.as_ref()
    }

    /// Mutable access to the value stored under exactly `key`.
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let case = self.case;
        let mut node = &mut self.root;
        for &byte in key {
            node = node.child_mut(byte, case)?;
        }
        node.value.as_mut()
    }

    /// True when a value is stored under exactly `key`.
    #[must_use]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Exact search that also reports whether longer keys share `key`.
    ///
    /// The empty key, and any key that cannot be fully consumed, yields a
    /// result with no value and zero children.
    #[must_use]
    pub fn search_ambiguous(&self, key: &[u8]) -> Ambiguous<'_, V> {
        if key.is_empty() {
            return Ambiguous::none();
        }
        let Some(node) = self.descend(key) else {
            return Ambiguous::none();
        };
        let children = node.edges.len();
        let partial = if children == 0 {
            None
        } else {
            node.edges.iter().find_map(|edge| edge.child.first_value())
        };
        Ambiguous {
            value: node.value.as_ref(),
            children,
            partial,
        }
    }

    // ── Mutation ────────────────────────────────────────────────────────

    /// Insert or replace the value under `key` through a callback.
    ///
    /// `replace` receives the key and the existing value (moved out of the
    /// trie, `None` if there was none) and returns the value to store.
    /// Returning the existing value, possibly mutated, keeps its allocation;
    /// returning `None` leaves a tombstone.
    ///
    /// Missing nodes are built detached and linked in one step once they are
    /// complete. Returns the stored value, if any.
    ///
    /// # Errors
    ///
    /// [`TrieError::Alloc`](crate::TrieError::Alloc) if an edge vector
    /// cannot grow.
    pub fn replace_with<F>(&mut self, key: &[u8], replace: F) -> Result<Option<&mut V>>
    where
        F: FnOnce(&[u8], Option<V>) -> Option<V>,
    {
        self.upsert(key.len(), |i| Atom::Byte(key[i]), |old| replace(key, old))
    }

    /// Store `value` under `key`, returning the value it replaced.
    ///
    /// # Errors
    ///
    /// [`TrieError::Alloc`](crate::TrieError::Alloc) if an edge vector
    /// cannot grow.
    pub fn insert(&mut self, key: &[u8], value: V) -> Result<Option<V>> {
        let mut previous = None;
        self.replace_with(key, |_, old| {
            previous = old;
            Some(value)
        })?;
        Ok(previous)
    }

    /// Clear the value under `key`, leaving its nodes in place.
    pub fn remove(&mut self, key: &[u8]) -> Option<V> {
        let case = self.case;
        let mut node = &mut self.root;
        for &byte in key {
            node = node.child_mut(byte, case)?;
        }
        let old = node.value.take();
        if old.is_some() {
            self.len -= 1;
        }
        old
    }

    /// Release every value-less, childless subtree. Returns the number of
    /// nodes released. Idempotent; the root is never released.
    pub fn prune(&mut self) -> usize {
        let removed = self.root.prune();
        if removed > 0 {
            tracing::trace!(removed, "pruned trie");
        }
        removed
    }

    /// Drop every value and node.
    pub fn clear(&mut self) {
        self.root = Node::new();
        self.len = 0;
    }

    /// Shared insert-or-replace engine for literal keys and wildcard
    /// patterns. `atom(i)` yields the i-th of `len` path steps.
    pub(crate) fn upsert<A, F>(&mut self, len: usize, atom: A, replace: F) -> Result<Option<&mut V>>
    where
        A: Fn(usize) -> Atom,
        F: FnOnce(Option<V>) -> Option<V>,
    {
        let case = self.case;
        let mut node = &mut self.root;
        let mut depth = 0;

        while depth < len {
            let step = match atom(depth) {
                Atom::Byte(byte) => node.find(byte, case).map_or(Step::Stop, Step::Edge),
                Atom::Wild if node.wild.is_some() => Step::Wild,
                Atom::Wild => Step::Stop,
            };
            node = match step {
                Step::Edge(i) => &mut *node.edges[i].child,
                Step::Wild => {
                    let Some(wild) = node.wild.as_deref_mut() else {
                        unreachable!("wildcard step without a wildcard child");
                    };
                    wild
                }
                Step::Stop => break,
            };
            depth += 1;
        }

        // The whole path exists: replace in place.
        if depth == len {
            let old = node.value.take();
            let had = old.is_some();
            node.value = replace(old);
            match (had, node.value.is_some()) {
                (false, true) => self.len += 1,
                (true, false) => self.len -= 1,
                _ => {}
            }
            return Ok(node.value.as_mut());
        }

        // Storing a tombstone under a missing key changes nothing.
        let Some(value) = replace(None) else {
            return Ok(None);
        };

        // Reserve the attach slot first so a failure there leaves the trie
        // untouched, then build the missing tail bottom-up.
        let slot = match atom(depth) {
            Atom::Byte(byte) => {
                let at = node.find(byte, case).unwrap_or_else(|at| at);
                node.reserve_edge()?;
                Some((at, byte))
            }
            Atom::Wild => None,
        };

        let mut tail = Node::leaf(Some(value));
        for i in (depth + 1..len).rev() {
            let mut parent = Node::new();
            match atom(i) {
                Atom::Byte(byte) => {
                    parent.reserve_edge()?;
                    parent.link(0, byte, tail);
                }
                Atom::Wild => parent.wild = Some(Box::new(tail)),
            }
            tail = parent;
        }

        let mut node = match slot {
            Some((at, byte)) => {
                node.link(at, byte, tail);
                &mut *node.edges[at].child
            }
            None => &mut **node.wild.insert(Box::new(tail)),
        };
        self.len += 1;

        // Walk the freshly linked chain down to the value.
        for i in depth + 1..len {
            node = match atom(i) {
                Atom::Byte(_) => &mut *node.edges[0].child,
                Atom::Wild => {
                    let Some(wild) = node.wild.as_deref_mut() else {
                        unreachable!("built chain lost its wildcard child");
                    };
                    wild
                }
            };
        }
        Ok(node.value.as_mut())
    }

    // ── Traversal ───────────────────────────────────────────────────────

    /// Visit every value under `prefix` (empty for all) in lexicographic
    /// key order. The visitor receives the full key and may stop the walk
    /// early by returning [`ControlFlow::Break`].
    ///
    /// Returns `Break` if the visitor aborted. Wildcard entries are not
    /// visited.
    pub fn visit<'a, F>(&'a self, prefix: &[u8], mut visitor: F) -> ControlFlow<()>
    where
        F: FnMut(&[u8], &'a V) -> ControlFlow<()>,
    {
        let Some((node, mut key)) = self.descend_path(prefix) else {
            return ControlFlow::Continue(());
        };
        walk(node, &mut key, &mut visitor)
    }

    /// Cursor over all `(key, value)` pairs in lexicographic order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(Some((&self.root, Vec::new())))
    }

    /// Cursor over the pairs whose key starts with `prefix`.
    #[must_use]
    pub fn iter_prefix(&self, prefix: &[u8]) -> Iter<'_, V> {
        Iter::new(self.descend_path(prefix))
    }

    /// All values in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    pub(crate) const fn root(&self) -> &Node<V> {
        &self.root
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new(Case::Sensitive)
    }
}

impl<'a, V> IntoIterator for &'a Trie<V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn walk<'a, V, F>(node: &'a Node<V>, key: &mut Vec<u8>, visitor: &mut F) -> ControlFlow<()>
where
    F: FnMut(&[u8], &'a V) -> ControlFlow<()>,
{
    if let Some(value) = &node.value {
        visitor(key, value)?;
    }
    for edge in &node.edges {
        key.push(edge.byte);
        let flow = walk(&*edge.child, key, visitor);
        key.pop();
        flow?;
    }
    ControlFlow::Continue(())
}
