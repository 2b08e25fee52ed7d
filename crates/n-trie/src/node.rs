// SPDX-License-Identifier: MIT
//
// Trie nodes.
//
// Each node owns a vector of edges sorted by (case-folded) byte, so the
// child for a given byte is found with a binary search. Edge vectors grow
// geometrically (1, 2, 4, ... 256) through `try_reserve_exact`, which keeps
// small nodes small and lets allocation failure propagate as an error.
//
// A node may also own one out-of-band wildcard child. It lives outside the
// edge vector, so no byte value is reserved for it.

use crate::error::Result;

/// Maximum number of edges a node can hold: one per byte value.
pub const MAX_EDGES: usize = 256;

/// How bytes are compared during descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Case {
    /// Bytes compare exactly.
    #[default]
    Sensitive,
    /// ASCII letters compare without regard to case. Edges keep the byte
    /// that was first inserted.
    Insensitive,
}

impl Case {
    /// Normalize a byte for comparison.
    #[inline]
    #[must_use]
    pub const fn fold(self, byte: u8) -> u8 {
        match self {
            Self::Sensitive => byte,
            Self::Insensitive => byte.to_ascii_lowercase(),
        }
    }
}

/// A labelled link to a child node.
#[derive(Debug, Clone)]
pub(crate) struct Edge<V> {
    pub(crate) byte: u8,
    pub(crate) child: Box<Node<V>>,
}

/// One trie node: sorted edges, an optional value, an optional wildcard.
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    pub(crate) edges: Vec<Edge<V>>,
    pub(crate) value: Option<V>,
    pub(crate) wild: Option<Box<Node<V>>>,
}

impl<V> Node<V> {
    pub(crate) const fn new() -> Self {
        Self {
            edges: Vec::new(),
            value: None,
            wild: None,
        }
    }

    pub(crate) const fn leaf(value: Option<V>) -> Self {
        Self {
            edges: Vec::new(),
            value,
            wild: None,
        }
    }

    /// Binary search for `byte`. `Ok(i)` is the matching edge, `Err(i)` the
    /// slot where an edge for `byte` would be inserted.
    #[inline]
    pub(crate) fn find(&self, byte: u8, case: Case) -> std::result::Result<usize, usize> {
        let needle = case.fold(byte);
        self.edges
            .binary_search_by_key(&needle, |edge| case.fold(edge.byte))
    }

    #[inline]
    pub(crate) fn child(&self, byte: u8, case: Case) -> Option<&Self> {
        self.find(byte, case).ok().map(|i| &*self.edges[i].child)
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, byte: u8, case: Case) -> Option<&mut Self> {
        match self.find(byte, case) {
            Ok(i) => Some(&mut *self.edges[i].child),
            Err(_) => None,
        }
    }

    /// Make room for one more edge, doubling capacity up to [`MAX_EDGES`].
    pub(crate) fn reserve_edge(&mut self) -> Result<()> {
        let cap = self.edges.capacity();
        if self.edges.len() < cap {
            return Ok(());
        }
        let target = (cap * 2).clamp(1, MAX_EDGES);
        self.edges.try_reserve_exact(target - self.edges.len())?;
        Ok(())
    }

    /// Insert an edge at a slot previously returned by [`find`](Self::find).
    ///
    /// The caller must have called [`reserve_edge`](Self::reserve_edge), so
    /// this never reallocates.
    pub(crate) fn link(&mut self, at: usize, byte: u8, child: Self) {
        debug_assert!(self.edges.len() < self.edges.capacity());
        self.edges.insert(
            at,
            Edge {
                byte,
                child: Box::new(child),
            },
        );
    }

    /// No value, no edges, no wildcard: safe to unlink.
    #[inline]
    pub(crate) fn is_dead(&self) -> bool {
        self.value.is_none() && self.edges.is_empty() && self.wild.is_none()
    }

    /// First value in depth-first, lexicographic order, this node included.
    pub(crate) fn first_value(&self) -> Option<&V> {
        if let Some(value) = &self.value {
            return Some(value);
        }
        self.edges.iter().find_map(|edge| edge.child.first_value())
    }

    /// Collapse dead subtrees below this node. Returns nodes released.
    pub(crate) fn prune(&mut self) -> usize {
        let mut removed = 0;
        for edge in &mut self.edges {
            removed += edge.child.prune();
        }
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.child.is_dead());
        removed += before - self.edges.len();

        if let Some(wild) = &mut self.wild {
            removed += wild.prune();
            if wild.is_dead() {
                self.wild = None;
                removed += 1;
            }
        }
        removed
    }

    /// Nodes in this subtree, this one included.
    pub(crate) fn count(&self) -> usize {
        1 + self
            .edges
            .iter()
            .map(|edge| edge.child.count())
            .sum::<usize>()
            + self.wild.as_ref().map_or(0, |wild| wild.count())
    }
}
