// SPDX-License-Identifier: MIT
//
// Lexicographic cursor over a trie.
//
// An explicit stack replaces the recursion of `Trie::visit`, so callers can
// pull one entry at a time and stop whenever they like. The cursor borrows
// the trie immutably; building a new one restarts the walk.

use std::iter::FusedIterator;

use crate::node::Node;

struct Frame<'a, V> {
    node: &'a Node<V>,
    next_edge: usize,
    seen_value: bool,
}

impl<'a, V> Frame<'a, V> {
    const fn new(node: &'a Node<V>) -> Self {
        Self {
            node,
            next_edge: 0,
            seen_value: false,
        }
    }
}

/// Iterator over `(key, value)` pairs in ascending byte order.
///
/// Created by [`Trie::iter`](crate::Trie::iter) and
/// [`Trie::iter_prefix`](crate::Trie::iter_prefix). Keys are rebuilt from the
/// stored edge bytes. Wildcard entries are skipped.
pub struct Iter<'a, V> {
    stack: Vec<Frame<'a, V>>,
    key: Vec<u8>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(start: Option<(&'a Node<V>, Vec<u8>)>) -> Self {
        match start {
            Some((node, key)) => Self {
                stack: vec![Frame::new(node)],
                key,
            },
            None => Self {
                stack: Vec::new(),
                key: Vec::new(),
            },
        }
    }

    /// True once every entry has been returned.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.stack.is_empty()
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let node: &'a Node<V> = frame.node;

            if !frame.seen_value {
                frame.seen_value = true;
                if let Some(value) = &node.value {
                    return Some((self.key.clone(), value));
                }
            }

            if let Some(edge) = node.edges.get(frame.next_edge) {
                frame.next_edge += 1;
                self.key.push(edge.byte);
                self.stack.push(Frame::new(&edge.child));
            } else {
                self.stack.pop();
                // The base frame's key is the prefix itself.
                if !self.stack.is_empty() {
                    self.key.pop();
                }
            }
        }
    }
}

impl<V> FusedIterator for Iter<'_, V> {}
