// SPDX-License-Identifier: MIT
//
// n-trie — byte-keyed prefix tree for n-keys.
//
// The storage engine under the key-sequence layer. Terminal escape
// sequences share long prefixes (`ESC [ 1 ; 5 A`, `ESC [ 1 ; 5 B`, ...),
// and the input loop needs to know, for every byte prefix it has buffered,
// whether a stored key ends there, whether longer keys continue from
// there, or neither. A trie answers all three in one descent.
//
// - `Trie`: sorted-edge nodes, exact search, ambiguous-prefix search,
//   insert-or-replace through a callback, tombstones and pruning.
// - `Iter` / `Trie::visit`: lexicographic traversal, optionally under a
//   prefix.
// - `Atom`: wildcard patterns with single-backtrack matching.

pub mod error;
pub mod iter;
pub mod node;
pub mod trie;
pub mod wild;

pub use error::{Result, TrieError};
pub use iter::Iter;
pub use node::{Case, MAX_EDGES};
pub use trie::{Ambiguous, Trie};
pub use wild::Atom;
