// SPDX-License-Identifier: MIT
//
// Trie errors.
//
// The only failure a trie operation can report is running out of memory
// while growing a node's edge vector. Edge vectors are grown with
// `try_reserve_exact`, so the allocator's refusal surfaces here instead of
// aborting the process.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result alias for trie operations.
pub type Result<T> = std::result::Result<T, TrieError>;

/// Errors raised by mutating trie operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrieError {
    /// Growing an edge vector failed.
    ///
    /// A newly built node is never linked until it is complete, but the
    /// surrounding operation is abandoned half way. Callers should give up
    /// on the operation rather than retry against the same trie.
    #[error("trie node allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}
