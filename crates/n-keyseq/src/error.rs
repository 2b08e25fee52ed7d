// SPDX-License-Identifier: MIT
//
// Errors for the key layer.
//
// Ambiguous matches are not errors: they are an ordinary `MatchOutcome`.
// Malformed key names are not errors either when decoded best-effort with
// `codec::decode`; only the strict `codec::parse` reports them.

use std::collections::TryReserveError;

use n_trie::TrieError;
use thiserror::Error;

/// Result alias for the key layer.
pub type Result<T> = std::result::Result<T, KeyError>;

/// Errors raised by the key layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The sequence store could not allocate. Abandon the operation.
    #[error(transparent)]
    Trie(#[from] TrieError),

    /// A key name was not fully understood.
    #[error("unknown key name `{name}` (understood {consumed} of {} bytes)", .name.len())]
    UnknownName { name: String, consumed: usize },

    /// The multikey table could not grow.
    #[error("multikey table could not grow: {0}")]
    Alloc(#[from] TryReserveError),

    /// Every multikey code up to the configured limit is in use.
    #[error("multikey table exhausted ({limit} codes)")]
    MultikeyExhausted { limit: usize },

    /// The code is not one this table handed out.
    #[error("key code {0:#010x} is not an allocated multikey")]
    NotMultikey(u32),
}

impl KeyError {
    #[must_use]
    pub fn unknown_name(name: impl Into<String>, consumed: usize) -> Self {
        Self::UnknownName {
            name: name.into(),
            consumed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_failure_is_its_own_error() {
        let Err(reserve) = Vec::<u8>::new().try_reserve(usize::MAX) else {
            panic!("reserving usize::MAX bytes cannot succeed");
        };
        let err = KeyError::from(reserve);
        assert!(matches!(err, KeyError::Alloc(_)));
        assert!(err.to_string().starts_with("multikey table could not grow"));
    }

    #[test]
    fn unknown_name_message() {
        let err = KeyError::unknown_name("<Foo>", 1);
        assert_eq!(err.to_string(), "unknown key name `<Foo>` (understood 1 of 5 bytes)");
    }
}
