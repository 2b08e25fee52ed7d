// SPDX-License-Identifier: MIT
//
// Keyboard configuration.
//
// Defaults suit an xterm-compatible terminal. Environment variables
// override them:
//
//   NKEYS_CASE_INSENSITIVE  "1"/"true": match sequence bytes ignoring ASCII case
//   NKEYS_MULTIKEY_LIMIT    maximum multikey codes handed out (1..=16777216)
//   NKEYS_NO_DEFAULTS       "1"/"true": start with an empty sequence store
//
// Unparseable values are ignored; out-of-range values are clamped.

use n_trie::Case;

use crate::multikey::MAX_LIMIT;

/// Default number of multikey codes.
pub const DEFAULT_MULTIKEY_LIMIT: usize = 512;

/// Settings for a [`Keyboard`](crate::Keyboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardConfig {
    /// Match sequence bytes ignoring ASCII case. Default: false.
    pub case_insensitive: bool,
    /// Maximum multikey codes. Default: 512.
    pub multikey_limit: usize,
    /// Seed the store with the default terminal sequences. Default: true.
    pub seed_defaults: bool,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            multikey_limit: DEFAULT_MULTIKEY_LIMIT,
            seed_defaults: true,
        }
    }
}

impl KeyboardConfig {
    #[must_use]
    pub const fn with_case_insensitive(mut self, on: bool) -> Self {
        self.case_insensitive = on;
        self
    }

    #[must_use]
    pub const fn with_multikey_limit(mut self, limit: usize) -> Self {
        self.multikey_limit = limit;
        self
    }

    /// Start with an empty sequence store.
    #[must_use]
    pub const fn without_defaults(mut self) -> Self {
        self.seed_defaults = false;
        self
    }

    /// Byte comparison mode for the sequence store.
    #[must_use]
    pub const fn case(&self) -> Case {
        if self.case_insensitive {
            Case::Insensitive
        } else {
            Case::Sensitive
        }
    }

    /// Load config from environment variables (see the module header).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through
    /// `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("NKEYS_CASE_INSENSITIVE") {
            config.case_insensitive = is_true(&val);
        }

        if let Some(val) = lookup("NKEYS_MULTIKEY_LIMIT") {
            if let Ok(limit) = val.trim().parse::<usize>() {
                config.multikey_limit = limit;
            }
        }

        if let Some(val) = lookup("NKEYS_NO_DEFAULTS") {
            config.seed_defaults = !is_true(&val);
        }

        config.validated()
    }

    /// Clamp `multikey_limit` to `1..=16777216`, one code per multikey
    /// ordinal.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.multikey_limit = self.multikey_limit.clamp(1, MAX_LIMIT);
        self
    }
}

fn is_true(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}
