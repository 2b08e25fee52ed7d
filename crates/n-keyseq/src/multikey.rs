// SPDX-License-Identifier: MIT
//
// Multikey allocation: key codes handed out at runtime for sequences that
// have no name of their own.
//
// The table is append-only. A code is allocated first and then assigned
// the sequence bytes it stands for; the bytes are borrowed for the table's
// lifetime, never copied.

use crate::error::{KeyError, Result};
use crate::keycode::{KeyCode, KeyRange, ORDINAL_MASK};

/// Slots are added this many at a time.
pub const BLOCK: usize = 16;

/// Largest limit a table accepts: one slot per multikey ordinal.
pub const MAX_LIMIT: usize = ORDINAL_MASK as usize + 1;

/// Runtime-allocated key codes and the sequences they stand for.
#[derive(Debug, Clone)]
pub struct MultikeyTable<'a> {
    slots: Vec<Option<&'a [u8]>>,
    limit: usize,
}

impl<'a> MultikeyTable<'a> {
    /// An empty table that will hand out at most `limit` codes (clamped to
    /// `1..=MAX_LIMIT`).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Codes allocated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Hand out the next multikey code, unassigned.
    ///
    /// # Errors
    ///
    /// [`KeyError::MultikeyExhausted`] once `limit` codes are in use, or
    /// [`KeyError::Alloc`] if the table cannot grow.
    pub fn allocate(&mut self) -> Result<KeyCode> {
        let index = self.slots.len();
        let exhausted = KeyError::MultikeyExhausted { limit: self.limit };
        if index >= self.limit {
            tracing::warn!(limit = self.limit, "multikey table exhausted");
            return Err(exhausted);
        }
        let Ok(ordinal) = u32::try_from(index) else {
            return Err(exhausted);
        };
        if index == self.slots.capacity() {
            let block = BLOCK.min(self.limit - index);
            self.slots.try_reserve_exact(block)?;
        }
        self.slots.push(None);
        Ok(KeyCode::new(KeyRange::Multikey, ordinal))
    }

    /// Record the sequence `code` stands for, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// [`KeyError::NotMultikey`] if `code` was not allocated by this table.
    pub fn assign(&mut self, code: KeyCode, bytes: &'a [u8]) -> Result<()> {
        let index = self.slot(code).ok_or(KeyError::NotMultikey(code.raw()))?;
        self.slots[index] = Some(bytes);
        Ok(())
    }

    /// Sequence assigned to `code`, if any.
    #[must_use]
    pub fn sequence(&self, code: KeyCode) -> Option<&'a [u8]> {
        self.slots.get(self.slot(code)?).copied().flatten()
    }

    /// Allocated codes and their sequences, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (KeyCode, Option<&'a [u8]>)> + '_ {
        (0..).zip(&self.slots).map(|(ordinal, &bytes)| {
            (KeyCode::new(KeyRange::Multikey, ordinal), bytes)
        })
    }

    fn slot(&self, code: KeyCode) -> Option<usize> {
        if !code.is_multikey() || !code.modifiers().is_empty() {
            return None;
        }
        let index = usize::try_from(code.ordinal()).ok()?;
        (index < self.slots.len()).then_some(index)
    }
}
