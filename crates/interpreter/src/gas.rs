//! Gas metering of a single call frame.

mod calc;
mod constants;

pub use calc::*;
pub use constants::*;

use crate::InstructionResult;

/// Represents the state of gas during execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gas {
    /// The initial gas limit. This is constant throughout execution.
    limit: u64,
    /// The remaining gas.
    remaining: u64,
    /// Memoisation of values for memory expansion cost.
    memory: MemoryGas,
}

impl Gas {
    /// Creates a new `Gas` struct with the given gas limit.
    #[inline]
    pub const fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
            memory: MemoryGas::new(),
        }
    }

    /// Returns the gas limit.
    #[inline]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns the memory expansion bookkeeping.
    #[inline]
    pub const fn memory(&self) -> &MemoryGas {
        &self.memory
    }

    /// Returns the total amount of gas spent.
    #[inline]
    pub const fn spent(&self) -> u64 {
        self.limit - self.remaining
    }

    /// Returns the amount of gas remaining.
    #[inline]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Erases a gas cost from the totals, crediting back unspent gas of a child frame.
    #[inline]
    pub fn erase_cost(&mut self, returned: u64) {
        self.remaining += returned;
    }

    /// Spends all remaining gas.
    #[inline]
    pub fn spend_all(&mut self) {
        self.remaining = 0;
    }

    /// Records an explicit cost.
    ///
    /// Returns `false` if the gas limit is exceeded, in which case nothing is charged.
    #[inline]
    #[must_use = "prefer using `gas!` instead to return an out-of-gas error on failure"]
    pub fn record_cost(&mut self, cost: u64) -> bool {
        if let Some(new_remaining) = self.remaining.checked_sub(cost) {
            self.remaining = new_remaining;
            return true;
        }
        false
    }

    /// Charges the expansion of memory so that `offset + len` bytes are addressable.
    ///
    /// Returns the new memory length in bytes, or `None` if memory does not grow. Nothing is
    /// charged on failure.
    #[inline]
    pub fn record_memory_expansion(
        &mut self,
        offset: u64,
        len: u64,
    ) -> Result<Option<usize>, InstructionResult> {
        if len == 0 {
            return Ok(None);
        }
        let new_size = offset.checked_add(len).ok_or(GasOverflow)?;
        let Some((words_num, cost)) = memory_expansion_cost(self.memory.expansion_cost, new_size)?
        else {
            return Ok(None);
        };
        if !self.record_cost(cost) {
            return Err(InstructionResult::MemoryOOG);
        }
        self.memory.set_words_num(words_num);
        Ok(Some(words_num as usize * 32))
    }
}

/// Utility struct that speeds up calculation of memory expansion.
/// It contains the current memory length and its memory expansion cost.
///
/// It allows us to split gas accounting from memory structure.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryGas {
    /// Current memory length in words.
    pub words_num: u64,
    /// Current memory expansion cost.
    pub expansion_cost: u64,
}

impl MemoryGas {
    /// Creates a new `MemoryGas` instance with zero memory allocation.
    #[inline]
    pub const fn new() -> Self {
        Self {
            words_num: 0,
            expansion_cost: 0,
        }
    }

    /// Sets the number of words and recomputes the total expansion cost.
    #[inline]
    pub fn set_words_num(&mut self, words_num: u64) {
        self.words_num = words_num;
        self.expansion_cost = memory_gas(words_num);
    }
}

/// A dynamic gas computation overflowed `u64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GasOverflow;

impl From<GasOverflow> for InstructionResult {
    fn from(_: GasOverflow) -> Self {
        InstructionResult::GasUintOverflow
    }
}
