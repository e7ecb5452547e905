use crate::primitives::U256;
use core::cmp::min;
use std::vec::Vec;

/// Linear memory of one call frame.
///
/// Its length is always a multiple of 32. Growth is charged by [`Gas::record_memory_expansion`]
/// before [`Memory::resize`] is called, all accessors expect the range to be in bounds.
///
/// [`Gas::record_memory_expansion`]: crate::Gas::record_memory_expansion
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Creates empty memory with some capacity reserved.
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(4 * 1024),
        }
    }

    /// Get the length of the current memory range.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Return true if current effective memory range is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the full memory.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the type and returns the full memory.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Resize the memory, zero filling new bytes. `new_size` is a multiple of 32 that was paid for.
    pub fn resize(&mut self, new_size: usize) {
        self.data.resize(new_size, 0);
    }

    /// Get memory region at given offset.
    #[inline]
    pub fn slice(&self, offset: usize, size: usize) -> &[u8] {
        &self.data[offset..offset + size]
    }

    /// Reads a word at `offset`.
    #[inline]
    pub fn get_u256(&self, offset: usize) -> U256 {
        U256::from_be_slice(self.slice(offset, 32))
    }

    /// Writes a byte at `offset`.
    #[inline]
    pub fn set_byte(&mut self, offset: usize, byte: u8) {
        self.data[offset] = byte;
    }

    /// Writes a word at `offset`.
    #[inline]
    pub fn set_u256(&mut self, offset: usize, value: U256) {
        self.set(offset, &value.to_be_bytes::<32>());
    }

    /// Set memory region at given offset.
    #[inline]
    pub fn set(&mut self, offset: usize, value: &[u8]) {
        if !value.is_empty() {
            self.data[offset..offset + value.len()].copy_from_slice(value);
        }
    }

    /// Copy `len` bytes of `data` starting at `data_offset` to `memory_offset`, zero filling the
    /// part past the end of `data`.
    #[inline]
    pub fn set_data(&mut self, memory_offset: usize, data_offset: usize, len: usize, data: &[u8]) {
        let target = &mut self.data[memory_offset..memory_offset + len];
        if data_offset >= data.len() {
            target.fill(0);
            return;
        }
        let data_end = min(data_offset.saturating_add(len), data.len());
        let copied = data_end - data_offset;
        target[..copied].copy_from_slice(&data[data_offset..data_end]);
        target[copied..].fill(0);
    }

    /// In memory copy given a src, dst, and length
    #[inline]
    pub fn copy(&mut self, dst: usize, src: usize, length: usize) {
        self.data.copy_within(src..src + length, dst);
    }
}
