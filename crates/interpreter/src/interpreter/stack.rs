use crate::{
    primitives::{B256, STACK_LIMIT, U256},
    InstructionResult,
};
use core::fmt;
use std::vec::Vec;

/// EVM stack.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stack {
    data: Vec<U256>,
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{x}")?;
        }
        f.write_str("]")
    }
}

impl Default for Stack {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    /// Instantiate a new stack with the [default stack limit][STACK_LIMIT].
    #[inline]
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(STACK_LIMIT),
        }
    }

    /// Returns the length of the stack in words.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns whether the stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the underlying data of the stack.
    #[inline]
    pub fn data(&self) -> &Vec<U256> {
        &self.data
    }

    /// Removes the topmost element from the stack and returns it, or `StackUnderflow` if it is
    /// empty.
    #[inline]
    pub fn pop(&mut self) -> Result<U256, InstructionResult> {
        self.data.pop().ok_or(InstructionResult::StackUnderflow)
    }

    /// Pops `N` values, topmost first. The stack is left unchanged on underflow.
    #[inline]
    pub fn popn<const N: usize>(&mut self) -> Result<[U256; N], InstructionResult> {
        let len = self.data.len();
        if len < N {
            return Err(InstructionResult::StackUnderflow);
        }
        let mut values = [U256::ZERO; N];
        for (value, popped) in values.iter_mut().zip(self.data.drain(len - N..).rev()) {
            *value = popped;
        }
        Ok(values)
    }

    /// Pops `N` values and returns them with a mutable reference to the value left on top.
    #[inline]
    pub fn popn_top<const N: usize>(
        &mut self,
    ) -> Result<([U256; N], &mut U256), InstructionResult> {
        if self.data.len() <= N {
            return Err(InstructionResult::StackUnderflow);
        }
        let values = self.popn::<N>()?;
        let top = self.top()?;
        Ok((values, top))
    }

    /// Mutable reference to the topmost value.
    #[inline]
    pub fn top(&mut self) -> Result<&mut U256, InstructionResult> {
        self.data.last_mut().ok_or(InstructionResult::StackUnderflow)
    }

    /// Push a new value into the stack. If it will exceed the stack limit,
    /// returns `StackOverflow` error and leaves the stack unchanged.
    #[inline]
    pub fn push_b256(&mut self, value: B256) -> Result<(), InstructionResult> {
        self.push(value.into())
    }

    /// Push a new value onto the stack.
    ///
    /// If it will exceed the stack limit, returns `StackOverflow` error and leaves the stack
    /// unchanged.
    #[inline]
    pub fn push(&mut self, value: U256) -> Result<(), InstructionResult> {
        if self.data.len() == STACK_LIMIT {
            return Err(InstructionResult::StackOverflow);
        }
        self.data.push(value);
        Ok(())
    }

    /// Peek a value at given index for the stack, where the top of
    /// the stack is at index `0`. If the index is too large,
    /// `StackUnderflow` is returned.
    #[inline]
    pub fn peek(&self, no_from_top: usize) -> Result<U256, InstructionResult> {
        if self.data.len() > no_from_top {
            Ok(self.data[self.data.len() - no_from_top - 1])
        } else {
            Err(InstructionResult::StackUnderflow)
        }
    }

    /// Duplicates the `N`th value from the top of the stack.
    #[inline]
    pub fn dup<const N: usize>(&mut self) -> Result<(), InstructionResult> {
        let len = self.data.len();
        if len < N {
            Err(InstructionResult::StackUnderflow)
        } else if len + 1 > STACK_LIMIT {
            Err(InstructionResult::StackOverflow)
        } else {
            self.data.push(self.data[len - N]);
            Ok(())
        }
    }

    /// Swaps the topmost value with the `N`th value from the top.
    #[inline]
    pub fn swap<const N: usize>(&mut self) -> Result<(), InstructionResult> {
        let len = self.data.len();
        if len <= N {
            return Err(InstructionResult::StackUnderflow);
        }
        let last = len - 1;
        self.data.swap(last, last - N);
        Ok(())
    }

    /// Push a big-endian slice of at most 32 bytes onto the stack.
    ///
    /// If it will exceed the stack limit, returns `StackOverflow` error and leaves the stack
    /// unchanged.
    #[inline]
    pub fn push_slice(&mut self, slice: &[u8]) -> Result<(), InstructionResult> {
        let value = U256::try_from_be_slice(slice).ok_or(InstructionResult::StackOverflow)?;
        self.push(value)
    }

    /// Set a value at given index for the stack, where the top of the
    /// stack is at index `0`. If the index is too large,
    /// `StackUnderflow` is returned.
    #[inline]
    pub fn set(&mut self, no_from_top: usize, val: U256) -> Result<(), InstructionResult> {
        if self.data.len() > no_from_top {
            let len = self.data.len();
            self.data[len - no_from_top - 1] = val;
            Ok(())
        } else {
            Err(InstructionResult::StackUnderflow)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popn_order_and_underflow() {
        let mut stack = Stack::new();
        for i in 1..=3u64 {
            stack.push(U256::from(i)).unwrap();
        }
        assert_eq!(stack.popn::<4>(), Err(InstructionResult::StackUnderflow));
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.popn::<2>(), Ok([U256::from(3), U256::from(2)]));
        assert_eq!(stack.top().map(|top| *top), Ok(U256::from(1)));
    }

    #[test]
    fn limit() {
        let mut stack = Stack::new();
        for _ in 0..STACK_LIMIT {
            stack.push(U256::ZERO).unwrap();
        }
        assert_eq!(stack.push(U256::ZERO), Err(InstructionResult::StackOverflow));
        assert_eq!(stack.dup::<1>(), Err(InstructionResult::StackOverflow));
        assert_eq!(stack.len(), STACK_LIMIT);
    }

    #[test]
    fn push_slice() {
        let mut stack = Stack::new();
        stack.push_slice(&[0x01, 0x02]).unwrap();
        stack.push_slice(&[0xff; 32]).unwrap();
        assert_eq!(stack.peek(0), Ok(U256::MAX));
        assert_eq!(stack.peek(1), Ok(U256::from(0x0102)));
        stack.swap::<1>().unwrap();
        assert_eq!(stack.peek(0), Ok(U256::from(0x0102)));
    }
}
