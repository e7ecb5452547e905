use super::analysis::AnalyzedBytecode;
use crate::{
    primitives::{Address, Bytes, U256},
    CallContext,
};

/// Code and call parameters of the running frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contract {
    /// Contracts data
    pub input: Bytes,
    /// Padded bytecode with its jump table.
    pub bytecode: AnalyzedBytecode,
    /// Account whose storage and balance the code acts on.
    pub target_address: Address,
    /// Caller of the EVM.
    pub caller: Address,
    /// Value send to contract.
    pub call_value: U256,
}

impl Contract {
    /// Analyzes `code` and creates the contract of a frame.
    pub fn new(
        input: Bytes,
        code: &[u8],
        target_address: Address,
        caller: Address,
        call_value: U256,
    ) -> Self {
        Self {
            input,
            bytecode: AnalyzedBytecode::new(code),
            target_address,
            caller,
            call_value,
        }
    }

    /// Creates the contract of a call frame.
    pub fn new_with_context(input: Bytes, code: &[u8], call_context: &CallContext) -> Self {
        Self::new(
            input,
            code,
            call_context.address,
            call_context.caller,
            call_context.apparent_value,
        )
    }

    /// Returns `true` if `position` is a `JUMPDEST` outside of push data.
    #[inline]
    pub fn is_valid_jump(&self, position: usize) -> bool {
        self.bytecode.jump_table().is_valid(position)
    }
}
