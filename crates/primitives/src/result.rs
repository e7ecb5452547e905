//! Results of an execution.
use crate::{Address, Bytes, Log, State};
use core::cmp::min;
use std::vec::Vec;

/// Result of a transaction and the state it changed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultAndState {
    /// Status of execution
    pub result: ExecutionResult,
    /// State that got updated
    pub state: State,
}

/// Result of a top level execution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionResult {
    /// How execution ended.
    pub outcome: ExecutionOutcome,
    /// Return or revert data, empty on halt.
    pub output: Output,
    /// Gas given to the outermost frame.
    pub gas_limit: u64,
    /// Gas left when the outermost frame ended.
    pub gas_remaining: u64,
    /// `gas_limit - gas_remaining`, before any refund is applied.
    pub gas_used: u64,
    /// Refund counter at the end of execution, zero if the outermost frame failed.
    pub refund: u64,
    /// Divisor of `gas_used` bounding the refund, `None` if the cap is disabled.
    pub refund_quotient: Option<u64>,
    /// Logs emitted by successful frames.
    pub logs: Vec<Log>,
}

impl ExecutionResult {
    /// Returns `true` if execution finished without revert or halt.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ExecutionOutcome::Success(_))
    }

    /// Returns `true` if execution halted.
    pub fn is_halt(&self) -> bool {
        matches!(self.outcome, ExecutionOutcome::Halt(_))
    }

    /// Refund that is actually paid back: at most `gas_used / refund_quotient`.
    pub fn capped_refund(&self) -> u64 {
        match self.refund_quotient {
            Some(quotient) => min(self.refund, self.gas_used / quotient),
            None => self.refund,
        }
    }

    /// Gas paid after the refund.
    pub fn gas_spent(&self) -> u64 {
        self.gas_used - self.capped_refund()
    }

    /// Output bytes, regardless of the kind of execution.
    pub fn output_data(&self) -> &Bytes {
        self.output.data()
    }
}

/// Terminal state of the outermost frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionOutcome {
    /// Finished by `STOP`, `RETURN` or `SELFDESTRUCT`.
    Success(SuccessReason),
    /// Raised by the `REVERT` opcode, unspent gas is returned.
    Revert,
    /// Exceptional halt, all gas is consumed.
    Halt(Halt),
}

/// Output data of an execution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Output {
    /// Data returned by a call.
    Call(Bytes),
    /// Data returned by init code and the created address.
    Create(Bytes, Option<Address>),
}

impl Output {
    /// Returns the output data of the execution output.
    pub fn data(&self) -> &Bytes {
        match self {
            Output::Call(data) => data,
            Output::Create(data, _) => data,
        }
    }

    /// Returns the created address, if any.
    pub fn address(&self) -> Option<&Address> {
        match self {
            Output::Call(_) => None,
            Output::Create(_, address) => address.as_ref(),
        }
    }
}

/// When execution returns successfully without halts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SuccessReason {
    /// Finished by `STOP`.
    Stop,
    /// Finished by `RETURN`.
    Return,
    /// Finished by `SELFDESTRUCT`.
    SelfDestruct,
}

/// Indicates that the EVM has experienced an exceptional halt. This causes execution to
/// immediately end with all gas being consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Halt {
    /// Gas pool exhausted.
    OutOfGas(OutOfGasError),
    /// Opcode is not defined.
    OpcodeNotFound,
    /// Encountered `INVALID` (0xFE).
    InvalidFEOpcode,
    /// Jump target is not a `JUMPDEST`.
    InvalidJump,
    /// Opcode is not active in the current rule set.
    NotActivated,
    /// Not enough stack items.
    StackUnderflow,
    /// Stack exceeds 1024 items.
    StackOverflow,
    /// Read past the end of the return data.
    OutOfOffset,
    /// Created address already holds code or a nonce.
    CreateCollision,
    /// Balance overflowed during a transfer.
    OverflowPayment,
    /// State mutating opcode in a static context.
    StateChangeDuringStaticCall,
    /// Value transferring call in a static context.
    CallNotAllowedInsideStatic,
    /// Caller can not pay the transferred value.
    OutOfFund,
    /// Call depth limit exceeded.
    CallTooDeep,
    /// Nonce of the creator is at its maximum.
    NonceOverflow,
    /// Deployed code exceeds the EIP-170 limit.
    CreateContractSizeLimit,
    /// Error on created contract that begins with EF
    CreateContractStartingWithEF,
    /// EIP-3860: init code exceeds the limit.
    CreateInitCodeSizeLimit,
}

/// Kind of out of gas halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutOfGasError {
    /// Basic OOG error
    Basic,
    /// Tried to expand past the memory limit, or the expansion was too expensive.
    Memory,
    /// SSTORE called with 2300 gas or less left, see EIP-2200.
    ReentrancySentry,
    /// A dynamic gas computation overflowed `u64`.
    GasUintOverflow,
}
