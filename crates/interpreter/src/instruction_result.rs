use crate::primitives::{Halt, OutOfGasError, SuccessReason};

/// Outcome of a single instruction or of a whole frame.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstructionResult {
    // success codes
    /// Running, fetch the next instruction.
    #[default]
    Continue = 0x00,
    /// Encountered `STOP`.
    Stop,
    /// Encountered `RETURN`.
    Return,
    /// Encountered `SELFDESTRUCT`.
    SelfDestruct,

    // revert codes
    /// Encountered `REVERT`.
    Revert = 0x10,
    /// Call depth limit exceeded.
    CallTooDeep,
    /// Caller can not pay the transferred value.
    OutOfFund,

    // error codes
    /// Gas pool exhausted.
    OutOfGas = 0x50,
    /// Memory expansion could not be paid.
    MemoryOOG,
    /// SSTORE with 2300 gas or less left, see EIP-2200.
    ReentrancySentryOOG,
    /// A dynamic gas computation or memory offset overflowed `u64`.
    GasUintOverflow,
    /// Opcode is not defined.
    OpcodeNotFound,
    /// Value transferring call in a static context.
    CallNotAllowedInsideStatic,
    /// State mutating opcode in a static context.
    StateChangeDuringStaticCall,
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
    /// Nonce of the creator is at its maximum.
    NonceOverflow,
    /// Deployed code exceeds the EIP-170 limit.
    CreateContractSizeLimit,
    /// Error on created contract that begins with EF
    CreateContractStartingWithEF,
    /// EIP-3860: Limit and meter initcode. Initcode size limit exceeded.
    CreateInitCodeSizeLimit,

    /// Fatal external error. Returned by database.
    FatalExternalError,
}

impl From<SuccessReason> for InstructionResult {
    fn from(value: SuccessReason) -> Self {
        match value {
            SuccessReason::Return => InstructionResult::Return,
            SuccessReason::Stop => InstructionResult::Stop,
            SuccessReason::SelfDestruct => InstructionResult::SelfDestruct,
        }
    }
}

impl From<Halt> for InstructionResult {
    fn from(value: Halt) -> Self {
        match value {
            Halt::OutOfGas(OutOfGasError::Basic) => Self::OutOfGas,
            Halt::OutOfGas(OutOfGasError::Memory) => Self::MemoryOOG,
            Halt::OutOfGas(OutOfGasError::ReentrancySentry) => Self::ReentrancySentryOOG,
            Halt::OutOfGas(OutOfGasError::GasUintOverflow) => Self::GasUintOverflow,
            Halt::OpcodeNotFound => Self::OpcodeNotFound,
            Halt::InvalidFEOpcode => Self::InvalidFEOpcode,
            Halt::InvalidJump => Self::InvalidJump,
            Halt::NotActivated => Self::NotActivated,
            Halt::StackOverflow => Self::StackOverflow,
            Halt::StackUnderflow => Self::StackUnderflow,
            Halt::OutOfOffset => Self::OutOfOffset,
            Halt::CreateCollision => Self::CreateCollision,
            Halt::NonceOverflow => Self::NonceOverflow,
            Halt::CreateContractSizeLimit => Self::CreateContractSizeLimit,
            Halt::CreateContractStartingWithEF => Self::CreateContractStartingWithEF,
            Halt::CreateInitCodeSizeLimit => Self::CreateInitCodeSizeLimit,
            Halt::OverflowPayment => Self::OverflowPayment,
            Halt::StateChangeDuringStaticCall => Self::StateChangeDuringStaticCall,
            Halt::CallNotAllowedInsideStatic => Self::CallNotAllowedInsideStatic,
            Halt::OutOfFund => Self::OutOfFund,
            Halt::CallTooDeep => Self::CallTooDeep,
        }
    }
}

/// Matches the successful [`InstructionResult`]s.
#[macro_export]
macro_rules! return_ok {
    () => {
        $crate::InstructionResult::Continue
            | $crate::InstructionResult::Stop
            | $crate::InstructionResult::Return
            | $crate::InstructionResult::SelfDestruct
    };
}

/// Matches the reverting [`InstructionResult`]s.
#[macro_export]
macro_rules! return_revert {
    () => {
        $crate::InstructionResult::Revert
            | $crate::InstructionResult::CallTooDeep
            | $crate::InstructionResult::OutOfFund
    };
}

/// Matches the failing [`InstructionResult`]s.
#[macro_export]
macro_rules! return_error {
    () => {
        $crate::InstructionResult::OutOfGas
            | $crate::InstructionResult::MemoryOOG
            | $crate::InstructionResult::ReentrancySentryOOG
            | $crate::InstructionResult::GasUintOverflow
            | $crate::InstructionResult::OpcodeNotFound
            | $crate::InstructionResult::CallNotAllowedInsideStatic
            | $crate::InstructionResult::StateChangeDuringStaticCall
            | $crate::InstructionResult::InvalidFEOpcode
            | $crate::InstructionResult::InvalidJump
            | $crate::InstructionResult::NotActivated
            | $crate::InstructionResult::StackUnderflow
            | $crate::InstructionResult::StackOverflow
            | $crate::InstructionResult::OutOfOffset
            | $crate::InstructionResult::CreateCollision
            | $crate::InstructionResult::OverflowPayment
            | $crate::InstructionResult::NonceOverflow
            | $crate::InstructionResult::CreateContractSizeLimit
            | $crate::InstructionResult::CreateContractStartingWithEF
            | $crate::InstructionResult::CreateInitCodeSizeLimit
            | $crate::InstructionResult::FatalExternalError
    };
}

impl InstructionResult {
    /// Returns whether the result is a success.
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, crate::return_ok!())
    }

    /// Returns whether the result is a revert. Unspent gas of a reverted frame is returned.
    #[inline]
    pub const fn is_revert(self) -> bool {
        matches!(self, crate::return_revert!())
    }

    /// Returns whether the result is an error.
    #[inline]
    pub const fn is_error(self) -> bool {
        matches!(self, crate::return_error!())
    }

    /// Returns whether the frame returns its unspent gas to the caller.
    #[inline]
    pub const fn is_ok_or_revert(self) -> bool {
        self.is_ok() || self.is_revert()
    }
}

/// Projection of an [`InstructionResult`] onto the outcome of a transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SuccessOrHalt {
    /// Finished without error.
    Success(SuccessReason),
    /// Reverted, output and unspent gas are kept.
    Revert,
    /// Failed, all gas is consumed.
    Halt(Halt),
    /// The host failed.
    FatalExternalError,
    /// Internal instruction that signals Interpreter should continue running.
    InternalContinue,
}

impl SuccessOrHalt {
    /// Returns true if the transaction returned successfully without halts.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, SuccessOrHalt::Success(_))
    }

    /// Returns the [SuccessReason] value if this a successful result
    #[inline]
    pub fn to_success(self) -> Option<SuccessReason> {
        match self {
            SuccessOrHalt::Success(reason) => Some(reason),
            _ => None,
        }
    }

    /// Returns true if the transaction reverted.
    #[inline]
    pub fn is_revert(self) -> bool {
        matches!(self, SuccessOrHalt::Revert)
    }

    /// Returns true if the EVM has experienced an exceptional halt
    #[inline]
    pub fn is_halt(self) -> bool {
        matches!(self, SuccessOrHalt::Halt(_))
    }

    /// Returns the [Halt] value the EVM has experienced an exceptional halt
    #[inline]
    pub fn to_halt(self) -> Option<Halt> {
        match self {
            SuccessOrHalt::Halt(halt) => Some(halt),
            _ => None,
        }
    }
}

impl From<InstructionResult> for SuccessOrHalt {
    fn from(result: InstructionResult) -> Self {
        match result {
            InstructionResult::Continue => Self::InternalContinue, // used only in interpreter loop
            InstructionResult::Stop => Self::Success(SuccessReason::Stop),
            InstructionResult::Return => Self::Success(SuccessReason::Return),
            InstructionResult::SelfDestruct => Self::Success(SuccessReason::SelfDestruct),
            InstructionResult::Revert => Self::Revert,
            InstructionResult::CallTooDeep => Self::Halt(Halt::CallTooDeep), // not gonna happen for first call
            InstructionResult::OutOfFund => Self::Halt(Halt::OutOfFund),
            InstructionResult::OutOfGas => Self::Halt(Halt::OutOfGas(OutOfGasError::Basic)),
            InstructionResult::MemoryOOG => Self::Halt(Halt::OutOfGas(OutOfGasError::Memory)),
            InstructionResult::ReentrancySentryOOG => {
                Self::Halt(Halt::OutOfGas(OutOfGasError::ReentrancySentry))
            }
            InstructionResult::GasUintOverflow => {
                Self::Halt(Halt::OutOfGas(OutOfGasError::GasUintOverflow))
            }
            InstructionResult::OpcodeNotFound => Self::Halt(Halt::OpcodeNotFound),
            InstructionResult::CallNotAllowedInsideStatic => {
                Self::Halt(Halt::CallNotAllowedInsideStatic)
            }
            InstructionResult::StateChangeDuringStaticCall => {
                Self::Halt(Halt::StateChangeDuringStaticCall)
            }
            InstructionResult::InvalidFEOpcode => Self::Halt(Halt::InvalidFEOpcode),
            InstructionResult::InvalidJump => Self::Halt(Halt::InvalidJump),
            InstructionResult::NotActivated => Self::Halt(Halt::NotActivated),
            InstructionResult::StackUnderflow => Self::Halt(Halt::StackUnderflow),
            InstructionResult::StackOverflow => Self::Halt(Halt::StackOverflow),
            InstructionResult::OutOfOffset => Self::Halt(Halt::OutOfOffset),
            InstructionResult::CreateCollision => Self::Halt(Halt::CreateCollision),
            InstructionResult::OverflowPayment => Self::Halt(Halt::OverflowPayment),
            InstructionResult::NonceOverflow => Self::Halt(Halt::NonceOverflow),
            InstructionResult::CreateContractSizeLimit => Self::Halt(Halt::CreateContractSizeLimit),
            InstructionResult::CreateContractStartingWithEF => {
                Self::Halt(Halt::CreateContractStartingWithEF)
            }
            InstructionResult::CreateInitCodeSizeLimit => Self::Halt(Halt::CreateInitCodeSizeLimit),
            InstructionResult::FatalExternalError => Self::FatalExternalError,
        }
    }
}
