use crate::{
    primitives::{Address, Bytes, U256},
    Gas, InstructionResult,
};

/// Inputs for a call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallInputs {
    /// The account whose code runs.
    pub contract: Address,
    /// The transfer, if any, in this call.
    pub transfer: Transfer,
    /// The call data of the call.
    pub input: Bytes,
    /// The gas limit of the call, stipend included.
    pub gas_limit: u64,
    /// The context of the call.
    pub context: CallContext,
    /// Is static call
    pub is_static: bool,
}

/// Inputs for a create.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateInputs {
    /// Account that creates the contract.
    pub caller: Address,
    /// `CREATE` or `CREATE2` with its salt.
    pub scheme: CreateScheme,
    /// Endowment of the new account.
    pub value: U256,
    /// Code run to produce the deployed code.
    pub init_code: Bytes,
    /// Gas handed to the create frame.
    pub gas_limit: u64,
}

/// Create scheme.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreateScheme {
    /// Legacy create scheme of `CREATE`.
    Create,
    /// Create scheme of `CREATE2`.
    Create2 {
        /// Salt.
        salt: U256,
    },
}

/// Call schemes.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallScheme {
    /// `CALL`
    Call,
    /// `CALLCODE`
    CallCode,
    /// `DELEGATECALL`
    DelegateCall,
    /// `STATICCALL`
    StaticCall,
}

/// CallContext of the runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallContext {
    /// Execution address.
    pub address: Address,
    /// Caller of the EVM.
    pub caller: Address,
    /// The address the contract code was loaded from.
    pub code_address: Address,
    /// Apparent value of the EVM.
    pub apparent_value: U256,
    /// The scheme used for the call.
    pub scheme: CallScheme,
}

impl Default for CallContext {
    fn default() -> Self {
        CallContext {
            address: Address::default(),
            caller: Address::default(),
            code_address: Address::default(),
            apparent_value: U256::default(),
            scheme: CallScheme::Call,
        }
    }
}

/// Transfer from source to target, with given value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transfer {
    /// Source address.
    pub source: Address,
    /// Target address.
    pub target: Address,
    /// Transfer value.
    pub value: U256,
}

/// Result of a finished call frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOutcome {
    /// How the frame ended.
    pub result: InstructionResult,
    /// Gas of the child frame, its remaining gas is returned to the caller on success or revert.
    pub gas: Gas,
    /// Returned or reverted data.
    pub output: Bytes,
}

impl CallOutcome {
    /// Creates a call outcome.
    pub fn new(result: InstructionResult, gas: Gas, output: Bytes) -> Self {
        Self {
            result,
            gas,
            output,
        }
    }
}

/// Result of a finished create frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateOutcome {
    /// How the frame ended.
    pub result: InstructionResult,
    /// Address of the created account, `None` if creation failed.
    pub address: Option<Address>,
    /// Gas of the create frame.
    pub gas: Gas,
    /// Data returned by the init code, the deployed code on success.
    pub output: Bytes,
}

impl CreateOutcome {
    /// Creates a create outcome.
    pub fn new(
        result: InstructionResult,
        address: Option<Address>,
        gas: Gas,
        output: Bytes,
    ) -> Self {
        Self {
            result,
            address,
            gas,
            output,
        }
    }
}
