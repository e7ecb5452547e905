//! Environment of an execution.
use crate::{Address, B256, MAX_CODE_SIZE, U256};

/// Execution environment: chain configuration, block and transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Env {
    /// Chain configuration.
    pub cfg: CfgEnv,
    /// Block being executed.
    pub block: BlockEnv,
    /// Transaction being executed.
    pub tx: TxEnv,
}

/// Chain configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CfgEnv {
    /// Returned by the `CHAINID` opcode.
    pub chain_id: u64,
    /// If some it will effects EIP-170: Contract code size limit. Useful to increase this because of tests.
    /// By default it is 0x6000 (~25kb).
    pub limit_contract_code_size: Option<usize>,
    /// Report the refund counter as is instead of capping it against the gas spent.
    pub disable_gas_refund_cap: bool,
}

impl CfgEnv {
    /// Maximum size of deployed code.
    #[inline]
    pub fn max_code_size(&self) -> usize {
        self.limit_contract_code_size.unwrap_or(MAX_CODE_SIZE)
    }
}

impl Default for CfgEnv {
    fn default() -> Self {
        Self {
            chain_id: 1,
            limit_contract_code_size: None,
            disable_gas_refund_cap: false,
        }
    }
}

/// Block fields read by the block information opcodes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockEnv {
    /// Block number.
    pub number: U256,
    /// Coinbase or miner or address that created and signed the block.
    pub coinbase: Address,
    /// Block timestamp in seconds.
    pub timestamp: U256,
    /// Block gas limit.
    pub gas_limit: U256,
    /// basefee is added in EIP1559 London upgrade
    pub basefee: U256,
    /// Difficulty is not used after Paris (aka TheMerge). Value is replaced with prevrandao.
    pub difficulty: U256,
    /// Prevrandao is used after Paris (aka TheMerge) instead of the difficulty value.
    pub prevrandao: Option<B256>,
}

impl Default for BlockEnv {
    fn default() -> Self {
        Self {
            number: U256::ZERO,
            coinbase: Address::ZERO,
            timestamp: U256::from(1),
            gas_limit: U256::MAX,
            basefee: U256::ZERO,
            difficulty: U256::ZERO,
            prevrandao: Some(B256::ZERO),
        }
    }
}

/// Transaction fields read by the environment opcodes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxEnv {
    /// Caller or Author or tx signer
    pub caller: Address,
    /// Returned by `ORIGIN`, usually equal to `caller`.
    pub origin: Address,
    /// Returned by `GASPRICE`.
    pub gas_price: U256,
    /// Account whose code runs. `Evm::execute` installs its bytecode here.
    pub transact_to: Address,
    /// Value transferred from `caller` to `transact_to`.
    pub value: U256,
}

impl Default for TxEnv {
    fn default() -> Self {
        let caller = Address::with_last_byte(0x0c);
        Self {
            caller,
            origin: caller,
            gas_price: U256::ZERO,
            transact_to: Address::with_last_byte(0x0a),
            value: U256::ZERO,
        }
    }
}
