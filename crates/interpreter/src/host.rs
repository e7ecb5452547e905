use crate::{
    primitives::{Address, Bytes, Env, Log, B256, U256},
    CallInputs, CallOutcome, CreateInputs, CreateOutcome,
};

mod dummy;
pub use dummy::DummyHost;

/// EVM context host.
///
/// Methods returning `Option` return `None` when the underlying database failed. The interpreter
/// then halts with [`InstructionResult::FatalExternalError`] and the host keeps the error.
///
/// [`InstructionResult::FatalExternalError`]: crate::InstructionResult::FatalExternalError
pub trait Host {
    /// Returns a reference to the environment.
    fn env(&self) -> &Env;

    /// Load an account, warming it.
    fn load_account(&mut self, address: Address) -> Option<AccountLoad>;

    /// Get the block hash of the given block `number`.
    fn block_hash(&mut self, number: u64) -> Option<B256>;

    /// Get balance of `address` and if the account is cold.
    fn balance(&mut self, address: Address) -> Option<StateLoad<U256>>;

    /// Get code of `address` and if the account is cold.
    fn code(&mut self, address: Address) -> Option<StateLoad<Bytes>>;

    /// Get code hash of `address` and if the account is cold.
    ///
    /// Zero for accounts that do not exist or are empty.
    fn code_hash(&mut self, address: Address) -> Option<StateLoad<B256>>;

    /// Get storage value of `address` at `index` and if the slot is cold.
    fn sload(&mut self, address: Address, index: U256) -> Option<StateLoad<U256>>;

    /// Set storage value of account address at index.
    ///
    /// Returns the original, present and new value of the slot and if it was cold.
    fn sstore(
        &mut self,
        address: Address,
        index: U256,
        value: U256,
    ) -> Option<StateLoad<SStoreResult>>;

    /// Add to the refund counter of the transaction. The counter is reverted with the journal.
    fn record_refund(&mut self, refund: i64);

    /// Emit a log owned by `address` with given `LogData`.
    fn log(&mut self, log: Log);

    /// Mark `address` to be deleted, with funds transferred to `target`.
    fn selfdestruct(
        &mut self,
        address: Address,
        target: Address,
    ) -> Option<StateLoad<SelfDestructResult>>;

    /// Run a message call in a new frame.
    fn call(&mut self, inputs: &CallInputs) -> CallOutcome;

    /// Run a contract creation in a new frame.
    fn create(&mut self, inputs: &CreateInputs) -> CreateOutcome;
}

/// Value loaded from the state, with its EIP-2929 warmth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateLoad<T> {
    /// Returned data.
    pub data: T,
    /// `true` if the account or slot was not accessed before in this transaction.
    pub is_cold: bool,
}

impl<T> StateLoad<T> {
    /// Returns a new [`StateLoad`] with the given data and cold load status.
    pub const fn new(data: T, is_cold: bool) -> Self {
        Self { data, is_cold }
    }

    /// Maps the data, keeping the cold load status.
    pub fn map<B, F: FnOnce(T) -> B>(self, f: F) -> StateLoad<B> {
        StateLoad::new(f(self.data), self.is_cold)
    }
}

/// Result of loading an account for a call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountLoad {
    /// Is account cold loaded.
    pub is_cold: bool,
    /// Is account empty, if true account is not created.
    pub is_empty: bool,
}

/// Result of a `sstore` of a storage slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SStoreResult {
    /// Value of the storage when it is first read.
    pub original_value: U256,
    /// Current value of the storage.
    pub present_value: U256,
    /// New value that is set.
    pub new_value: U256,
}

impl SStoreResult {
    /// Returns `true` if the new value is equal to the present value.
    #[inline]
    pub fn is_new_eq_present(&self) -> bool {
        self.new_value == self.present_value
    }

    /// Returns `true` if the original value is equal to the present value.
    #[inline]
    pub fn is_original_eq_present(&self) -> bool {
        self.original_value == self.present_value
    }

    /// Returns `true` if the original value is equal to the new value.
    #[inline]
    pub fn is_original_eq_new(&self) -> bool {
        self.original_value == self.new_value
    }

    /// Returns `true` if the original value is zero.
    #[inline]
    pub fn is_original_zero(&self) -> bool {
        self.original_value.is_zero()
    }

    /// Returns `true` if the present value is zero.
    #[inline]
    pub fn is_present_zero(&self) -> bool {
        self.present_value.is_zero()
    }

    /// Returns `true` if the new value is zero.
    #[inline]
    pub fn is_new_zero(&self) -> bool {
        self.new_value.is_zero()
    }
}

/// Result of a selfdestruct action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelfDestructResult {
    /// The destroyed account had a balance.
    pub had_value: bool,
    /// The beneficiary already existed.
    pub target_exists: bool,
    /// The account was destroyed earlier in the transaction.
    pub previously_destroyed: bool,
}
