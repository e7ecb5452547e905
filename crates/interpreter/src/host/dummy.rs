use crate::{
    primitives::{Address, Bytes, Env, HashMap, HashSet, Log, B256, KECCAK_EMPTY, U256},
    AccountLoad, CallInputs, CallOutcome, CreateInputs, CreateOutcome, Gas, Host,
    InstructionResult, SStoreResult, SelfDestructResult, StateLoad,
};
use std::vec::Vec;

/// A dummy [Host] implementation.
///
/// Storage belongs to a single account, calls succeed without running code and creations revert.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DummyHost {
    /// Environment returned by [`Host::env`].
    pub env: Env,
    /// Present value of each slot.
    pub storage: HashMap<U256, U256>,
    /// Value of each slot before its first write.
    pub original: HashMap<U256, U256>,
    /// Refund counter.
    pub refund: i64,
    /// Emitted logs.
    pub log: Vec<Log>,
    /// Accounts that ran `SELFDESTRUCT`.
    pub destroyed: HashSet<Address>,
}

impl DummyHost {
    /// Create a new dummy host with the given [`Env`].
    #[inline]
    pub fn new(env: Env) -> Self {
        Self {
            env,
            ..Default::default()
        }
    }

    /// Clears the storage and logs of the dummy host.
    #[inline]
    pub fn clear(&mut self) {
        self.storage.clear();
        self.original.clear();
        self.refund = 0;
        self.log.clear();
    }
}

impl Host for DummyHost {
    #[inline]
    fn env(&self) -> &Env {
        &self.env
    }

    #[inline]
    fn load_account(&mut self, _address: Address) -> Option<AccountLoad> {
        Some(AccountLoad {
            is_cold: false,
            is_empty: false,
        })
    }

    #[inline]
    fn block_hash(&mut self, _number: u64) -> Option<B256> {
        Some(B256::ZERO)
    }

    #[inline]
    fn balance(&mut self, _address: Address) -> Option<StateLoad<U256>> {
        Some(StateLoad::new(U256::ZERO, false))
    }

    #[inline]
    fn code(&mut self, _address: Address) -> Option<StateLoad<Bytes>> {
        Some(StateLoad::new(Bytes::new(), false))
    }

    #[inline]
    fn code_hash(&mut self, _address: Address) -> Option<StateLoad<B256>> {
        Some(StateLoad::new(KECCAK_EMPTY, false))
    }

    #[inline]
    fn sload(&mut self, _address: Address, index: U256) -> Option<StateLoad<U256>> {
        let is_cold = !self.storage.contains_key(&index);
        let value = *self.storage.entry(index).or_default();
        Some(StateLoad::new(value, is_cold))
    }

    #[inline]
    fn sstore(
        &mut self,
        _address: Address,
        index: U256,
        value: U256,
    ) -> Option<StateLoad<SStoreResult>> {
        let is_cold = !self.storage.contains_key(&index);
        let present_value = self.storage.insert(index, value).unwrap_or_default();
        let original_value = *self.original.entry(index).or_insert(present_value);
        Some(StateLoad::new(
            SStoreResult {
                original_value,
                present_value,
                new_value: value,
            },
            is_cold,
        ))
    }

    #[inline]
    fn record_refund(&mut self, refund: i64) {
        self.refund += refund;
    }

    #[inline]
    fn log(&mut self, log: Log) {
        self.log.push(log)
    }

    #[inline]
    fn selfdestruct(
        &mut self,
        address: Address,
        _target: Address,
    ) -> Option<StateLoad<SelfDestructResult>> {
        let previously_destroyed = !self.destroyed.insert(address);
        Some(StateLoad::new(
            SelfDestructResult {
                had_value: false,
                target_exists: true,
                previously_destroyed,
            },
            false,
        ))
    }

    #[inline]
    fn call(&mut self, inputs: &CallInputs) -> CallOutcome {
        CallOutcome::new(
            InstructionResult::Stop,
            Gas::new(inputs.gas_limit),
            Bytes::new(),
        )
    }

    #[inline]
    fn create(&mut self, inputs: &CreateInputs) -> CreateOutcome {
        CreateOutcome::new(
            InstructionResult::Revert,
            None,
            Gas::new(inputs.gas_limit),
            Bytes::new(),
        )
    }
}
