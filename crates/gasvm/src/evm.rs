use crate::{
    db::{Database, DatabaseCommit},
    interpreter::{
        gas, return_ok, AccountLoad, CallContext, CallInputs, CallOutcome, CallScheme, Contract,
        CreateInputs, CreateOutcome, CreateScheme, Gas, Host, InstructionResult, Interpreter,
        SStoreResult, SelfDestructResult, StateLoad, SuccessOrHalt, Transfer,
    },
    journaled_state::JournaledState,
    primitives::{
        Address, Bytes, Eips, Env, ExecutionOutcome, ExecutionResult, Log, Output, ResultAndState,
        RuleSet, SpecId, State, B256, CALL_STACK_LIMIT, U256,
    },
    transfer::{BalanceTransfer, TransferHooks},
    EVMError,
};
use core::fmt;
use std::{boxed::Box, format};
use tracing::{debug_span, trace, warn};

/// Executes code against a database, acting as the [`Host`] of every frame.
///
/// One transaction runs at a time. The journal (refund counter, storage ledger and warm sets) is
/// reset when a transaction starts and shared by all of its frames.
pub struct Evm<DB: Database> {
    /// Environment of the executions.
    pub env: Env,
    /// Fork rules of the executions.
    pub rules: RuleSet,
    /// State changes of the running transaction.
    pub journaled_state: JournaledState,
    /// Database the state is loaded from.
    pub db: DB,
    hooks: Box<dyn TransferHooks>,
    /// Error raised by the database in the middle of execution.
    error: Option<DB::Error>,
}

impl<DB> fmt::Debug for Evm<DB>
where
    DB: Database + fmt::Debug,
    DB::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evm")
            .field("env", &self.env)
            .field("rules", &self.rules)
            .field("journaled_state", &self.journaled_state)
            .field("db", &self.db)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<DB: Database> Evm<DB> {
    /// Creates a new executor moving value with [`BalanceTransfer`].
    pub fn new(db: DB, env: Env, rules: RuleSet) -> Self {
        Self {
            env,
            rules,
            journaled_state: JournaledState::new(rules.spec_id),
            db,
            hooks: Box::new(BalanceTransfer),
            error: None,
        }
    }

    /// Replaces the value transfer hooks.
    pub fn with_hooks<H: TransferHooks + 'static>(mut self, hooks: H) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Returns the database.
    #[inline]
    pub fn db(&self) -> &DB {
        &self.db
    }

    /// Returns the database mutably.
    #[inline]
    pub fn db_mut(&mut self) -> &mut DB {
        &mut self.db
    }

    /// Consumes the executor, returning its database.
    #[inline]
    pub fn into_db(self) -> DB {
        self.db
    }

    /// Runs `code` in the context of `env.tx.transact_to` and returns the result, dropping the
    /// changed state.
    pub fn execute(
        &mut self,
        code: Bytes,
        input: Bytes,
        gas_limit: u64,
    ) -> Result<ExecutionResult, EVMError<DB::Error>> {
        self.transact_code(code, input, gas_limit)
            .map(|result| result.result)
    }

    /// Runs `code` in the context of `env.tx.transact_to`.
    ///
    /// The code does not have to be deployed, storage and balance are still the ones of the
    /// target account.
    pub fn transact_code(
        &mut self,
        code: Bytes,
        input: Bytes,
        gas_limit: u64,
    ) -> Result<ResultAndState, EVMError<DB::Error>> {
        let target = self.env.tx.transact_to;
        let _span = debug_span!("transact", %target, gas_limit, spec = ?self.rules.spec_id).entered();
        self.prepare(Some(target))?;

        let inputs = self.tx_call_inputs(target, input, gas_limit);
        let outcome = self.call_with_code(&inputs, code);
        self.finish(outcome.result, outcome.gas, Output::Call(outcome.output))
    }

    /// Calls the code deployed at `target`.
    pub fn transact_call(
        &mut self,
        target: Address,
        input: Bytes,
        gas_limit: u64,
    ) -> Result<ResultAndState, EVMError<DB::Error>> {
        let _span = debug_span!("transact", %target, gas_limit, spec = ?self.rules.spec_id).entered();
        self.prepare(Some(target))?;

        let inputs = self.tx_call_inputs(target, input, gas_limit);
        let outcome = self.call_inner(&inputs);
        self.finish(outcome.result, outcome.gas, Output::Call(outcome.output))
    }

    /// Deploys a contract by running `init_code`.
    pub fn transact_create(
        &mut self,
        init_code: Bytes,
        gas_limit: u64,
    ) -> Result<ResultAndState, EVMError<DB::Error>> {
        let _span = debug_span!("transact_create", gas_limit, spec = ?self.rules.spec_id).entered();
        self.prepare(None)?;

        let inputs = CreateInputs {
            caller: self.env.tx.caller,
            scheme: CreateScheme::Create,
            value: self.env.tx.value,
            init_code,
            gas_limit,
        };
        let outcome = self.create_inner(&inputs);
        let address = outcome.address.filter(|_| outcome.result.is_ok());
        self.finish(
            outcome.result,
            outcome.gas,
            Output::Create(outcome.output, address),
        )
    }

    /// Starts a transaction: clears the journal and warms the accounts every transaction touches.
    fn prepare(&mut self, target: Option<Address>) -> Result<(), EVMError<DB::Error>> {
        self.journaled_state = JournaledState::new(self.rules.spec_id);
        self.error = None;

        // EIP-3651: Warm COINBASE
        let coinbase = self
            .rules
            .has(Eips::WARM_COINBASE_3651)
            .then_some(self.env.block.coinbase);
        let warm = [Some(self.env.tx.caller), Some(self.env.tx.origin), target, coinbase];
        for address in warm.into_iter().flatten() {
            self.journaled_state
                .load_account(address, &mut self.db)
                .map_err(EVMError::Database)?;
        }
        Ok(())
    }

    fn tx_call_inputs(&self, target: Address, input: Bytes, gas_limit: u64) -> CallInputs {
        let caller = self.env.tx.caller;
        let value = self.env.tx.value;
        CallInputs {
            contract: target,
            transfer: Transfer {
                source: caller,
                target,
                value,
            },
            input,
            gas_limit,
            context: CallContext {
                address: target,
                caller,
                code_address: target,
                apparent_value: value,
                scheme: CallScheme::Call,
            },
            is_static: false,
        }
    }

    /// Ends a transaction and builds its result.
    fn finish(
        &mut self,
        result: InstructionResult,
        gas: Gas,
        output: Output,
    ) -> Result<ResultAndState, EVMError<DB::Error>> {
        let refund = self.journaled_state.refund;
        let (state, logs) = self.journaled_state.finalize();

        if let Some(error) = self.error.take() {
            warn!(?result, "database error aborted execution");
            return Err(EVMError::Database(error));
        }

        let outcome = match SuccessOrHalt::from(result) {
            SuccessOrHalt::Success(reason) => ExecutionOutcome::Success(reason),
            SuccessOrHalt::Revert => ExecutionOutcome::Revert,
            SuccessOrHalt::Halt(halt) => ExecutionOutcome::Halt(halt),
            SuccessOrHalt::FatalExternalError | SuccessOrHalt::InternalContinue => {
                return Err(EVMError::Custom(format!(
                    "execution ended with unexpected result {result:?}"
                )));
            }
        };
        let output = match outcome {
            ExecutionOutcome::Halt(_) => match output {
                Output::Call(_) => Output::Call(Bytes::new()),
                Output::Create(_, _) => Output::Create(Bytes::new(), None),
            },
            _ => output,
        };
        let refund = if result.is_ok() {
            refund.max(0) as u64
        } else {
            0
        };
        let refund_quotient =
            (!self.env.cfg.disable_gas_refund_cap).then(|| self.rules.max_refund_quotient());

        Ok(ResultAndState {
            result: ExecutionResult {
                outcome,
                output,
                gas_limit: gas.limit(),
                gas_remaining: gas.remaining(),
                gas_used: gas.spent(),
                refund,
                refund_quotient,
                logs,
            },
            state,
        })
    }

    fn call_inner(&mut self, inputs: &CallInputs) -> CallOutcome {
        // Load account and get code. Account is now hot.
        let code = match self.journaled_state.load_code(inputs.contract, &mut self.db) {
            Ok(load) => load.data.info.code.clone().unwrap_or_default(),
            Err(e) => {
                self.error = Some(e);
                return CallOutcome::new(
                    InstructionResult::FatalExternalError,
                    Gas::new(inputs.gas_limit),
                    Bytes::new(),
                );
            }
        };
        self.call_with_code(inputs, code)
    }

    fn call_with_code(&mut self, inputs: &CallInputs, code: Bytes) -> CallOutcome {
        let gas = Gas::new(inputs.gas_limit);
        trace!(
            depth = self.journaled_state.depth(),
            contract = %inputs.contract,
            gas_limit = inputs.gas_limit,
            "call"
        );

        if self.journaled_state.depth() > CALL_STACK_LIMIT {
            return CallOutcome::new(InstructionResult::CallTooDeep, gas, Bytes::new());
        }

        let checkpoint = self.journaled_state.checkpoint();

        let Transfer {
            source,
            target,
            value,
        } = inputs.transfer;
        for address in [source, target] {
            if let Err(e) = self.journaled_state.load_account(address, &mut self.db) {
                self.error = Some(e);
                self.journaled_state.checkpoint_revert(checkpoint);
                return CallOutcome::new(InstructionResult::FatalExternalError, gas, Bytes::new());
            }
        }
        // Touch address. For "EIP-158 State Clear", this will erase empty accounts.
        self.journaled_state.touch(&target);

        if !self
            .hooks
            .can_transfer(&self.journaled_state, &source, value)
        {
            self.journaled_state.checkpoint_revert(checkpoint);
            return CallOutcome::new(InstructionResult::OutOfFund, gas, Bytes::new());
        }
        if let Err(e) = self
            .hooks
            .transfer(&mut self.journaled_state, &source, &target, value)
        {
            self.journaled_state.checkpoint_revert(checkpoint);
            return CallOutcome::new(e, gas, Bytes::new());
        }

        if code.is_empty() {
            self.journaled_state.checkpoint_commit();
            return CallOutcome::new(InstructionResult::Stop, gas, Bytes::new());
        }

        let contract = Contract::new_with_context(inputs.input.clone(), &code, &inputs.context);
        let mut interpreter =
            Interpreter::new(contract, gas.limit(), inputs.is_static, self.rules);
        let result = interpreter.run(self);

        if result.is_ok() {
            self.journaled_state.checkpoint_commit();
        } else {
            self.journaled_state.checkpoint_revert(checkpoint);
        }

        trace!(
            depth = self.journaled_state.depth(),
            ?result,
            gas_remaining = interpreter.gas.remaining(),
            "call end"
        );
        CallOutcome::new(result, interpreter.gas, interpreter.return_value())
    }

    fn create_inner(&mut self, inputs: &CreateInputs) -> CreateOutcome {
        let gas = Gas::new(inputs.gas_limit);
        trace!(
            depth = self.journaled_state.depth(),
            caller = %inputs.caller,
            gas_limit = inputs.gas_limit,
            "create"
        );

        // Check depth of calls
        if self.journaled_state.depth() > CALL_STACK_LIMIT {
            return CreateOutcome::new(InstructionResult::CallTooDeep, None, gas, Bytes::new());
        }

        if let Err(e) = self.journaled_state.load_account(inputs.caller, &mut self.db) {
            self.error = Some(e);
            return CreateOutcome::new(
                InstructionResult::FatalExternalError,
                None,
                gas,
                Bytes::new(),
            );
        }

        // Check balance of caller and value. Do this before increasing nonce
        if !self
            .hooks
            .can_transfer(&self.journaled_state, &inputs.caller, inputs.value)
        {
            return CreateOutcome::new(InstructionResult::OutOfFund, None, gas, Bytes::new());
        }

        // Increase nonce of caller and check if it overflows
        let Some(nonce) = self.journaled_state.inc_nonce(inputs.caller) else {
            return CreateOutcome::new(InstructionResult::NonceOverflow, None, gas, Bytes::new());
        };
        let old_nonce = nonce - 1;

        let created_address = match inputs.scheme {
            CreateScheme::Create => inputs.caller.create(old_nonce),
            CreateScheme::Create2 { salt } => inputs
                .caller
                .create2_from_code(salt.to_be_bytes::<32>(), &inputs.init_code),
        };
        let address = Some(created_address);

        // Load account so that it will be hot
        if let Err(e) = self.journaled_state.load_account(created_address, &mut self.db) {
            self.error = Some(e);
            return CreateOutcome::new(
                InstructionResult::FatalExternalError,
                address,
                gas,
                Bytes::new(),
            );
        }

        // Create contract account and check for collision
        let checkpoint = match self
            .journaled_state
            .create_account_checkpoint(created_address, self.rules.spec_id)
        {
            Ok(checkpoint) => checkpoint,
            Err(e) => return CreateOutcome::new(e, address, gas, Bytes::new()),
        };

        // Transfer value to contract address
        if let Err(e) = self.hooks.transfer(
            &mut self.journaled_state,
            &inputs.caller,
            &created_address,
            inputs.value,
        ) {
            self.journaled_state.checkpoint_revert(checkpoint);
            return CreateOutcome::new(e, address, gas, Bytes::new());
        }

        let contract = Contract::new(
            Bytes::new(),
            &inputs.init_code,
            created_address,
            inputs.caller,
            inputs.value,
        );
        let mut interpreter = Interpreter::new(contract, gas.limit(), false, self.rules);
        let result = interpreter.run(self);

        let outcome = match result {
            return_ok!() => {
                let mut bytes = interpreter.return_value();
                match self.deposit_code(&mut interpreter.gas, &mut bytes) {
                    Ok(()) => {
                        self.journaled_state.checkpoint_commit();
                        self.journaled_state.set_code(created_address, bytes.clone());
                        CreateOutcome::new(result, address, interpreter.gas, bytes)
                    }
                    Err(e) => {
                        self.journaled_state.checkpoint_revert(checkpoint);
                        interpreter.gas.spend_all();
                        CreateOutcome::new(e, address, interpreter.gas, bytes)
                    }
                }
            }
            _ => {
                self.journaled_state.checkpoint_revert(checkpoint);
                CreateOutcome::new(
                    result,
                    address,
                    interpreter.gas,
                    interpreter.return_value(),
                )
            }
        };

        trace!(
            depth = self.journaled_state.depth(),
            result = ?outcome.result,
            address = ?outcome.address,
            "create end"
        );
        outcome
    }

    /// Validates the returned runtime code and charges for storing it.
    fn deposit_code(&self, gas: &mut Gas, bytes: &mut Bytes) -> Result<(), InstructionResult> {
        // EIP-3541: Reject new contract code starting with the 0xEF byte
        if self.rules.has(Eips::REJECT_EF_3541) && bytes.first() == Some(&0xEF) {
            return Err(InstructionResult::CreateContractStartingWithEF);
        }

        // EIP-170: Contract code size limit
        if self.rules.is_enabled_in(SpecId::SPURIOUS_DRAGON)
            && bytes.len() > self.env.cfg.max_code_size()
        {
            return Err(InstructionResult::CreateContractSizeLimit);
        }

        let paid = gas::code_deposit_cost(bytes.len() as u64).is_some_and(|cost| gas.record_cost(cost));
        if !paid {
            // EIP-2 point 3: If contract creation does not have enough gas to pay for the
            // final gas fee for adding the contract code to the state, the contract
            // creation fails (i.e. goes out-of-gas) rather than leaving an empty contract.
            if self.rules.is_enabled_in(SpecId::HOMESTEAD) {
                return Err(InstructionResult::OutOfGas);
            }
            *bytes = Bytes::new();
        }
        Ok(())
    }
}

impl<DB: Database + DatabaseCommit> Evm<DB> {
    /// Writes the state of a finished transaction to the database.
    pub fn commit(&mut self, state: State) {
        self.db.commit(state);
    }
}

impl<DB: Database> Host for Evm<DB> {
    fn env(&self) -> &Env {
        &self.env
    }

    fn load_account(&mut self, address: Address) -> Option<AccountLoad> {
        self.journaled_state
            .load_account_exist(address, &mut self.db)
            .map_err(|e| self.error = Some(e))
            .ok()
    }

    fn block_hash(&mut self, number: u64) -> Option<B256> {
        self.db
            .block_hash(number)
            .map_err(|e| self.error = Some(e))
            .ok()
    }

    fn balance(&mut self, address: Address) -> Option<StateLoad<U256>> {
        self.journaled_state
            .load_account(address, &mut self.db)
            .map(|load| load.map(|account| account.info.balance))
            .map_err(|e| self.error = Some(e))
            .ok()
    }

    fn code(&mut self, address: Address) -> Option<StateLoad<Bytes>> {
        self.journaled_state
            .load_code(address, &mut self.db)
            .map(|load| load.map(|account| account.info.code.clone().unwrap_or_default()))
            .map_err(|e| self.error = Some(e))
            .ok()
    }

    fn code_hash(&mut self, address: Address) -> Option<StateLoad<B256>> {
        self.journaled_state
            .load_account(address, &mut self.db)
            .map(|load| {
                load.map(|account| {
                    if account.is_empty() {
                        B256::ZERO
                    } else {
                        account.info.code_hash
                    }
                })
            })
            .map_err(|e| self.error = Some(e))
            .ok()
    }

    fn sload(&mut self, address: Address, index: U256) -> Option<StateLoad<U256>> {
        // account is always hot. reference on that statement https://eips.ethereum.org/EIPS/eip-2929 see `Note 2:`
        self.journaled_state
            .sload(address, index, &mut self.db)
            .map_err(|e| self.error = Some(e))
            .ok()
    }

    fn sstore(
        &mut self,
        address: Address,
        index: U256,
        value: U256,
    ) -> Option<StateLoad<SStoreResult>> {
        self.journaled_state
            .sstore(address, index, value, &mut self.db)
            .map_err(|e| self.error = Some(e))
            .ok()
    }

    fn record_refund(&mut self, refund: i64) {
        self.journaled_state.record_refund(refund);
    }

    fn log(&mut self, log: Log) {
        self.journaled_state.log(log);
    }

    fn selfdestruct(
        &mut self,
        address: Address,
        target: Address,
    ) -> Option<StateLoad<SelfDestructResult>> {
        self.journaled_state
            .selfdestruct(address, target, &mut self.db)
            .map_err(|e| self.error = Some(e))
            .ok()
    }

    fn call(&mut self, inputs: &CallInputs) -> CallOutcome {
        self.call_inner(inputs)
    }

    fn create(&mut self, inputs: &CreateInputs) -> CreateOutcome {
        self.create_inner(inputs)
    }
}

/// Runs `code` once against `db` and returns the result.
///
/// The code runs in the context of `env.tx.transact_to`. State changes are dropped.
pub fn execute<DB, H>(
    db: DB,
    env: Env,
    rules: RuleSet,
    hooks: H,
    code: Bytes,
    input: Bytes,
    gas_limit: u64,
) -> Result<ExecutionResult, EVMError<DB::Error>>
where
    DB: Database,
    H: TransferHooks + 'static,
{
    Evm::new(db, env, rules)
        .with_hooks(hooks)
        .execute(code, input, gas_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{EmptyDB, InMemoryDB},
        primitives::{bytes, AccountInfo, Halt, OutOfGasError, SuccessReason},
        transfer::NoopTransfer,
    };

    const CALLER: Address = Address::with_last_byte(0xca);
    const TARGET: Address = Address::with_last_byte(0xaa);

    fn env() -> Env {
        let mut env = Env::default();
        env.tx.caller = CALLER;
        env.tx.origin = CALLER;
        env.tx.transact_to = TARGET;
        env
    }

    #[test]
    fn stop_uses_no_gas() {
        let result = execute(
            EmptyDB,
            env(),
            RuleSet::new(SpecId::LATEST),
            NoopTransfer,
            bytes!("00"),
            Bytes::new(),
            100_000,
        )
        .unwrap();
        assert_eq!(result.outcome, ExecutionOutcome::Success(SuccessReason::Stop));
        assert_eq!(result.gas_used, 0);
        assert_eq!(result.gas_remaining, 100_000);
    }

    #[test]
    fn return_data_is_reported() {
        // PUSH1 0x2a PUSH1 0 MSTORE8 PUSH1 1 PUSH1 0 RETURN
        let mut evm = Evm::new(EmptyDB, env(), RuleSet::new(SpecId::LATEST));
        let result = evm
            .execute(bytes!("602a60005360016000f3"), Bytes::new(), 100_000)
            .unwrap();
        assert!(result.is_success());
        assert_eq!(result.output_data(), &bytes!("2a"));
        // 3 + 3 + 3 + 3 memory word + 3 + 3
        assert_eq!(result.gas_used, 18);
    }

    #[test]
    fn halt_consumes_gas_and_drops_output() {
        let mut evm = Evm::new(EmptyDB, env(), RuleSet::new(SpecId::LATEST));
        let result = evm.execute(bytes!("fe"), Bytes::new(), 1_000).unwrap();
        assert_eq!(result.outcome, ExecutionOutcome::Halt(Halt::InvalidFEOpcode));
        assert_eq!(result.gas_used, 1_000);
        assert_eq!(result.gas_remaining, 0);
        assert_eq!(result.output, Output::Call(Bytes::new()));
    }

    #[test]
    fn sstore_on_petersburg_is_legacy_priced() {
        // PUSH1 1 PUSH1 0 SSTORE
        let mut evm = Evm::new(InMemoryDB::new(), env(), RuleSet::new(SpecId::PETERSBURG));
        let result = evm.execute(bytes!("6001600055"), Bytes::new(), 100_000).unwrap();
        assert!(result.is_success());
        assert_eq!(result.gas_used, 20_006);
    }

    #[test]
    fn out_of_gas_discards_refund() {
        let mut db = InMemoryDB::new();
        db.insert_account_storage(TARGET, U256::ZERO, U256::from(1));
        // PUSH1 0 PUSH1 0 SSTORE INVALID
        let mut evm = Evm::new(db, env(), RuleSet::new(SpecId::ISTANBUL));
        let result = evm.execute(bytes!("6000600055fe"), Bytes::new(), 100_000).unwrap();
        assert_eq!(result.outcome, ExecutionOutcome::Halt(Halt::InvalidFEOpcode));
        assert_eq!(result.refund, 0);

        let result = evm.execute(bytes!("6000600055"), Bytes::new(), 100_000).unwrap();
        assert_eq!(result.refund, 15_000);
    }

    #[test]
    fn refund_quotient_follows_rules() {
        let mut evm = Evm::new(EmptyDB, env(), RuleSet::new(SpecId::ISTANBUL));
        let result = evm.execute(bytes!("00"), Bytes::new(), 100).unwrap();
        assert_eq!(result.refund_quotient, Some(2));

        evm.rules = RuleSet::new(SpecId::LONDON);
        let result = evm.execute(bytes!("00"), Bytes::new(), 100).unwrap();
        assert_eq!(result.refund_quotient, Some(5));

        evm.env.cfg.disable_gas_refund_cap = true;
        let result = evm.execute(bytes!("00"), Bytes::new(), 100).unwrap();
        assert_eq!(result.refund_quotient, None);
    }

    #[test]
    fn reentrancy_sentry() {
        let mut evm = Evm::new(InMemoryDB::new(), env(), RuleSet::new(SpecId::ISTANBUL));
        let result = evm.execute(bytes!("6001600055"), Bytes::new(), 2_306).unwrap();
        assert_eq!(
            result.outcome,
            ExecutionOutcome::Halt(Halt::OutOfGas(OutOfGasError::ReentrancySentry))
        );
        assert_eq!(result.gas_used, 2_306);
    }

    #[test]
    fn call_transfers_value_and_commits() {
        let mut db = InMemoryDB::new();
        db.insert_account_info(CALLER, AccountInfo::from_balance(U256::from(10)));
        db.insert_code(TARGET, bytes!("00"));
        let mut env = env();
        env.tx.value = U256::from(3);

        let mut evm = Evm::new(db, env, RuleSet::new(SpecId::LATEST));
        let ResultAndState { result, state } =
            evm.transact_call(TARGET, Bytes::new(), 100_000).unwrap();
        assert!(result.is_success());
        assert_eq!(state[&TARGET].info.balance, U256::from(3));

        evm.commit(state);
        assert_eq!(evm.db().account(&CALLER).unwrap().info.balance, U256::from(7));
    }

    #[test]
    fn call_without_funds_halts() {
        let mut env = env();
        env.tx.value = U256::from(1);
        let mut evm = Evm::new(InMemoryDB::new(), env, RuleSet::new(SpecId::LATEST));
        let result = evm.execute(bytes!("00"), Bytes::new(), 100).unwrap();
        assert_eq!(result.outcome, ExecutionOutcome::Halt(Halt::OutOfFund));
    }

    #[test]
    fn create_deploys_code() {
        // PUSH1 0x00 PUSH1 0 MSTORE8 PUSH1 1 PUSH1 0 RETURN, deploys the single byte code 0x00
        let init_code = bytes!("600060005360016000f3");
        let mut evm = Evm::new(InMemoryDB::new(), env(), RuleSet::new(SpecId::LATEST));
        let ResultAndState { result, state } =
            evm.transact_create(init_code, 100_000).unwrap();

        assert!(result.is_success());
        let address = CALLER.create(0);
        assert_eq!(result.output.address(), Some(&address));
        assert_eq!(state[&address].info.code, Some(bytes!("00")));
        assert_eq!(state[&address].info.nonce, 1);
        assert_eq!(state[&CALLER].info.nonce, 1);
    }

    #[test]
    fn create_rejects_ef_prefix() {
        // PUSH1 0xef PUSH1 0 MSTORE8 PUSH1 1 PUSH1 0 RETURN
        let init_code = bytes!("60ef60005360016000f3");
        let mut evm = Evm::new(InMemoryDB::new(), env(), RuleSet::new(SpecId::LONDON));
        let result = evm.transact_create(init_code.clone(), 100_000).unwrap().result;
        assert_eq!(
            result.outcome,
            ExecutionOutcome::Halt(Halt::CreateContractStartingWithEF)
        );
        assert_eq!(result.gas_used, 100_000);
        assert_eq!(result.gas_remaining, 0);

        evm.rules = RuleSet::new(SpecId::BERLIN);
        let result = evm.transact_create(init_code, 100_000).unwrap().result;
        assert!(result.is_success());
    }

    #[test]
    fn unpaid_code_deposit_consumes_all_gas() {
        // PUSH2 0x6000 PUSH1 0 RETURN, 0x6000 bytes cost far more than the limit to deposit
        let init_code = bytes!("6160006000f3");
        let mut evm = Evm::new(InMemoryDB::new(), env(), RuleSet::new(SpecId::LONDON));
        let result = evm.transact_create(init_code, 100_000).unwrap().result;

        assert_eq!(
            result.outcome,
            ExecutionOutcome::Halt(Halt::OutOfGas(OutOfGasError::Basic))
        );
        assert_eq!(result.gas_used, 100_000);
        assert_eq!(result.refund, 0);
        assert_eq!(result.output.address(), None);
    }

    struct FailingDB;

    impl Database for FailingDB {
        type Error = &'static str;

        fn basic(&mut self, _address: Address) -> Result<Option<AccountInfo>, Self::Error> {
            Ok(None)
        }

        fn code_by_hash(&mut self, _code_hash: B256) -> Result<Bytes, Self::Error> {
            Ok(Bytes::new())
        }

        fn storage(&mut self, _address: Address, _index: U256) -> Result<U256, Self::Error> {
            Err("storage unavailable")
        }

        fn block_hash(&mut self, _number: u64) -> Result<B256, Self::Error> {
            Ok(B256::ZERO)
        }
    }

    #[test]
    fn database_error_aborts_execution() {
        let mut evm = Evm::new(FailingDB, env(), RuleSet::new(SpecId::LATEST));
        // PUSH1 0 SLOAD
        let result = evm.execute(bytes!("600054"), Bytes::new(), 100_000);
        assert_eq!(result, Err(EVMError::Database("storage unavailable")));
    }
}
