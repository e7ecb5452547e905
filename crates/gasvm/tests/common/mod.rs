//! Helpers shared by the integration tests.
#![allow(dead_code)]

use gasvm::{
    primitives::{Address, Bytes, Env, ExecutionResult, RuleSet, SpecId, U256},
    Evm, InMemoryDB,
};

pub(crate) const CALLER: Address = Address::with_last_byte(0xca);
pub(crate) const TARGET: Address = Address::with_last_byte(0xaa);

/// Environment calling [`TARGET`] from [`CALLER`].
pub(crate) fn env() -> Env {
    let mut env = Env::default();
    env.tx.caller = CALLER;
    env.tx.origin = CALLER;
    env.tx.transact_to = TARGET;
    env
}

/// Petersburg with net metered `SSTORE` switched on, the setting the EIP-2200 test vectors use.
pub(crate) fn petersburg_with_2200() -> RuleSet {
    RuleSet::new(SpecId::PETERSBURG)
        .with_extra_eips(&[2200])
        .unwrap()
}

/// Database where slot 0 of [`TARGET`] holds `original`.
pub(crate) fn db_with_original(original: u64) -> InMemoryDB {
    let mut db = InMemoryDB::new();
    db.insert_account_storage(TARGET, U256::ZERO, U256::from(original));
    db
}

/// Runs `code` on [`TARGET`].
pub(crate) fn run(db: InMemoryDB, rules: RuleSet, code: Bytes, gas_limit: u64) -> ExecutionResult {
    Evm::new(db, env(), rules)
        .execute(code, Bytes::new(), gas_limit)
        .unwrap()
}

/// `CALL(0xffff, target, 0, 0, 0, 0, 0)` followed by `STOP`.
pub(crate) fn call_code(target: Address) -> Bytes {
    let mut code = vec![0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x73];
    code.extend_from_slice(target.as_slice());
    code.extend_from_slice(&[0x61, 0xff, 0xff, 0xf1, 0x00]);
    code.into()
}
