//! Net metered `SSTORE` pricing and refunds.
mod common;

use common::{call_code, db_with_original, petersburg_with_2200, run, TARGET};
use gasvm::{
    primitives::{
        bytes, Address, Bytes, ExecutionOutcome, Halt, OutOfGasError, RuleSet, SpecId, U256,
    },
    Evm,
};
use rstest::rstest;

#[rstest]
#[case(0, "60006000556000600055", 1612, 0)]
#[case(0, "60006000556001600055", 20812, 0)]
#[case(0, "60016000556000600055", 20812, 19200)]
#[case(0, "60016000556002600055", 20812, 0)]
#[case(0, "60016000556001600055", 20812, 0)]
#[case(1, "60006000556000600055", 5812, 15000)]
#[case(1, "60006000556001600055", 5812, 4200)]
#[case(1, "60006000556002600055", 5812, 0)]
#[case(1, "60026000556000600055", 5812, 15000)]
#[case(1, "60026000556003600055", 5812, 0)]
#[case(1, "60026000556001600055", 5812, 4200)]
#[case(1, "60026000556002600055", 5812, 0)]
#[case(1, "60016000556000600055", 5812, 15000)]
#[case(1, "60016000556002600055", 5812, 0)]
#[case(1, "60016000556001600055", 1612, 0)]
#[case(0, "600160005560006000556001600055", 40818, 19200)]
#[case(1, "600060005560016000556000600055", 10818, 19200)]
fn eip2200_vectors(
    #[case] original: u64,
    #[case] code: &str,
    #[case] used: u64,
    #[case] refund: u64,
) {
    let code = Bytes::from(gasvm::primitives::hex::decode(code).unwrap());
    let result = run(
        db_with_original(original),
        petersburg_with_2200(),
        code,
        100_000,
    );

    assert!(result.is_success(), "{:?}", result.outcome);
    assert_eq!(result.gas_used, used);
    assert_eq!(result.refund, refund);
}

#[rstest]
#[case(2306, ExecutionOutcome::Halt(Halt::OutOfGas(OutOfGasError::ReentrancySentry)), 2306)]
#[case(2307, ExecutionOutcome::Success(gasvm::primitives::SuccessReason::Stop), 806)]
fn eip2200_sentry(#[case] gas_limit: u64, #[case] outcome: ExecutionOutcome, #[case] used: u64) {
    let result = run(
        db_with_original(1),
        petersburg_with_2200(),
        bytes!("6001600055"),
        gas_limit,
    );

    assert_eq!(result.outcome, outcome);
    assert_eq!(result.gas_used, used);
    assert_eq!(result.refund, 0);
}

#[test]
fn sentry_leaves_storage_untouched() {
    let mut evm = Evm::new(db_with_original(1), common::env(), petersburg_with_2200());
    let result = evm
        .transact_code(bytes!("6002600055"), Bytes::new(), 2306)
        .unwrap();

    assert!(result.result.is_halt());
    let slot = result.state[&TARGET].storage.get(&U256::ZERO);
    assert!(slot.is_none());
    assert_eq!(evm.db().storage_value(&TARGET, &U256::ZERO), U256::from(1));
}

#[rstest]
#[case(SpecId::ISTANBUL)]
#[case(SpecId::BERLIN)]
#[case(SpecId::LONDON)]
fn restored_slot_costs_like_an_untouched_one(#[case] spec: SpecId) {
    let rules = RuleSet::new(spec);
    let untouched = run(db_with_original(0), rules, bytes!("60006000556000600055"), 100_000);
    let restored = run(db_with_original(0), rules, bytes!("60016000556000600055"), 100_000);

    assert_eq!(
        restored.gas_used - restored.refund,
        untouched.gas_used - untouched.refund
    );
}

#[test]
fn clear_refund_is_granted_once() {
    let rules = RuleSet::new(SpecId::ISTANBUL);
    let once = run(db_with_original(1), rules, bytes!("6000600055"), 100_000);
    let twice = run(db_with_original(1), rules, bytes!("60006000556000600055"), 100_000);

    assert_eq!(once.refund, 15000);
    assert_eq!(twice.refund, 15000);
}

#[test]
fn refund_of_reverted_call_is_dropped() {
    let callee = Address::with_last_byte(0xbb);
    let rules = RuleSet::new(SpecId::ISTANBUL);

    for (code, refund) in [
        // PUSH1 0 PUSH1 0 SSTORE PUSH1 0 PUSH1 0 REVERT
        (bytes!("600060005560006000fd"), 0),
        // PUSH1 0 PUSH1 0 SSTORE STOP
        (bytes!("600060005500"), 15000),
    ] {
        let mut db = common::db_with_original(0);
        db.insert_code(callee, code);
        db.insert_account_storage(callee, U256::ZERO, U256::from(1));

        let result = run(db, rules, call_code(callee), 100_000);
        assert!(result.is_success());
        assert_eq!(result.refund, refund);
    }
}

#[test]
fn legacy_sstore_pricing() {
    let rules = RuleSet::new(SpecId::PETERSBURG);
    // 0 -> 1 -> 0
    let result = run(db_with_original(0), rules, bytes!("60016000556000600055"), 100_000);
    assert_eq!(result.gas_used, 12 + 20000 + 5000);
    assert_eq!(result.refund, 15000);
}

#[test]
fn cold_and_warm_storage_reads() {
    // PUSH1 0 SLOAD PUSH1 0 SLOAD
    let code = bytes!("600054600054");
    let result = run(db_with_original(1), RuleSet::new(SpecId::BERLIN), code, 100_000);
    assert_eq!(result.gas_used, 3 + 2100 + 3 + 100);
}
