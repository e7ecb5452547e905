//! Memory expansion pricing at the size limit.
mod common;

use common::run;
use gasvm::{
    interpreter::{
        gas::{memory_expansion_cost, memory_gas, GasOverflow},
        Gas, InstructionResult,
    },
    primitives::{bytes, ExecutionOutcome, Halt, OutOfGasError, RuleSet, SpecId, MAX_MEMORY_SIZE},
    InMemoryDB,
};
use rstest::rstest;

#[test]
fn largest_memory_is_priced() {
    let mut gas = Gas::new(u64::MAX);
    assert_eq!(
        gas.record_memory_expansion(0, 0x1f_ffff_ffe0),
        Ok(Some(0x1f_ffff_ffe0))
    );
    assert_eq!(gas.spent(), 36028809887088637);
    assert_eq!(MAX_MEMORY_SIZE, 0x1f_ffff_ffe0);
}

#[test]
fn one_byte_past_the_limit_overflows() {
    let mut gas = Gas::new(u64::MAX);
    assert_eq!(
        gas.record_memory_expansion(0, 0x1f_ffff_ffe1),
        Err(InstructionResult::GasUintOverflow)
    );
    assert_eq!(gas.spent(), 0);
    assert_eq!(memory_expansion_cost(0, 0x1f_ffff_ffe1), Err(GasOverflow));
}

#[rstest]
#[case(1)]
#[case(32)]
#[case(33)]
#[case(1024)]
#[case(1 << 20)]
#[case(0x1f_ffff_ffc0)]
fn cost_matches_closed_form(#[case] size: u64) {
    let words = size.div_ceil(32);
    let expected = 3 * words + words * words / 512;
    assert_eq!(memory_gas(words), expected);
    assert_eq!(
        memory_expansion_cost(0, size),
        Ok(Some((words, expected)))
    );
}

#[test]
fn expansion_is_charged_incrementally() {
    let mut gas = Gas::new(u64::MAX);
    gas.record_memory_expansion(0, 32).unwrap();
    assert_eq!(gas.spent(), 3);
    // already covered
    assert_eq!(gas.record_memory_expansion(0, 16), Ok(None));
    gas.record_memory_expansion(32, 32).unwrap();
    assert_eq!(gas.spent(), memory_gas(2));
}

#[test]
fn mstore_past_the_limit_halts() {
    // PUSH1 0 PUSH5 0x1fffffffe1 MSTORE
    let result = run(
        InMemoryDB::new(),
        RuleSet::new(SpecId::LATEST),
        bytes!("6000641fffffffe152"),
        1_000_000,
    );
    assert_eq!(
        result.outcome,
        ExecutionOutcome::Halt(Halt::OutOfGas(OutOfGasError::GasUintOverflow))
    );
    assert_eq!(result.gas_used, 1_000_000);
}

#[test]
fn mstore_without_gas_for_memory_halts() {
    // PUSH1 0 PUSH4 0xffffffff MSTORE
    let result = run(
        InMemoryDB::new(),
        RuleSet::new(SpecId::LATEST),
        bytes!("600063ffffffff52"),
        1_000_000,
    );
    assert_eq!(
        result.outcome,
        ExecutionOutcome::Halt(Halt::OutOfGas(OutOfGasError::Memory))
    );
}
