use crate::{
    gas,
    primitives::{Address, Bytes, Eips, Log, LogData, B256, BLOCK_HASH_HISTORY, U256},
    Host, InstructionResult, Interpreter,
};
use std::vec::Vec;

/// Fails the instruction with `FatalExternalError` when the host could not load state.
macro_rules! host_load {
    ($interp:expr, $load:expr) => {
        match $load {
            Some(value) => value,
            None => {
                $interp.instruction_result = InstructionResult::FatalExternalError;
                return;
            }
        }
    };
}

#[inline]
fn word_to_address(word: U256) -> Address {
    Address::from_word(B256::from(word))
}

pub(crate) fn balance<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], top, interpreter);
    let balance = host_load!(interpreter, host.balance(word_to_address(*top)));
    gas!(
        interpreter,
        gas::balance_cost(&interpreter.rules, balance.is_cold)
    );
    *top = balance.data;
}

/// EIP-1884: Repricing for trie-size-dependent opcodes
pub(crate) fn selfbalance<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check_eip!(interpreter, SLOAD_1884);
    let balance = host_load!(
        interpreter,
        host.balance(interpreter.contract.target_address)
    );
    push!(interpreter, balance.data);
}

pub(crate) fn extcodesize<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], top, interpreter);
    let code = host_load!(interpreter, host.code(word_to_address(*top)));
    gas!(
        interpreter,
        gas::extcodesize_cost(&interpreter.rules, code.is_cold)
    );
    *top = U256::from(code.data.len());
}

/// EIP-1052: EXTCODEHASH opcode
pub(crate) fn extcodehash<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, CONSTANTINOPLE);
    popn_top!([], top, interpreter);
    let code_hash = host_load!(interpreter, host.code_hash(word_to_address(*top)));
    gas!(
        interpreter,
        gas::extcodehash_cost(&interpreter.rules, code_hash.is_cold)
    );
    *top = code_hash.data.into();
}

pub(crate) fn extcodecopy<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn!([address, memory_offset, code_offset, len], interpreter);
    let code = host_load!(interpreter, host.code(word_to_address(address)));

    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(
        interpreter,
        gas::extcodecopy_cost(&interpreter.rules, len as u64, code.is_cold)
    );
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let code_offset = as_usize_saturated!(code_offset);
    resize_memory!(interpreter, memory_offset, len);

    interpreter
        .memory
        .set_data(memory_offset, code_offset, len, &code.data);
}

pub(crate) fn blockhash<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], number, interpreter);

    let requested = as_u64_saturated!(*number);
    let current = as_u64_saturated!(host.env().block.number);
    *number = match current.checked_sub(requested) {
        Some(diff) if diff != 0 && diff <= BLOCK_HASH_HISTORY => {
            host_load!(interpreter, host.block_hash(requested)).into()
        }
        _ => U256::ZERO,
    };
}

pub(crate) fn sload<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], index, interpreter);
    let value = host_load!(
        interpreter,
        host.sload(interpreter.contract.target_address, *index)
    );
    gas!(
        interpreter,
        gas::sload_cost(&interpreter.rules, value.is_cold)
    );
    *index = value.data;
}

/// Storage write with net gas metering where the rule set enables it.
///
/// The write happens before its cost is charged. If the charge fails the frame halts and its
/// checkpoint reverts the write together with the refund.
pub(crate) fn sstore<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    require_non_staticcall!(interpreter);
    popn!([index, value], interpreter);

    // EIP-2200: Structured Definitions for Net Gas Metering
    if interpreter.rules.has_sstore_sentry() && interpreter.gas.remaining() <= gas::SSTORE_SENTRY {
        interpreter.instruction_result = InstructionResult::ReentrancySentryOOG;
        return;
    }

    let state_load = host_load!(
        interpreter,
        host.sstore(interpreter.contract.target_address, index, value)
    );
    gas!(
        interpreter,
        gas::sstore_cost(&interpreter.rules, &state_load.data, state_load.is_cold)
    );
    host.record_refund(gas::sstore_refund(&interpreter.rules, &state_load.data));
}

pub(crate) fn log<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    require_non_staticcall!(interpreter);

    popn!([offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::log_cost(N as u8, len as u64));
    let data = if len == 0 {
        Bytes::new()
    } else {
        let offset = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, offset, len);
        Bytes::copy_from_slice(interpreter.memory.slice(offset, len))
    };

    let Ok(topics) = interpreter.stack.popn::<N>() else {
        interpreter.instruction_result = InstructionResult::StackUnderflow;
        return;
    };
    let topics: Vec<B256> = topics.into_iter().map(B256::from).collect();

    host.log(Log {
        address: interpreter.contract.target_address,
        data: LogData::new_unchecked(topics, data),
    });
}

pub(crate) fn selfdestruct<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    require_non_staticcall!(interpreter);
    popn!([target], interpreter);

    let res = host_load!(
        interpreter,
        host.selfdestruct(interpreter.contract.target_address, word_to_address(target))
    );

    // EIP-3529: Reduction in refunds
    if !interpreter.rules.has(Eips::REFUND_REDUCTION_3529) && !res.data.previously_destroyed {
        host.record_refund(gas::SELFDESTRUCT);
    }
    gas!(interpreter, gas::selfdestruct_cost(&interpreter.rules, res));

    interpreter.instruction_result = InstructionResult::SelfDestruct;
}

#[cfg(test)]
mod tests {
    use crate::{
        opcode::*,
        primitives::{RuleSet, SpecId, B256, U256},
        Contract, DummyHost, InstructionResult, Interpreter,
    };

    fn run(code: &[u8], gas_limit: u64, rules: RuleSet, host: &mut DummyHost) -> Interpreter {
        let contract = Contract::new(
            Default::default(),
            code,
            Default::default(),
            Default::default(),
            U256::ZERO,
        );
        let mut interp = Interpreter::new(contract, gas_limit, false, rules);
        interp.run(host);
        interp
    }

    #[test]
    fn sstore_sentry_leaves_storage_untouched() {
        let rules = RuleSet::new(SpecId::ISTANBUL);
        let mut host = DummyHost::default();
        // two PUSH1 leave exactly the sentry amount
        let interp = run(&[PUSH1, 1, PUSH1, 0, SSTORE], 2306, rules, &mut host);
        assert_eq!(
            interp.instruction_result,
            InstructionResult::ReentrancySentryOOG
        );
        assert_eq!(interp.gas.remaining(), 0);
        assert!(host.storage.is_empty());
        assert_eq!(host.refund, 0);
    }

    #[test]
    fn sstore_without_sentry_before_istanbul() {
        let rules = RuleSet::new(SpecId::PETERSBURG);
        let mut host = DummyHost::default();
        host.storage.insert(U256::ZERO, U256::from(1));
        // reset to the same value costs 5000 on Petersburg
        let interp = run(&[PUSH1, 1, PUSH1, 0, SSTORE], 10_000, rules, &mut host);
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
        assert_eq!(interp.gas.spent(), 3 + 3 + 5000);
    }

    #[test]
    fn sload_warm_and_cold() {
        let rules = RuleSet::new(SpecId::BERLIN);
        let mut host = DummyHost::default();
        let code = [PUSH1, 0, SLOAD, PUSH1, 0, SLOAD];
        let interp = run(&code, 10_000, rules, &mut host);
        assert_eq!(interp.gas.spent(), 3 + 2100 + 3 + 100);
    }

    #[test]
    fn sstore_in_static_call_fails() {
        let contract = Contract::new(
            Default::default(),
            &[PUSH1, 1, PUSH0, SSTORE],
            Default::default(),
            Default::default(),
            U256::ZERO,
        );
        let mut interp = Interpreter::new(contract, 10_000, true, RuleSet::new(SpecId::LATEST));
        interp.run(&mut DummyHost::default());
        assert_eq!(
            interp.instruction_result,
            InstructionResult::StateChangeDuringStaticCall
        );
    }

    #[test]
    fn log_topics_and_data() {
        let rules = RuleSet::new(SpecId::LATEST);
        let mut host = DummyHost::default();
        // MSTORE8 0xaa at 0, LOG1(0, 1, topic 7)
        let code = [PUSH1, 0xaa, PUSH0, MSTORE8, PUSH1, 7, PUSH1, 1, PUSH0, LOG1];
        let interp = run(&code, 10_000, rules, &mut host);
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
        assert_eq!(host.log.len(), 1);
        let log = &host.log[0];
        assert_eq!(log.topics(), &[B256::from(U256::from(7))]);
        assert_eq!(log.data.data.as_ref(), &[0xaa]);
        // LOG1 with one byte: 375 + 375 + 8
        assert_eq!(interp.gas.spent(), 3 + 2 + 6 + 3 + 3 + 2 + 758);
    }

    #[test]
    fn selfdestruct_refund_before_london() {
        let mut host = DummyHost::default();
        run(&[PUSH1, 0, SELFDESTRUCT], 10_000, RuleSet::new(SpecId::BERLIN), &mut host);
        assert_eq!(host.refund, 24_000);

        let mut host = DummyHost::default();
        let interp = run(&[PUSH1, 0, SELFDESTRUCT], 10_000, RuleSet::new(SpecId::LONDON), &mut host);
        assert_eq!(host.refund, 0);
        assert_eq!(interp.instruction_result, InstructionResult::SelfDestruct);
        assert_eq!(interp.gas.spent(), 3 + 5000);
    }
}
