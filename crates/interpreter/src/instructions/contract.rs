use crate::{
    gas,
    primitives::{Address, Bytes, Eips, SpecId, B256, MAX_INITCODE_SIZE, U256},
    AccountLoad, CallContext, CallInputs, CallScheme, CreateInputs, CreateScheme, Host,
    InstructionResult, Interpreter, Transfer,
};
use core::ops::Range;

pub(crate) fn create<const IS_CREATE2: bool, H: Host + ?Sized>(
    interpreter: &mut Interpreter,
    host: &mut H,
) {
    require_non_staticcall!(interpreter);

    // EIP-1014: Skinny CREATE2
    if IS_CREATE2 {
        check!(interpreter, CONSTANTINOPLE);
    }

    popn!([value, code_offset, len], interpreter);
    let salt = if IS_CREATE2 {
        popn!([salt], interpreter);
        Some(salt)
    } else {
        None
    };

    let len = as_usize_or_fail!(interpreter, len);
    let mut init_code = Bytes::new();
    if len != 0 {
        // EIP-3860: Limit and meter initcode
        if interpreter.rules.has(Eips::INITCODE_3860) {
            if len > MAX_INITCODE_SIZE {
                interpreter.instruction_result = InstructionResult::CreateInitCodeSizeLimit;
                return;
            }
            gas_or_fail!(interpreter, gas::initcode_cost(len as u64));
        }

        let code_offset = as_usize_or_fail!(interpreter, code_offset);
        resize_memory!(interpreter, code_offset, len);
        init_code = Bytes::copy_from_slice(interpreter.memory.slice(code_offset, len));
    }

    let scheme = match salt {
        Some(salt) => {
            gas_or_fail!(interpreter, gas::create2_cost(len as u64));
            CreateScheme::Create2 { salt }
        }
        None => {
            gas!(interpreter, gas::CREATE);
            CreateScheme::Create
        }
    };

    let mut gas_limit = interpreter.gas.remaining();

    // EIP-150: Gas cost changes for IO-heavy operations
    if interpreter.rules.is_enabled_in(SpecId::TANGERINE) {
        gas_limit = gas::all_but_one_64th(gas_limit);
    }
    gas!(interpreter, gas_limit);

    let outcome = host.create(&CreateInputs {
        caller: interpreter.contract.target_address,
        scheme,
        value,
        init_code,
        gas_limit,
    });
    interpreter.insert_create_outcome(outcome);
}

pub(crate) fn call<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn!([local_gas_limit, to, value], interpreter);
    let to = Address::from_word(B256::from(to));
    let has_transfer = !value.is_zero();
    if interpreter.is_static && has_transfer {
        interpreter.instruction_result = InstructionResult::CallNotAllowedInsideStatic;
        return;
    }

    let Some((input, return_range)) = get_memory_input_and_out_ranges(interpreter) else {
        return;
    };

    let Some(account_load) = host.load_account(to) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };
    let Some(gas_limit) = calc_call_gas(interpreter, account_load, has_transfer, local_gas_limit)
    else {
        return;
    };

    let inputs = CallInputs {
        contract: to,
        transfer: Transfer {
            source: interpreter.contract.target_address,
            target: to,
            value,
        },
        input,
        gas_limit,
        context: CallContext {
            address: to,
            caller: interpreter.contract.target_address,
            code_address: to,
            apparent_value: value,
            scheme: CallScheme::Call,
        },
        is_static: interpreter.is_static,
    };
    let outcome = host.call(&inputs);
    interpreter.insert_call_outcome(outcome, return_range);
}

pub(crate) fn call_code<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn!([local_gas_limit, to, value], interpreter);
    let to = Address::from_word(B256::from(to));
    let has_transfer = !value.is_zero();

    let Some((input, return_range)) = get_memory_input_and_out_ranges(interpreter) else {
        return;
    };

    let Some(account_load) = host.load_account(to) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };
    // The value stays with the caller, so no account is created.
    let account_load = AccountLoad {
        is_empty: false,
        ..account_load
    };
    let Some(gas_limit) = calc_call_gas(interpreter, account_load, has_transfer, local_gas_limit)
    else {
        return;
    };

    let target = interpreter.contract.target_address;
    let inputs = CallInputs {
        contract: to,
        transfer: Transfer {
            source: target,
            target,
            value,
        },
        input,
        gas_limit,
        context: CallContext {
            address: target,
            caller: target,
            code_address: to,
            apparent_value: value,
            scheme: CallScheme::CallCode,
        },
        is_static: interpreter.is_static,
    };
    let outcome = host.call(&inputs);
    interpreter.insert_call_outcome(outcome, return_range);
}

/// EIP-7: DELEGATECALL
pub(crate) fn delegate_call<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, HOMESTEAD);
    popn!([local_gas_limit, to], interpreter);
    let to = Address::from_word(B256::from(to));

    let Some((input, return_range)) = get_memory_input_and_out_ranges(interpreter) else {
        return;
    };

    let Some(account_load) = host.load_account(to) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };
    let account_load = AccountLoad {
        is_empty: false,
        ..account_load
    };
    let Some(gas_limit) = calc_call_gas(interpreter, account_load, false, local_gas_limit) else {
        return;
    };

    let target = interpreter.contract.target_address;
    let inputs = CallInputs {
        contract: to,
        transfer: Transfer {
            source: target,
            target,
            value: U256::ZERO,
        },
        input,
        gas_limit,
        context: CallContext {
            address: target,
            caller: interpreter.contract.caller,
            code_address: to,
            apparent_value: interpreter.contract.call_value,
            scheme: CallScheme::DelegateCall,
        },
        is_static: interpreter.is_static,
    };
    let outcome = host.call(&inputs);
    interpreter.insert_call_outcome(outcome, return_range);
}

/// EIP-214: New opcode STATICCALL
pub(crate) fn static_call<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, BYZANTIUM);
    popn!([local_gas_limit, to], interpreter);
    let to = Address::from_word(B256::from(to));

    let Some((input, return_range)) = get_memory_input_and_out_ranges(interpreter) else {
        return;
    };

    let Some(account_load) = host.load_account(to) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };
    let account_load = AccountLoad {
        is_empty: false,
        ..account_load
    };
    let Some(gas_limit) = calc_call_gas(interpreter, account_load, false, local_gas_limit) else {
        return;
    };

    let target = interpreter.contract.target_address;
    let inputs = CallInputs {
        contract: to,
        transfer: Transfer {
            source: target,
            target: to,
            value: U256::ZERO,
        },
        input,
        gas_limit,
        context: CallContext {
            address: to,
            caller: target,
            code_address: to,
            apparent_value: U256::ZERO,
            scheme: CallScheme::StaticCall,
        },
        is_static: true,
    };
    let outcome = host.call(&inputs);
    interpreter.insert_call_outcome(outcome, return_range);
}

/// Pops the input and output memory ranges of a call, charges their expansion and copies the
/// input out of memory.
#[inline]
fn get_memory_input_and_out_ranges(interpreter: &mut Interpreter) -> Option<(Bytes, Range<usize>)> {
    popn!([in_offset, in_len, out_offset, out_len], interpreter, None);

    let in_range = resize_memory_range(interpreter, in_offset, in_len)?;
    let input = Bytes::copy_from_slice(interpreter.memory.slice(in_range.start, in_range.len()));

    let return_range = resize_memory_range(interpreter, out_offset, out_len)?;
    Some((input, return_range))
}

/// Resizes memory to fit `offset..offset + len`. An empty range never touches memory.
#[inline]
fn resize_memory_range(interpreter: &mut Interpreter, offset: U256, len: U256) -> Option<Range<usize>> {
    let len = as_usize_or_fail_ret!(interpreter, len, None);
    if len == 0 {
        return Some(0..0);
    }
    let offset = as_usize_or_fail_ret!(interpreter, offset, None);
    resize_memory!(interpreter, offset, len, None);
    Some(offset..offset + len)
}

/// Charges the call cost and returns the gas limit of the callee, stipend included.
#[inline]
fn calc_call_gas(
    interpreter: &mut Interpreter,
    account_load: AccountLoad,
    has_transfer: bool,
    local_gas_limit: U256,
) -> Option<u64> {
    let call_cost = gas::call_cost(&interpreter.rules, has_transfer, account_load);
    gas!(interpreter, call_cost, None);

    // Before EIP-150 the requested gas had to be available in full.
    let gas_limit = gas::call_gas_limit(
        &interpreter.rules,
        interpreter.gas.remaining(),
        local_gas_limit,
    );
    gas!(interpreter, gas_limit, None);

    if has_transfer {
        Some(gas_limit.saturating_add(gas::CALL_STIPEND))
    } else {
        Some(gas_limit)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        opcode::*,
        primitives::{RuleSet, SpecId, U256},
        Contract, DummyHost, InstructionResult, Interpreter,
    };

    fn run(code: &[u8], gas_limit: u64, spec: SpecId) -> Interpreter {
        let contract = Contract::new(
            Default::default(),
            code,
            Default::default(),
            Default::default(),
            U256::ZERO,
        );
        let mut interp = Interpreter::new(contract, gas_limit, false, RuleSet::new(spec));
        interp.run(&mut DummyHost::default());
        interp
    }

    #[test]
    fn call_returns_unspent_child_gas() {
        // CALL(gas 1000, to 0, value 0, in 0..0, out 0..0)
        let code = [PUSH0, PUSH0, PUSH0, PUSH0, PUSH0, PUSH0, PUSH2, 0x03, 0xe8, CALL];
        let interp = run(&code, 10_000, SpecId::LATEST);
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
        assert_eq!(interp.stack.data(), &vec![U256::from(1)]);
        // the dummy host hands back all gas, only the warm access cost remains
        assert_eq!(interp.gas.spent(), 6 * 2 + 3 + 100);
    }

    #[test]
    fn call_gas_is_capped_after_tangerine() {
        // request far more gas than available
        let code = [
            PUSH1, 0, PUSH1, 0, PUSH1, 0, PUSH1, 0, PUSH1, 0, PUSH1, 0, PUSH4, 0xff, 0xff, 0xff,
            0xff, CALL,
        ];
        let interp = run(&code, 10_000, SpecId::TANGERINE);
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
        assert_eq!(interp.stack.data(), &vec![U256::from(1)]);

        let interp = run(&code, 10_000, SpecId::HOMESTEAD);
        assert_eq!(interp.instruction_result, InstructionResult::OutOfGas);
    }

    #[test]
    fn value_call_in_static_context_fails() {
        let contract = Contract::new(
            Default::default(),
            &[PUSH0, PUSH0, PUSH0, PUSH0, PUSH1, 1, PUSH0, PUSH0, CALL],
            Default::default(),
            Default::default(),
            U256::ZERO,
        );
        let mut interp = Interpreter::new(contract, 100_000, true, RuleSet::new(SpecId::LATEST));
        interp.run(&mut DummyHost::default());
        assert_eq!(
            interp.instruction_result,
            InstructionResult::CallNotAllowedInsideStatic
        );
    }

    #[test]
    fn failed_create_pushes_zero() {
        let code = [PUSH0, PUSH0, PUSH0, CREATE];
        let interp = run(&code, 100_000, SpecId::LATEST);
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
        assert_eq!(interp.stack.data(), &vec![U256::ZERO]);
        // the reverted child hands back its gas
        assert_eq!(interp.gas.spent(), 3 * 2 + 32_000);
    }

    #[test]
    fn create2_needs_constantinople() {
        let code = [PUSH1, 0, PUSH1, 0, PUSH1, 0, PUSH1, 0, CREATE2];
        let interp = run(&code, 100_000, SpecId::BYZANTIUM);
        assert_eq!(interp.instruction_result, InstructionResult::NotActivated);
    }
}
