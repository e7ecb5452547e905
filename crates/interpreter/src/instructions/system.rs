use crate::{
    gas,
    primitives::{B256, KECCAK_EMPTY, U256},
    Host, InstructionResult, Interpreter,
};

pub(crate) fn keccak256<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([offset], top, interpreter);
    let len = as_usize_or_fail!(interpreter, *top);
    gas_or_fail!(interpreter, gas::keccak256_cost(len as u64));
    let hash = if len == 0 {
        KECCAK_EMPTY
    } else {
        let from = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, from, len);
        crate::primitives::keccak256(interpreter.memory.slice(from, len))
    };
    *top = hash.into();
}

pub(crate) fn address<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push_b256!(interpreter, interpreter.contract.target_address.into_word());
}

pub(crate) fn caller<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push_b256!(interpreter, interpreter.contract.caller.into_word());
}

pub(crate) fn callvalue<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, interpreter.contract.call_value);
}

pub(crate) fn codesize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, U256::from(interpreter.contract.bytecode.len()));
}

pub(crate) fn codecopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([memory_offset, code_offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::copy_cost_verylow(len as u64));
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let code_offset = as_usize_saturated!(code_offset);
    resize_memory!(interpreter, memory_offset, len);

    let code = interpreter.contract.bytecode.original_bytes();
    interpreter
        .memory
        .set_data(memory_offset, code_offset, len, &code);
}

pub(crate) fn calldataload<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([], top, interpreter);
    let offset = as_usize_saturated!(*top);
    let input = &interpreter.contract.input;
    let mut word = B256::ZERO;
    if offset < input.len() {
        let count = 32usize.min(input.len() - offset);
        word[..count].copy_from_slice(&input[offset..offset + count]);
    }
    *top = word.into();
}

pub(crate) fn calldatasize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, U256::from(interpreter.contract.input.len()));
}

pub(crate) fn calldatacopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([memory_offset, data_offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::copy_cost_verylow(len as u64));
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let data_offset = as_usize_saturated!(data_offset);
    resize_memory!(interpreter, memory_offset, len);

    interpreter.memory.set_data(
        memory_offset,
        data_offset,
        len,
        &interpreter.contract.input,
    );
}

/// EIP-211: New opcodes: RETURNDATASIZE and RETURNDATACOPY
pub(crate) fn returndatasize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, BYZANTIUM);
    push!(
        interpreter,
        U256::from(interpreter.return_data_buffer.len())
    );
}

/// EIP-211: New opcodes: RETURNDATASIZE and RETURNDATACOPY
pub(crate) fn returndatacopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, BYZANTIUM);
    popn!([memory_offset, offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::copy_cost_verylow(len as u64));

    // Reading past the return data is an error, unlike calldata and code.
    let data_offset = as_usize_saturated!(offset);
    let data_end = data_offset.saturating_add(len);
    if data_end > interpreter.return_data_buffer.len() {
        interpreter.instruction_result = InstructionResult::OutOfOffset;
        return;
    }

    if len != 0 {
        let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
        resize_memory!(interpreter, memory_offset, len);
        interpreter.memory.set(
            memory_offset,
            &interpreter.return_data_buffer[data_offset..data_end],
        );
    }
}

pub(crate) fn gas<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, U256::from(interpreter.gas.remaining()));
}

#[cfg(test)]
mod tests {
    use crate::{
        opcode::*,
        primitives::{keccak256, Bytes, RuleSet, SpecId, KECCAK_EMPTY, U256},
        Contract, DummyHost, InstructionResult, Interpreter,
    };

    fn run_with_input(code: &[u8], input: &[u8]) -> Interpreter {
        let contract = Contract::new(
            Bytes::copy_from_slice(input),
            code,
            Default::default(),
            Default::default(),
            U256::ZERO,
        );
        let mut interp = Interpreter::new(contract, 10_000, false, RuleSet::new(SpecId::LATEST));
        interp.run(&mut DummyHost::default());
        interp
    }

    #[test]
    fn keccak_of_empty_and_word() {
        // KECCAK256(0, 0), then KECCAK256(0, 32) of zeroed memory
        let code = [PUSH0, PUSH0, KECCAK256, PUSH1, 32, PUSH0, KECCAK256];
        let interp = run_with_input(&code, &[]);
        assert_eq!(
            interp.stack.data(),
            &vec![
                U256::from_be_bytes(KECCAK_EMPTY.0),
                U256::from_be_bytes(keccak256([0u8; 32]).0)
            ]
        );
        // 30 + 30 + 6 per word + 3 memory
        assert_eq!(interp.gas.spent(), 2 + 2 + 30 + 3 + 2 + 30 + 6 + 3);
    }

    #[test]
    fn calldata_is_zero_padded() {
        let code = [PUSH1, 1, CALLDATALOAD, CALLDATASIZE];
        let interp = run_with_input(&code, &[0xaa, 0xbb, 0xcc]);
        let mut expected = [0u8; 32];
        expected[..2].copy_from_slice(&[0xbb, 0xcc]);
        assert_eq!(
            interp.stack.data(),
            &vec![U256::from_be_bytes(expected), U256::from(3)]
        );
    }

    #[test]
    fn codecopy_copies_original_code() {
        // CODECOPY(0, 0, 6), MLOAD 0
        let code = [PUSH1, 6, PUSH0, PUSH0, CODECOPY, PUSH0, MLOAD];
        let interp = run_with_input(&code, &[]);
        let mut expected = [0u8; 32];
        expected[..6].copy_from_slice(&code[..6]);
        assert_eq!(interp.stack.data(), &vec![U256::from_be_bytes(expected)]);
    }

    #[test]
    fn returndatacopy_out_of_bounds() {
        let code = [PUSH1, 1, PUSH0, PUSH0, RETURNDATACOPY];
        let interp = run_with_input(&code, &[]);
        assert_eq!(interp.instruction_result, InstructionResult::OutOfOffset);
    }

    #[test]
    fn gas_reports_remaining_after_charge() {
        let interp = run_with_input(&[GAS], &[]);
        assert_eq!(interp.stack.data(), &vec![U256::from(10_000 - 2)]);
    }
}
