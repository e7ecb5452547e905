use crate::{primitives::U256, Host, Interpreter};

pub(crate) fn mload<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([], top, interpreter);
    let offset = as_usize_or_fail!(interpreter, *top);
    resize_memory!(interpreter, offset, 32);
    *top = interpreter.memory.get_u256(offset);
}

pub(crate) fn mstore<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([offset, value], interpreter);
    let offset = as_usize_or_fail!(interpreter, offset);
    resize_memory!(interpreter, offset, 32);
    interpreter.memory.set_u256(offset, value);
}

pub(crate) fn mstore8<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([offset, value], interpreter);
    let offset = as_usize_or_fail!(interpreter, offset);
    resize_memory!(interpreter, offset, 1);
    interpreter.memory.set_byte(offset, value.byte(0));
}

pub(crate) fn msize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, U256::from(interpreter.memory.len()));
}

#[cfg(test)]
mod tests {
    use crate::{
        opcode::*,
        primitives::{RuleSet, SpecId, U256},
        Contract, DummyHost, InstructionResult, Interpreter,
    };

    fn run(code: &[u8], gas_limit: u64) -> Interpreter {
        let contract = Contract::new(
            Default::default(),
            code,
            Default::default(),
            Default::default(),
            U256::ZERO,
        );
        let mut interp = Interpreter::new(contract, gas_limit, false, RuleSet::new(SpecId::LATEST));
        interp.run(&mut DummyHost::default());
        interp
    }

    #[test]
    fn mstore_mload_msize() {
        // MSTORE 0xff at 1, MLOAD 1, MSIZE
        let code = [PUSH1, 0xff, PUSH1, 1, MSTORE, PUSH1, 1, MLOAD, MSIZE];
        let interp = run(&code, 1000);
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
        assert_eq!(interp.stack.data(), &vec![U256::from(0xff), U256::from(64)]);
        // two words of memory cost 6
        assert_eq!(interp.gas.spent(), 3 + 3 + 3 + 6 + 3 + 3 + 2);
    }

    #[test]
    fn memory_growth_out_of_gas() {
        // MLOAD at 0xffff needs 2049 words
        let interp = run(&[PUSH2, 0xff, 0xff, MLOAD], 1000);
        assert_eq!(interp.instruction_result, InstructionResult::MemoryOOG);
        assert_eq!(interp.gas.remaining(), 0);
        assert!(interp.memory.is_empty());
    }

    #[test]
    fn offset_above_u64_overflows() {
        let mut code = vec![PUSH9];
        code.extend_from_slice(&[0x01; 9]);
        code.push(MLOAD);
        let interp = run(&code, 1000);
        assert_eq!(interp.instruction_result, InstructionResult::GasUintOverflow);
    }

    #[test]
    fn offset_past_memory_limit_overflows() {
        // 0x2000000000 is past the largest payable memory size
        let code = [PUSH5, 0x20, 0x00, 0x00, 0x00, 0x00, MSTORE8];
        let interp = run(&[&[PUSH0][..], &code[..]].concat(), 1000);
        assert_eq!(interp.instruction_result, InstructionResult::GasUintOverflow);
    }
}
