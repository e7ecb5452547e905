use crate::{primitives::U256, Host, InstructionResult, Interpreter};

pub(crate) fn jump<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([target], interpreter);
    jump_inner(interpreter, target);
}

pub(crate) fn jumpi<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([target, cond], interpreter);
    if !cond.is_zero() {
        jump_inner(interpreter, target);
    }
}

#[inline]
fn jump_inner(interpreter: &mut Interpreter, target: U256) {
    let target = as_usize_or_fail!(interpreter, target, InstructionResult::InvalidJump);
    if !interpreter.contract.is_valid_jump(target) {
        interpreter.instruction_result = InstructionResult::InvalidJump;
        return;
    }
    interpreter.program_counter = target;
}

pub(crate) fn jumpdest<H: Host + ?Sized>(_interpreter: &mut Interpreter, _host: &mut H) {}

pub(crate) fn pc<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    // `program_counter` already points past this opcode
    push!(interpreter, U256::from(interpreter.program_counter - 1));
}

#[inline]
fn return_inner(interpreter: &mut Interpreter, instruction_result: InstructionResult) {
    popn!([offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    let mut start = 0;
    if len != 0 {
        start = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, start, len);
    }
    interpreter.return_range = start..start + len;
    interpreter.instruction_result = instruction_result;
}

pub(crate) fn ret<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    return_inner(interpreter, InstructionResult::Return);
}

/// EIP-140: REVERT instruction
pub(crate) fn revert<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, BYZANTIUM);
    return_inner(interpreter, InstructionResult::Revert);
}

/// Stop opcode. This opcode halts the execution.
pub(crate) fn stop<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.instruction_result = InstructionResult::Stop;
}

/// Invalid opcode. This opcode halts the execution.
pub(crate) fn invalid<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.instruction_result = InstructionResult::InvalidFEOpcode;
}

/// Unknown opcode. This opcode halts the execution.
pub(crate) fn unknown<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.instruction_result = InstructionResult::OpcodeNotFound;
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
    fn jump_to_jumpdest() {
        // PUSH1 4, JUMP, INVALID, JUMPDEST, PC
        let interp = run(&[PUSH1, 4, JUMP, INVALID, JUMPDEST, PC], 1000);
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
        assert_eq!(interp.stack.data(), &vec![U256::from(5)]);
        assert_eq!(interp.gas.spent(), 3 + 8 + 1 + 2);
    }

    #[test]
    fn jump_into_push_data_fails() {
        // PUSH1 0x5b is data, not a JUMPDEST
        let interp = run(&[PUSH1, JUMPDEST, PUSH1, 1, JUMP], 1000);
        assert_eq!(interp.instruction_result, InstructionResult::InvalidJump);
        assert_eq!(interp.gas.remaining(), 0);
    }

    #[test]
    fn jumpi_falls_through_on_zero() {
        let interp = run(&[PUSH0, PUSH1, 0xff, JUMPI, PUSH1, 7], 1000);
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
        assert_eq!(interp.stack.data(), &vec![U256::from(7)]);
    }

    #[test]
    fn revert_keeps_output_and_gas() {
        // MSTORE8 0x2a at 0, REVERT(0, 1)
        let interp = run(&[PUSH1, 0x2a, PUSH0, MSTORE8, PUSH1, 1, PUSH0, REVERT], 1000);
        assert_eq!(interp.instruction_result, InstructionResult::Revert);
        assert_eq!(interp.return_value().as_ref(), &[0x2a]);
        assert_eq!(interp.gas.spent(), 3 + 2 + 3 + 3 + 3 + 2);
    }

    #[test]
    fn invalid_opcodes() {
        assert_eq!(
            run(&[INVALID], 1000).instruction_result,
            InstructionResult::InvalidFEOpcode
        );
        assert_eq!(
            run(&[0x0c], 1000).instruction_result,
            InstructionResult::OpcodeNotFound
        );
    }
}
