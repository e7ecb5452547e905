use crate::{primitives::U256, Host, Interpreter};

pub(crate) fn pop<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    if let Err(result) = interpreter.stack.pop() {
        interpreter.instruction_result = result;
    }
}

/// EIP-3855: PUSH0 instruction
///
/// Introduce a new instruction which pushes the constant value 0 onto the stack.
pub(crate) fn push0<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check_eip!(interpreter, PUSH0_3855);
    push!(interpreter, U256::ZERO);
}

pub(crate) fn push<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    let start = interpreter.program_counter;
    // Analysis pads the bytecode so that the immediate of a trailing PUSH is in bounds.
    let immediate = &interpreter.contract.bytecode.bytecode()[start..start + N];
    if let Err(result) = interpreter.stack.push_slice(immediate) {
        interpreter.instruction_result = result;
        return;
    }
    interpreter.program_counter = start + N;
}

pub(crate) fn dup<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    if let Err(result) = interpreter.stack.dup::<N>() {
        interpreter.instruction_result = result;
    }
}

pub(crate) fn swap<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    if let Err(result) = interpreter.stack.swap::<N>() {
        interpreter.instruction_result = result;
    }
}
