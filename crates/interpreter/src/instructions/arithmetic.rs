use super::i256::{i256_div, i256_mod};
use crate::{gas, primitives::U256, Host, Interpreter};

pub(crate) fn add<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = op1.wrapping_add(*op2);
}

pub(crate) fn mul<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = op1.wrapping_mul(*op2);
}

pub(crate) fn sub<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = op1.wrapping_sub(*op2);
}

pub(crate) fn div<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    if !op2.is_zero() {
        *op2 = op1.wrapping_div(*op2);
    }
}

pub(crate) fn sdiv<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = i256_div(op1, *op2);
}

pub(crate) fn rem<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    if !op2.is_zero() {
        *op2 = op1.wrapping_rem(*op2);
    }
}

pub(crate) fn smod<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = i256_mod(op1, *op2);
}

pub(crate) fn addmod<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1, op2], op3, interpreter);
    *op3 = op1.add_mod(op2, *op3);
}

pub(crate) fn mulmod<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1, op2], op3, interpreter);
    *op3 = op1.mul_mod(op2, *op3);
}

pub(crate) fn exp<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    gas_or_fail!(interpreter, gas::exp_cost(&interpreter.rules, *op2));
    *op2 = op1.pow(*op2);
}

/// Implements the `SIGNEXTEND` opcode as defined in the Ethereum Yellow Paper.
///
/// In the yellow paper `SIGNEXTEND` is defined to take two inputs, we will call them
/// `x` and `y`, and produce one output. The first `t` bits of the output (numbering from the
/// left, starting from 0) are equal to the `t`-th bit of `y`, where `t` is equal to
/// `256 - 8(x + 1)`. The remaining bits of the output are equal to the corresponding bits of `y`.
/// Note: if `x >= 32` then the output is equal to `y` since `t <= 0`.
pub(crate) fn signextend<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([ext], x, interpreter);
    if ext < U256::from(31) {
        let ext = ext.as_limbs()[0];
        let bit_index = (8 * ext + 7) as usize;
        let bit = x.bit(bit_index);
        let mask = (U256::from(1) << bit_index) - U256::from(1);
        *x = if bit { *x | !mask } else { *x & mask };
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        opcode::*,
        primitives::{RuleSet, SpecId, U256},
        Contract, DummyHost, InstructionResult, Interpreter,
    };

    fn run(code: &[u8], spec: SpecId) -> Interpreter {
        let contract = Contract::new(Default::default(), code, Default::default(), Default::default(), U256::ZERO);
        let mut interp = Interpreter::new(contract, 100_000, false, RuleSet::new(spec));
        interp.run(&mut DummyHost::default());
        interp
    }

    #[test]
    fn sub_and_div_take_top_first() {
        // 10 - 3, 10 / 3
        let interp = run(&[PUSH1, 3, PUSH1, 10, SUB, PUSH1, 3, PUSH1, 10, DIV], SpecId::LATEST);
        assert_eq!(interp.stack.data(), &vec![U256::from(7), U256::from(3)]);
    }

    #[test]
    fn division_by_zero_is_zero() {
        let interp = run(&[PUSH0, PUSH1, 1, MOD, PUSH0, PUSH1, 1, DIV], SpecId::LATEST);
        assert_eq!(interp.stack.data(), &vec![U256::ZERO, U256::ZERO]);
    }

    #[test]
    fn exp_gas_depends_on_fork() {
        // 2 ** 256 wraps to zero
        let code = [PUSH2, 0x01, 0x00, PUSH1, 2, EXP];
        let homestead = run(&code, SpecId::HOMESTEAD);
        let spurious = run(&code, SpecId::SPURIOUS_DRAGON);
        assert_eq!(homestead.stack.data(), &vec![U256::ZERO]);
        assert_eq!(homestead.gas.spent(), 3 + 3 + 10 + 2 * 10);
        assert_eq!(spurious.gas.spent(), 3 + 3 + 10 + 2 * 50);
    }

    #[test]
    fn signextend() {
        // sign extend 0xff from byte 0
        let interp = run(&[PUSH1, 0xff, PUSH0, SIGNEXTEND], SpecId::LATEST);
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
        assert_eq!(interp.stack.data(), &vec![U256::MAX]);
    }

    #[test]
    fn underflow_halts() {
        let interp = run(&[PUSH1, 1, ADD], SpecId::LATEST);
        assert_eq!(interp.instruction_result, InstructionResult::StackUnderflow);
        assert_eq!(interp.gas.remaining(), 0);
    }
}
