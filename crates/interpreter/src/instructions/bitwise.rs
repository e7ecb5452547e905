use super::i256::i256_cmp;
use crate::{primitives::U256, Host, Interpreter};
use core::cmp::Ordering;

pub(crate) fn lt<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = U256::from(op1 < *op2);
}

pub(crate) fn gt<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = U256::from(op1 > *op2);
}

pub(crate) fn slt<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = U256::from(i256_cmp(op1, *op2) == Ordering::Less);
}

pub(crate) fn sgt<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = U256::from(i256_cmp(op1, *op2) == Ordering::Greater);
}

pub(crate) fn eq<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = U256::from(op1 == *op2);
}

pub(crate) fn iszero<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([], op1, interpreter);
    *op1 = U256::from(op1.is_zero());
}

pub(crate) fn bitand<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = op1 & *op2;
}

pub(crate) fn bitor<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = op1 | *op2;
}

pub(crate) fn bitxor<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = op1 ^ *op2;
}

pub(crate) fn not<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([], op1, interpreter);
    *op1 = !*op1;
}

pub(crate) fn byte<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    let o1 = as_usize_saturated!(op1);
    *op2 = if o1 < 32 {
        // `31 - o1` because `byte` returns LE, while we want BE
        U256::from(op2.byte(31 - o1))
    } else {
        U256::ZERO
    };
}

/// EIP-145: Bitwise shifting instructions in EVM
pub(crate) fn shl<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, CONSTANTINOPLE);
    popn_top!([op1], op2, interpreter);
    let shift = as_usize_saturated!(op1);
    *op2 = if shift < 256 {
        *op2 << shift
    } else {
        U256::ZERO
    };
}

/// EIP-145: Bitwise shifting instructions in EVM
pub(crate) fn shr<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, CONSTANTINOPLE);
    popn_top!([op1], op2, interpreter);
    let shift = as_usize_saturated!(op1);
    *op2 = if shift < 256 {
        *op2 >> shift
    } else {
        U256::ZERO
    };
}

/// EIP-145: Bitwise shifting instructions in EVM
pub(crate) fn sar<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, CONSTANTINOPLE);
    popn_top!([op1], op2, interpreter);
    let shift = as_usize_saturated!(op1);
    *op2 = if shift < 256 {
        op2.arithmetic_shr(shift)
    } else if op2.bit(255) {
        U256::MAX
    } else {
        U256::ZERO
    };
}

#[cfg(test)]
mod tests {
    use crate::{
        opcode::*,
        primitives::{hex, RuleSet, SpecId, U256},
        Contract, DummyHost, InstructionResult, Interpreter,
    };
    use rstest::rstest;

    fn run(code: &[u8], spec: SpecId) -> Interpreter {
        let contract = Contract::new(
            Default::default(),
            code,
            Default::default(),
            Default::default(),
            U256::ZERO,
        );
        let mut interp = Interpreter::new(contract, 100_000, false, RuleSet::new(spec));
        interp.run(&mut DummyHost::default());
        interp
    }

    /// Runs `PUSH32 value PUSH32 shift OP` and returns the top of the stack.
    fn shift(op: u8, value: U256, shift: U256) -> U256 {
        let mut code = vec![PUSH32];
        code.extend_from_slice(&value.to_be_bytes::<32>());
        code.push(PUSH32);
        code.extend_from_slice(&shift.to_be_bytes::<32>());
        code.push(op);
        let interp = run(&code, SpecId::LATEST);
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
        interp.stack.peek(0).unwrap()
    }

    #[rstest]
    #[case(SHL, "0000000000000000000000000000000000000000000000000000000000000001", 1, "0000000000000000000000000000000000000000000000000000000000000002")]
    #[case(SHL, "0000000000000000000000000000000000000000000000000000000000000001", 255, "8000000000000000000000000000000000000000000000000000000000000000")]
    #[case(SHL, "0000000000000000000000000000000000000000000000000000000000000001", 256, "0000000000000000000000000000000000000000000000000000000000000000")]
    #[case(SHL, "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff", 1, "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe")]
    #[case(SHR, "8000000000000000000000000000000000000000000000000000000000000000", 1, "4000000000000000000000000000000000000000000000000000000000000000")]
    #[case(SHR, "8000000000000000000000000000000000000000000000000000000000000000", 255, "0000000000000000000000000000000000000000000000000000000000000001")]
    #[case(SHR, "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff", 256, "0000000000000000000000000000000000000000000000000000000000000000")]
    #[case(SAR, "8000000000000000000000000000000000000000000000000000000000000000", 1, "c000000000000000000000000000000000000000000000000000000000000000")]
    #[case(SAR, "8000000000000000000000000000000000000000000000000000000000000000", 256, "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff")]
    #[case(SAR, "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff", 255, "0000000000000000000000000000000000000000000000000000000000000000")]
    #[case(SAR, "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff", 254, "0000000000000000000000000000000000000000000000000000000000000001")]
    fn shifts(#[case] op: u8, #[case] value: &str, #[case] by: u64, #[case] expected: &str) {
        let value = U256::from_be_slice(&hex::decode(value).unwrap());
        let expected = U256::from_be_slice(&hex::decode(expected).unwrap());
        assert_eq!(shift(op, value, U256::from(by)), expected);
    }

    #[test]
    fn shifts_need_constantinople() {
        let interp = run(&[PUSH1, 1, PUSH1, 1, SHL], SpecId::BYZANTIUM);
        assert_eq!(interp.instruction_result, InstructionResult::NotActivated);
    }

    #[test]
    fn byte_and_signed_compare() {
        // BYTE 31 of 0x1234 is 0x34, -1 < 1 signed
        let code = [
            PUSH2, 0x12, 0x34, PUSH1, 31, BYTE, PUSH1, 1, PUSH1, 0, NOT, SLT,
        ];
        let interp = run(&code, SpecId::LATEST);
        assert_eq!(interp.stack.data(), &vec![U256::from(0x34), U256::from(1)]);
    }
}
