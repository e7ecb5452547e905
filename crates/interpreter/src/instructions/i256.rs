use crate::primitives::U256;
use core::cmp::Ordering;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Sign {
    Plus,
    Minus,
    Zero,
}

pub(crate) const MIN_NEGATIVE_VALUE: U256 = U256::from_limbs([
    0x0000000000000000,
    0x0000000000000000,
    0x0000000000000000,
    0x8000000000000000,
]);

/// Reads the sign of a two's complement word. With `DO_TWO_COMPL` a negative value is replaced by
/// its magnitude.
#[inline]
pub(crate) fn i256_sign<const DO_TWO_COMPL: bool>(val: &mut U256) -> Sign {
    if !val.bit(U256::BITS - 1) {
        if val.is_zero() {
            Sign::Zero
        } else {
            Sign::Plus
        }
    } else {
        if DO_TWO_COMPL {
            *val = two_compl(*val);
        }
        Sign::Minus
    }
}

#[inline]
fn u256_remove_sign(val: &mut U256) {
    val.set_bit(U256::BITS - 1, false);
}

#[inline]
pub(crate) fn two_compl(op: U256) -> U256 {
    op.wrapping_neg()
}

#[inline]
pub(crate) fn i256_cmp(mut first: U256, mut second: U256) -> Ordering {
    let first_sign = i256_sign::<false>(&mut first);
    let second_sign = i256_sign::<false>(&mut second);
    match first_sign.cmp_rank().cmp(&second_sign.cmp_rank()) {
        // same sign, two's complement words order like their values
        Ordering::Equal => first.cmp(&second),
        other => other,
    }
}

impl Sign {
    const fn cmp_rank(self) -> u8 {
        match self {
            Sign::Minus => 0,
            Sign::Zero => 1,
            Sign::Plus => 2,
        }
    }
}

#[inline]
pub(crate) fn i256_div(mut first: U256, mut second: U256) -> U256 {
    let second_sign = i256_sign::<true>(&mut second);
    if second_sign == Sign::Zero {
        return U256::ZERO;
    }
    let first_sign = i256_sign::<true>(&mut first);
    if first == MIN_NEGATIVE_VALUE && second == U256::from(1) {
        return if second_sign == Sign::Minus {
            MIN_NEGATIVE_VALUE
        } else {
            two_compl(MIN_NEGATIVE_VALUE)
        };
    }

    let mut d = first.wrapping_div(second);
    u256_remove_sign(&mut d);

    if d.is_zero() {
        return U256::ZERO;
    }

    match (first_sign, second_sign) {
        (Sign::Minus, Sign::Plus) | (Sign::Plus, Sign::Minus) => two_compl(d),
        _ => d,
    }
}

#[inline]
pub(crate) fn i256_mod(mut first: U256, mut second: U256) -> U256 {
    let first_sign = i256_sign::<true>(&mut first);
    if first_sign == Sign::Zero {
        return U256::ZERO;
    }

    let second_sign = i256_sign::<true>(&mut second);
    if second_sign == Sign::Zero {
        return U256::ZERO;
    }
    let mut r = first.wrapping_rem(second);
    u256_remove_sign(&mut r);
    if r.is_zero() {
        return U256::ZERO;
    }
    if first_sign == Sign::Minus {
        two_compl(r)
    } else {
        r
    }
}
