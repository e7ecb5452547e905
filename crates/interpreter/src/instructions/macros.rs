//! Utility macros to help implementing opcode instruction functions.

/// Fails the instruction if the current call is static.
macro_rules! require_non_staticcall {
    ($interp:expr) => {
        if $interp.is_static {
            $interp.instruction_result = $crate::InstructionResult::StateChangeDuringStaticCall;
            return;
        }
    };
}

/// Fails the instruction with `NotActivated` if the rule set is older than the given fork.
macro_rules! check {
    ($interp:expr, $min:ident) => {
        if !$interp
            .rules
            .is_enabled_in($crate::primitives::SpecId::$min)
        {
            $interp.instruction_result = $crate::InstructionResult::NotActivated;
            return;
        }
    };
}

/// Fails the instruction with `NotActivated` if the rule set lacks the given EIP flag.
macro_rules! check_eip {
    ($interp:expr, $eip:ident) => {
        if !$interp.rules.has($crate::primitives::Eips::$eip) {
            $interp.instruction_result = $crate::InstructionResult::NotActivated;
            return;
        }
    };
}

/// Records a `gas` cost and fails the instruction if it would exceed the available gas.
macro_rules! gas {
    ($interp:expr, $gas:expr) => {
        gas!($interp, $gas, ())
    };
    ($interp:expr, $gas:expr, $ret:expr) => {
        if !$interp.gas.record_cost($gas) {
            $interp.instruction_result = $crate::InstructionResult::OutOfGas;
            return $ret;
        }
    };
}

/// Same as [`gas!`], but with `gas` as an option, failing with `GasUintOverflow` on `None`.
macro_rules! gas_or_fail {
    ($interp:expr, $gas:expr) => {
        gas_or_fail!($interp, $gas, ())
    };
    ($interp:expr, $gas:expr, $ret:expr) => {
        match $gas {
            Some(gas_used) => gas!($interp, gas_used, $ret),
            None => {
                $interp.instruction_result = $crate::InstructionResult::GasUintOverflow;
                return $ret;
            }
        }
    };
}

/// Charges and performs memory growth so that `offset + len` bytes are addressable.
macro_rules! resize_memory {
    ($interp:expr, $offset:expr, $len:expr) => {
        resize_memory!($interp, $offset, $len, ())
    };
    ($interp:expr, $offset:expr, $len:expr, $ret:expr) => {
        if let Err(result) = $crate::interpreter::resize_memory(
            &mut $interp.gas,
            &mut $interp.memory,
            $offset,
            $len,
        ) {
            $interp.instruction_result = result;
            return $ret;
        }
    };
}

/// Pops `U256` values from the stack, topmost first. Fails the instruction on underflow.
macro_rules! popn {
    ([ $($x:ident),* ], $interp:expr $(,$ret:expr)? ) => {
        let Ok([$( $x ),*]) = $interp.stack.popn() else {
            $interp.instruction_result = $crate::InstructionResult::StackUnderflow;
            return $($ret)?;
        };
    };
}

/// Pops `U256` values and binds a mutable reference to the new top of the stack.
macro_rules! popn_top {
    ([ $($x:ident),* ], $top:ident, $interp:expr $(,$ret:expr)? ) => {
        let Ok(([$( $x ),*], $top)) = $interp.stack.popn_top() else {
            $interp.instruction_result = $crate::InstructionResult::StackUnderflow;
            return $($ret)?;
        };
    };
}

/// Pushes `B256` values onto the stack. Fails the instruction if the stack is full.
macro_rules! push_b256 {
    ($interp:expr, $($x:expr),* $(,)?) => ($(
        match $interp.stack.push_b256($x) {
            Ok(()) => {},
            Err(e) => {
                $interp.instruction_result = e;
                return;
            },
        }
    )*)
}

/// Pushes a `U256` value onto the stack. Fails the instruction if the stack is full.
macro_rules! push {
    ($interp:expr, $($x:expr),* $(,)?) => ($(
        match $interp.stack.push($x) {
            Ok(()) => {},
            Err(e) => {
                $interp.instruction_result = e;
                return;
            }
        }
    )*)
}

/// Converts a `U256` value to a `u64`, saturating to `MAX` if the value is too large.
macro_rules! as_u64_saturated {
    ($v:expr) => {{
        let x: &[u64; 4] = $v.as_limbs();
        if x[1] == 0 && x[2] == 0 && x[3] == 0 {
            x[0]
        } else {
            u64::MAX
        }
    }};
}

/// Converts a `U256` value to a `usize`, saturating to `MAX` if the value is too large.
macro_rules! as_usize_saturated {
    ($v:expr) => {
        usize::try_from(as_u64_saturated!($v)).unwrap_or(usize::MAX)
    };
}

/// Converts a `U256` value to a `usize`, failing the instruction if the value does not fit in a
/// `u64`. The failure is `GasUintOverflow` unless another reason is given.
macro_rules! as_usize_or_fail {
    ($interp:expr, $v:expr) => {
        as_usize_or_fail!($interp, $v, $crate::InstructionResult::GasUintOverflow)
    };
    ($interp:expr, $v:expr, $reason:expr) => {
        as_usize_or_fail_ret!($interp, $v, $reason, ())
    };
}

/// Same as [`as_usize_or_fail!`] for functions returning `$ret` on failure.
macro_rules! as_usize_or_fail_ret {
    ($interp:expr, $v:expr, $ret:expr) => {
        as_usize_or_fail_ret!(
            $interp,
            $v,
            $crate::InstructionResult::GasUintOverflow,
            $ret
        )
    };
    ($interp:expr, $v:expr, $reason:expr, $ret:expr) => {{
        let x: &[u64; 4] = $v.as_limbs();
        match usize::try_from(x[0]) {
            Ok(value) if x[1] == 0 && x[2] == 0 && x[3] == 0 => value,
            _ => {
                $interp.instruction_result = $reason;
                return $ret;
            }
        }
    }};
}
