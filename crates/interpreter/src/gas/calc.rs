use super::{constants::*, GasOverflow};
use crate::{
    primitives::{Eips, RuleSet, SpecId, MAX_MEMORY_SIZE, U256},
    AccountLoad, SStoreResult, SelfDestructResult, StateLoad,
};

/// `const` Option `?`.
macro_rules! tri {
    ($e:expr) => {
        match $e {
            Some(v) => v,
            None => return None,
        }
    };
}

/// Number of 32 byte words needed to hold `len` bytes.
#[inline]
pub const fn num_words(len: u64) -> u64 {
    len.div_ceil(32)
}

/// Gas of the SLOAD part and of the reset tier of a net metered `SSTORE`, `None` if storage
/// writes are not net metered.
#[inline]
const fn net_sstore_gas(rules: &RuleSet) -> Option<(u64, u64)> {
    if rules.has(Eips::ACCESS_LISTS_2929) {
        Some((WARM_STORAGE_READ_COST, WARM_SSTORE_RESET))
    } else if rules.has(Eips::NET_SSTORE_2200) {
        Some((ISTANBUL_SLOAD_GAS, SSTORE_RESET))
    } else if rules.has(Eips::NET_SSTORE_1283) {
        Some((CONSTANTINOPLE_SLOAD_GAS, SSTORE_RESET))
    } else {
        None
    }
}

/// `SSTORE` opcode refund calculation.
#[allow(clippy::collapsible_else_if)]
#[inline]
pub fn sstore_refund(rules: &RuleSet, vals: &SStoreResult) -> i64 {
    let Some((sload_gas, sstore_reset)) = net_sstore_gas(rules) else {
        return if !vals.is_present_zero() && vals.is_new_zero() {
            REFUND_SSTORE_CLEARS
        } else {
            0
        };
    };

    // EIP-3529: Reduction in refunds
    let sstore_clears_schedule = if rules.has(Eips::REFUND_REDUCTION_3529) {
        LONDON_REFUND_SSTORE_CLEARS
    } else {
        REFUND_SSTORE_CLEARS
    };

    if vals.is_new_eq_present() {
        0
    } else {
        if vals.is_original_eq_present() && vals.is_new_zero() {
            sstore_clears_schedule
        } else {
            let mut refund = 0;

            if !vals.is_original_zero() {
                if vals.is_present_zero() {
                    refund -= sstore_clears_schedule;
                } else if vals.is_new_zero() {
                    refund += sstore_clears_schedule;
                }
            }

            if vals.is_original_eq_new() {
                if vals.is_original_zero() {
                    refund += (SSTORE_SET - sload_gas) as i64;
                } else {
                    refund += (sstore_reset - sload_gas) as i64;
                }
            }

            refund
        }
    }
}

/// `SSTORE` opcode cost calculation.
///
/// `is_cold` is only read when EIP-2929 is active.
#[inline]
pub fn sstore_cost(rules: &RuleSet, vals: &SStoreResult, is_cold: bool) -> u64 {
    let Some((sload_gas, sstore_reset)) = net_sstore_gas(rules) else {
        return frontier_sstore_cost(vals);
    };
    let mut gas_cost = net_sstore_cost(sload_gas, sstore_reset, vals);
    if rules.has(Eips::ACCESS_LISTS_2929) && is_cold {
        gas_cost += COLD_SLOAD_COST;
    }
    gas_cost
}

/// EIP-1283 and EIP-2200 net gas metering.
#[inline]
fn net_sstore_cost(sload_gas: u64, sstore_reset: u64, vals: &SStoreResult) -> u64 {
    if vals.is_new_eq_present() {
        sload_gas
    } else if vals.is_original_eq_present() && vals.is_original_zero() {
        SSTORE_SET
    } else if vals.is_original_eq_present() {
        sstore_reset
    } else {
        sload_gas
    }
}

/// Frontier sstore cost just had two cases set and reset values.
#[inline]
fn frontier_sstore_cost(vals: &SStoreResult) -> u64 {
    if vals.is_present_zero() && !vals.is_new_zero() {
        SSTORE_SET
    } else {
        SSTORE_RESET
    }
}

/// `SLOAD` opcode cost calculation.
#[inline]
pub const fn sload_cost(rules: &RuleSet, is_cold: bool) -> u64 {
    if rules.has(Eips::ACCESS_LISTS_2929) {
        if is_cold {
            COLD_SLOAD_COST
        } else {
            WARM_STORAGE_READ_COST
        }
    } else if rules.has(Eips::SLOAD_1884) {
        // EIP-1884: Repricing for trie-size-dependent opcodes
        ISTANBUL_SLOAD_GAS
    } else if rules.is_enabled_in(SpecId::TANGERINE) {
        // EIP-150: Gas cost changes for IO-heavy operations
        200
    } else {
        50
    }
}

/// `BALANCE` opcode cost calculation.
#[inline]
pub const fn balance_cost(rules: &RuleSet, is_cold: bool) -> u64 {
    if rules.has(Eips::ACCESS_LISTS_2929) {
        warm_cold_cost(is_cold)
    } else if rules.has(Eips::SLOAD_1884) {
        700
    } else if rules.is_enabled_in(SpecId::TANGERINE) {
        400
    } else {
        20
    }
}

/// `EXTCODESIZE` opcode cost calculation.
#[inline]
pub const fn extcodesize_cost(rules: &RuleSet, is_cold: bool) -> u64 {
    if rules.has(Eips::ACCESS_LISTS_2929) {
        warm_cold_cost(is_cold)
    } else if rules.is_enabled_in(SpecId::TANGERINE) {
        700
    } else {
        20
    }
}

/// `EXTCODEHASH` opcode cost calculation.
#[inline]
pub const fn extcodehash_cost(rules: &RuleSet, is_cold: bool) -> u64 {
    if rules.has(Eips::ACCESS_LISTS_2929) {
        warm_cold_cost(is_cold)
    } else if rules.has(Eips::SLOAD_1884) {
        700
    } else {
        400
    }
}

/// `EXTCODECOPY` opcode cost calculation.
#[inline]
pub const fn extcodecopy_cost(rules: &RuleSet, len: u64, is_cold: bool) -> Option<u64> {
    copy_cost(extcodesize_cost(rules, is_cold), len)
}

/// `CREATE2` opcode cost calculation.
#[inline]
pub const fn create2_cost(len: u64) -> Option<u64> {
    CREATE.checked_add(tri!(cost_per_word(len, KECCAK256WORD)))
}

#[inline]
const fn log2floor(value: U256) -> u64 {
    let mut l: u64 = 256;
    let mut i = 3;
    loop {
        if value.as_limbs()[i] == 0u64 {
            l -= 64;
        } else {
            l -= value.as_limbs()[i].leading_zeros() as u64;
            if l == 0 {
                return l;
            } else {
                return l - 1;
            }
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }
    l
}

/// `EXP` opcode cost calculation.
#[inline]
pub fn exp_cost(rules: &RuleSet, power: U256) -> Option<u64> {
    if power.is_zero() {
        Some(EXP)
    } else {
        // EIP-160: EXP cost increase
        let gas_byte = if rules.is_enabled_in(SpecId::SPURIOUS_DRAGON) {
            50
        } else {
            10
        };
        EXP.checked_add(gas_byte * (log2floor(power) / 8 + 1))
    }
}

/// `*COPY` opcodes cost calculation.
#[inline]
pub const fn copy_cost_verylow(len: u64) -> Option<u64> {
    copy_cost(VERYLOW, len)
}

/// Cost of copying `len` bytes on top of `base_cost`.
#[inline]
pub const fn copy_cost(base_cost: u64, len: u64) -> Option<u64> {
    base_cost.checked_add(tri!(cost_per_word(len, COPY)))
}

/// `LOG` opcode cost calculation.
#[inline]
pub const fn log_cost(n: u8, len: u64) -> Option<u64> {
    tri!(LOG.checked_add(tri!(LOGDATA.checked_mul(len)))).checked_add(LOGTOPIC * n as u64)
}

/// `KECCAK256` opcode cost calculation.
#[inline]
pub const fn keccak256_cost(len: u64) -> Option<u64> {
    KECCAK256.checked_add(tri!(cost_per_word(len, KECCAK256WORD)))
}

/// Calculate the cost of buffer per word.
#[inline]
pub const fn cost_per_word(len: u64, multiple: u64) -> Option<u64> {
    multiple.checked_mul(num_words(len))
}

/// EIP-3860: Limit and meter initcode
///
/// Apply extra gas cost of 2 for every 32-byte chunk of initcode.
#[inline]
pub const fn initcode_cost(len: u64) -> Option<u64> {
    cost_per_word(len, INITCODE_WORD_COST)
}

/// Cost of storing `len` bytes of created code.
#[inline]
pub const fn code_deposit_cost(len: u64) -> Option<u64> {
    CODEDEPOSIT.checked_mul(len)
}

/// `SELFDESTRUCT` opcode cost calculation.
#[inline]
pub const fn selfdestruct_cost(rules: &RuleSet, res: StateLoad<SelfDestructResult>) -> u64 {
    // EIP-161: State trie clearing (invariant-preserving alternative)
    let should_charge_topup = if rules.is_enabled_in(SpecId::SPURIOUS_DRAGON) {
        res.data.had_value && !res.data.target_exists
    } else {
        !res.data.target_exists
    };

    // EIP-150: Gas cost changes for IO-heavy operations
    let selfdestruct_gas_topup = if rules.is_enabled_in(SpecId::TANGERINE) && should_charge_topup
    {
        NEWACCOUNT
    } else {
        0
    };

    // EIP-150: Gas cost changes for IO-heavy operations
    let selfdestruct_gas = if rules.is_enabled_in(SpecId::TANGERINE) {
        5000
    } else {
        0
    };

    let mut gas = selfdestruct_gas + selfdestruct_gas_topup;
    if rules.has(Eips::ACCESS_LISTS_2929) && res.is_cold {
        gas += COLD_ACCOUNT_ACCESS_COST
    }
    gas
}

/// Calculate call gas cost for the call instruction.
///
/// There is three types of gas.
/// * Account access gas. after berlin it can be cold or warm.
/// * Transfer value gas. If value is transferred and balance of target account is updated.
/// * If account is not existing and needs to be created. After Spurious dragon
///   this is only accounted if value is transferred.
///
/// `DELEGATECALL`, `CALLCODE` and `STATICCALL` pass `account_load.is_empty == false`.
#[inline]
pub const fn call_cost(rules: &RuleSet, transfers_value: bool, account_load: AccountLoad) -> u64 {
    // Account access.
    let mut gas = if rules.has(Eips::ACCESS_LISTS_2929) {
        warm_cold_cost(account_load.is_cold)
    } else if rules.is_enabled_in(SpecId::TANGERINE) {
        // EIP-150: Gas cost changes for IO-heavy operations
        700
    } else {
        40
    };

    // transfer value cost
    if transfers_value {
        gas += CALLVALUE;
    }

    // new account cost
    if account_load.is_empty {
        // EIP-161: State trie clearing (invariant-preserving alternative)
        if rules.is_enabled_in(SpecId::SPURIOUS_DRAGON) {
            // account only if there is value transferred.
            if transfers_value {
                gas += NEWACCOUNT;
            }
        } else {
            gas += NEWACCOUNT;
        }
    }

    gas
}

/// EIP-150: all but one 64th of the remaining gas.
#[inline]
pub const fn all_but_one_64th(gas: u64) -> u64 {
    gas - gas / 64
}

/// Gas handed to a callee, before the stipend.
///
/// After Tangerine the requested amount is capped to all but one 64th of what is left, before it
/// the full amount must be available.
#[inline]
pub fn call_gas_limit(rules: &RuleSet, remaining: u64, requested: U256) -> u64 {
    let requested = u64::try_from(requested).unwrap_or(u64::MAX);
    if rules.is_enabled_in(SpecId::TANGERINE) {
        requested.min(all_but_one_64th(remaining))
    } else {
        requested
    }
}

/// Berlin warm and cold storage access cost for account access.
#[inline]
pub const fn warm_cold_cost(is_cold: bool) -> u64 {
    if is_cold {
        COLD_ACCOUNT_ACCESS_COST
    } else {
        WARM_STORAGE_READ_COST
    }
}

/// Memory expansion cost calculation for a given number of words.
///
/// `num_words` must not exceed `MAX_MEMORY_SIZE / 32`, the quadratic term overflows past it.
#[inline]
pub const fn memory_gas(num_words: u64) -> u64 {
    MEMORY
        .saturating_mul(num_words)
        .saturating_add(num_words.saturating_mul(num_words) / MEMORY_QUADRATIC_DIVISOR)
}

/// Incremental cost of growing memory so that `new_size` bytes are addressable.
///
/// `current_cost` is the expansion cost already paid. Returns the new size in words and the cost
/// delta, or `None` if memory does not grow.
#[inline]
pub const fn memory_expansion_cost(
    current_cost: u64,
    new_size: u64,
) -> Result<Option<(u64, u64)>, GasOverflow> {
    if new_size > MAX_MEMORY_SIZE {
        return Err(GasOverflow);
    }
    let words = num_words(new_size);
    let new_cost = memory_gas(words);
    if new_cost <= current_cost {
        return Ok(None);
    }
    Ok(Some((words, new_cost - current_cost)))
}
