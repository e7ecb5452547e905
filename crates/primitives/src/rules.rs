//! Fork dependent rule set.
//!
//! A [`RuleSet`] is the hardfork id plus the set of protocol adjustments it activates. Gas
//! functions read the flags instead of comparing fork ids so that single EIPs can be enabled on top
//! of an older fork.
use crate::hardfork::SpecId;
use bitflags::bitflags;

bitflags! {
    /// Protocol adjustments that change gas accounting or opcode availability.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Eips: u16 {
        /// EIP-1283: Net gas metering for SSTORE without dirty maps (Constantinople only).
        const NET_SSTORE_1283 = 1 << 0;
        /// EIP-1344: CHAINID opcode.
        const CHAINID_1344 = 1 << 1;
        /// EIP-1884: Repricing of trie-size-dependent opcodes, SELFBALANCE.
        const SLOAD_1884 = 1 << 2;
        /// EIP-2200: Structured definitions for net gas metering.
        const NET_SSTORE_2200 = 1 << 3;
        /// EIP-2929: Gas cost increases for state access opcodes.
        const ACCESS_LISTS_2929 = 1 << 4;
        /// EIP-3198: BASEFEE opcode.
        const BASEFEE_3198 = 1 << 5;
        /// EIP-3529: Reduction in refunds.
        const REFUND_REDUCTION_3529 = 1 << 6;
        /// EIP-3541: Reject new contracts starting with the 0xEF byte.
        const REJECT_EF_3541 = 1 << 7;
        /// EIP-3651: Warm COINBASE.
        const WARM_COINBASE_3651 = 1 << 8;
        /// EIP-3855: PUSH0 instruction.
        const PUSH0_3855 = 1 << 9;
        /// EIP-3860: Limit and meter initcode.
        const INITCODE_3860 = 1 << 10;
    }
}

impl Eips {
    /// Returns the flag for the given EIP number, if it can be toggled.
    pub const fn from_number(eip: u16) -> Option<Self> {
        Some(match eip {
            1283 => Self::NET_SSTORE_1283,
            1344 => Self::CHAINID_1344,
            1884 => Self::SLOAD_1884,
            2200 => Self::NET_SSTORE_2200,
            2929 => Self::ACCESS_LISTS_2929,
            3198 => Self::BASEFEE_3198,
            3529 => Self::REFUND_REDUCTION_3529,
            3541 => Self::REJECT_EF_3541,
            3651 => Self::WARM_COINBASE_3651,
            3855 => Self::PUSH0_3855,
            3860 => Self::INITCODE_3860,
            _ => return None,
        })
    }

    /// Adjustments activated by the given hardfork.
    pub fn for_spec(spec_id: SpecId) -> Self {
        use SpecId::*;

        let mut eips = Self::empty();
        // Petersburg removed net metering again before it reached mainnet.
        if spec_id == CONSTANTINOPLE {
            eips |= Self::NET_SSTORE_1283;
        }
        if spec_id.is_enabled_in(ISTANBUL) {
            eips |= Self::CHAINID_1344 | Self::SLOAD_1884 | Self::NET_SSTORE_2200;
        }
        if spec_id.is_enabled_in(BERLIN) {
            eips |= Self::ACCESS_LISTS_2929;
        }
        if spec_id.is_enabled_in(LONDON) {
            eips |= Self::BASEFEE_3198 | Self::REFUND_REDUCTION_3529 | Self::REJECT_EF_3541;
        }
        if spec_id.is_enabled_in(SHANGHAI) {
            eips |= Self::WARM_COINBASE_3651 | Self::PUSH0_3855 | Self::INITCODE_3860;
        }
        eips
    }
}

/// Errors raised while building a [`RuleSet`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleSetError {
    /// The EIP number is not one that can be enabled individually.
    #[error("EIP-{0} can not be enabled individually")]
    UnsupportedEip(u16),
}

/// Immutable bundle of a hardfork and its active protocol adjustments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleSet {
    /// Hardfork the rules derive from.
    pub spec_id: SpecId,
    /// Active adjustments, a superset of the ones activated by `spec_id`.
    pub eips: Eips,
}

impl RuleSet {
    /// Rules of the given hardfork.
    pub fn new(spec_id: SpecId) -> Self {
        Self {
            spec_id,
            eips: Eips::for_spec(spec_id),
        }
    }

    /// Returns a copy with the given EIPs enabled in addition to the current ones.
    pub fn with_extra_eips(self, eips: &[u16]) -> Result<Self, RuleSetError> {
        let mut rules = self;
        for &eip in eips {
            let flag = Eips::from_number(eip).ok_or(RuleSetError::UnsupportedEip(eip))?;
            rules.eips |= flag;
        }
        Ok(rules)
    }

    /// Returns `true` if the hardfork of this rule set is `spec_id` or later.
    #[inline]
    pub const fn is_enabled_in(&self, spec_id: SpecId) -> bool {
        self.spec_id.is_enabled_in(spec_id)
    }

    /// Returns `true` if all of the given adjustments are active.
    #[inline]
    pub const fn has(&self, eips: Eips) -> bool {
        self.eips.contains(eips)
    }

    /// SSTORE is net metered, either by EIP-2200 or by its EIP-2929 reparametrization.
    #[inline]
    pub const fn has_sstore_sentry(&self) -> bool {
        self.eips
            .intersects(Eips::NET_SSTORE_2200.union(Eips::ACCESS_LISTS_2929))
    }

    /// Quotient applied to the gas spent to get the maximum refund.
    #[inline]
    pub const fn max_refund_quotient(&self) -> u64 {
        if self.has(Eips::REFUND_REDUCTION_3529) {
            5
        } else {
            2
        }
    }
}

impl From<SpecId> for RuleSet {
    fn from(spec_id: SpecId) -> Self {
        Self::new(spec_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use SpecId::*;

    #[rstest]
    #[case(PETERSBURG, Eips::empty())]
    #[case(CONSTANTINOPLE, Eips::NET_SSTORE_1283)]
    #[case(ISTANBUL, Eips::CHAINID_1344 | Eips::SLOAD_1884 | Eips::NET_SSTORE_2200)]
    #[case(MUIR_GLACIER, Eips::CHAINID_1344 | Eips::SLOAD_1884 | Eips::NET_SSTORE_2200)]
    fn flags_follow_fork(#[case] spec: SpecId, #[case] eips: Eips) {
        assert_eq!(RuleSet::new(spec).eips, eips);
    }

    #[test]
    fn berlin_keeps_istanbul_flags() {
        let rules = RuleSet::new(BERLIN);
        assert!(rules.has(Eips::NET_SSTORE_2200 | Eips::ACCESS_LISTS_2929));
        assert!(!rules.has(Eips::REFUND_REDUCTION_3529));
        assert_eq!(rules.max_refund_quotient(), 2);
        assert_eq!(RuleSet::new(LONDON).max_refund_quotient(), 5);
    }

    #[test]
    fn extra_eips() {
        let rules = RuleSet::new(PETERSBURG).with_extra_eips(&[2200]).unwrap();
        assert_eq!(rules.spec_id, PETERSBURG);
        assert!(rules.has_sstore_sentry());
        assert!(!rules.has(Eips::SLOAD_1884));

        assert_eq!(
            RuleSet::new(PETERSBURG).with_extra_eips(&[2200, 4844]),
            Err(RuleSetError::UnsupportedEip(4844))
        );
    }

    #[test]
    fn latest_has_everything() {
        assert_eq!(RuleSet::new(LATEST).eips, Eips::all().difference(Eips::NET_SSTORE_1283));
    }
}
