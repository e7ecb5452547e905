//! Activation schedule of hardforks.
use crate::{hardfork::SpecId, rules::RuleSet};
use std::vec::Vec;

/// The condition under which a hardfork activates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForkCondition {
    /// Active at and after this block number.
    Block(u64),
    /// Active at and after this block timestamp.
    Timestamp(u64),
}

impl ForkCondition {
    /// Returns `true` if the fork is active for the given block.
    #[inline]
    pub const fn active_at(&self, number: u64, timestamp: u64) -> bool {
        match *self {
            Self::Block(block) => number >= block,
            Self::Timestamp(time) => timestamp >= time,
        }
    }
}

/// Ordered list of hardfork activations.
///
/// Later entries win when several forks are active, so a fork sharing its activation with an older
/// one (Petersburg and Constantinople) must come after it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForkSchedule {
    forks: Vec<(SpecId, ForkCondition)>,
}

impl ForkSchedule {
    /// Creates a schedule from activations given in ascending order.
    pub fn new(forks: Vec<(SpecId, ForkCondition)>) -> Self {
        Self { forks }
    }

    /// Ethereum mainnet.
    pub fn mainnet() -> Self {
        use ForkCondition::*;
        use SpecId::*;

        Self::new(std::vec![
            (FRONTIER, Block(0)),
            (FRONTIER_THAWING, Block(200_000)),
            (HOMESTEAD, Block(1_150_000)),
            (DAO_FORK, Block(1_920_000)),
            (TANGERINE, Block(2_463_000)),
            (SPURIOUS_DRAGON, Block(2_675_000)),
            (BYZANTIUM, Block(4_370_000)),
            (CONSTANTINOPLE, Block(7_280_000)),
            (PETERSBURG, Block(7_280_000)),
            (ISTANBUL, Block(9_069_000)),
            (MUIR_GLACIER, Block(9_200_000)),
            (BERLIN, Block(12_244_000)),
            (LONDON, Block(12_965_000)),
            (ARROW_GLACIER, Block(13_773_000)),
            (GRAY_GLACIER, Block(15_050_000)),
            (MERGE, Block(15_537_394)),
            (SHANGHAI, Timestamp(1_681_338_455)),
        ])
    }

    /// Appends an activation.
    pub fn with_fork(mut self, spec_id: SpecId, condition: ForkCondition) -> Self {
        self.forks.push((spec_id, condition));
        self
    }

    /// Latest hardfork active at the given block, `FRONTIER` if none is.
    pub fn spec_at(&self, number: u64, timestamp: u64) -> SpecId {
        self.forks
            .iter()
            .rev()
            .find(|(_, condition)| condition.active_at(number, timestamp))
            .map(|(spec_id, _)| *spec_id)
            .unwrap_or(SpecId::FRONTIER)
    }

    /// Rule set active at the given block.
    pub fn rules_at(&self, number: u64, timestamp: u64) -> RuleSet {
        RuleSet::new(self.spec_at(number, timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use SpecId::*;

    #[rstest]
    #[case(0, 0, FRONTIER)]
    #[case(1_149_999, 0, FRONTIER_THAWING)]
    #[case(1_150_000, 0, HOMESTEAD)]
    #[case(7_280_000, 0, PETERSBURG)]
    #[case(9_069_000, 0, ISTANBUL)]
    #[case(12_244_000, 0, BERLIN)]
    #[case(17_000_000, 1_681_338_454, MERGE)]
    #[case(17_034_870, 1_681_338_455, SHANGHAI)]
    fn mainnet_activations(#[case] number: u64, #[case] timestamp: u64, #[case] spec: SpecId) {
        assert_eq!(ForkSchedule::mainnet().spec_at(number, timestamp), spec);
    }

    #[test]
    fn empty_schedule_is_frontier() {
        let rules = ForkSchedule::default().rules_at(u64::MAX, u64::MAX);
        assert_eq!(rules, RuleSet::new(FRONTIER));
    }
}
