//! Value transfer capability used by calls and contract creation.

use crate::{
    interpreter::InstructionResult,
    journaled_state::JournaledState,
    primitives::{Address, U256},
};
use auto_impl::auto_impl;

/// Decides whether value can move between accounts and moves it.
///
/// Both accounts are loaded into the journal before any hook is called.
#[auto_impl(&, Box)]
pub trait TransferHooks: Send + Sync {
    /// Returns `true` if `from` can pay `value`.
    fn can_transfer(&self, state: &JournaledState, from: &Address, value: U256) -> bool;

    /// Moves `value` from `from` to `to`, recording the change in the journal.
    fn transfer(
        &self,
        state: &mut JournaledState,
        from: &Address,
        to: &Address,
        value: U256,
    ) -> Result<(), InstructionResult>;
}

/// Moves balances in the journal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BalanceTransfer;

impl TransferHooks for BalanceTransfer {
    fn can_transfer(&self, state: &JournaledState, from: &Address, value: U256) -> bool {
        value.is_zero()
            || state
                .account(from)
                .is_some_and(|account| account.info.balance >= value)
    }

    fn transfer(
        &self,
        state: &mut JournaledState,
        from: &Address,
        to: &Address,
        value: U256,
    ) -> Result<(), InstructionResult> {
        state.transfer(from, to, value)
    }
}

/// Allows every transfer and moves nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoopTransfer;

impl TransferHooks for NoopTransfer {
    #[inline]
    fn can_transfer(&self, _state: &JournaledState, _from: &Address, _value: U256) -> bool {
        true
    }

    #[inline]
    fn transfer(
        &self,
        _state: &mut JournaledState,
        _from: &Address,
        _to: &Address,
        _value: U256,
    ) -> Result<(), InstructionResult> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::InMemoryDB,
        primitives::{AccountInfo, SpecId},
    };

    #[test]
    fn balance_transfer_checks_funds() {
        let from = Address::with_last_byte(1);
        let to = Address::with_last_byte(2);
        let mut db = InMemoryDB::new();
        db.insert_account_info(from, AccountInfo::from_balance(U256::from(10)));

        let mut state = JournaledState::new(SpecId::LATEST);
        state.load_account(from, &mut db).unwrap();
        state.load_account(to, &mut db).unwrap();

        assert!(BalanceTransfer.can_transfer(&state, &from, U256::from(10)));
        assert!(!BalanceTransfer.can_transfer(&state, &from, U256::from(11)));
        assert!(BalanceTransfer.can_transfer(&state, &to, U256::ZERO));

        BalanceTransfer
            .transfer(&mut state, &from, &to, U256::from(4))
            .unwrap();
        assert_eq!(state.account(&to).unwrap().info.balance, U256::from(4));
    }

    #[test]
    fn noop_transfer_moves_nothing() {
        let from = Address::with_last_byte(1);
        let to = Address::with_last_byte(2);
        let mut state = JournaledState::new(SpecId::LATEST);

        assert!(NoopTransfer.can_transfer(&state, &from, U256::MAX));
        NoopTransfer
            .transfer(&mut state, &from, &to, U256::MAX)
            .unwrap();
        assert!(state.account(&to).is_none());
    }
}
