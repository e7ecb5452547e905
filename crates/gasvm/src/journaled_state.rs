use crate::{
    db::Database,
    interpreter::{AccountLoad, InstructionResult, SStoreResult, SelfDestructResult, StateLoad},
    ledger::StorageLedger,
    primitives::{
        hash_code, hash_map::Entry, Account, Address, Bytes, Log, SpecId, State, StorageSlot,
        KECCAK_EMPTY, U256,
    },
};
use core::mem;
use std::vec::Vec;

/// Transaction state with a journal of every change, so that a failed frame can be undone.
///
/// Presence in `state` doubles as the EIP-2929 access set: an account or slot that is not loaded
/// yet is cold. Reverting a frame unloads what it loaded, making it cold again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JournaledState {
    /// Current state.
    pub state: State,
    /// Logs emitted by committed frames and the running ones.
    pub logs: Vec<Log>,
    /// How deep are we in call stack.
    pub depth: usize,
    /// Changes since the start of the transaction, newest last.
    pub journal: Vec<JournalEntry>,
    /// Original values of touched storage slots.
    pub ledger: StorageLedger,
    /// Refund counter of the transaction. Only clamped when the transaction ends.
    pub refund: i64,
    /// Before EIP-161 an empty account and an absent account are different things.
    pub is_before_spurious_dragon: bool,
}

/// A single revertible change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JournalEntry {
    /// Account was loaded and became warm.
    /// Revert: remove it from the state.
    AccountLoaded { address: Address },
    /// Account was marked for destruction and its balance moved to `target`.
    /// Revert: restore the flag and move the balance back.
    AccountDestroyed {
        address: Address,
        target: Address,
        was_destroyed: bool,
        had_balance: U256,
    },
    /// Account was touched.
    /// Revert: unmark it.
    AccountTouched { address: Address },
    /// Balance moved between two accounts.
    /// Revert: move it back.
    BalanceTransfer {
        from: Address,
        to: Address,
        balance: U256,
    },
    /// Nonce was incremented.
    /// Revert: decrement it.
    NonceChange { address: Address },
    /// Account was created.
    /// Revert: unmark it and reset its nonce.
    AccountCreated { address: Address },
    /// Slot was written, or cold loaded when `had_value` is `None`.
    /// Revert: restore the value or unload the slot.
    StorageChange {
        address: Address,
        key: U256,
        had_value: Option<U256>,
    },
    /// Code was deployed.
    /// Revert: remove it.
    CodeChange { address: Address },
}

/// Position to go back to when a frame fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JournalCheckpoint {
    log_i: usize,
    journal_i: usize,
    refund: i64,
}

impl JournaledState {
    /// Creates an empty journal following the account rules of `spec_id`.
    pub fn new(spec_id: SpecId) -> Self {
        Self {
            state: State::default(),
            logs: Vec::new(),
            depth: 0,
            journal: Vec::new(),
            ledger: StorageLedger::new(),
            refund: 0,
            is_before_spurious_dragon: !spec_id.is_enabled_in(SpecId::SPURIOUS_DRAGON),
        }
    }

    /// Returns the loaded account at `address`.
    #[inline]
    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.state.get(address)
    }

    /// Current call depth.
    #[inline]
    pub fn depth(&self) -> u64 {
        self.depth as u64
    }

    /// Adds to the refund counter.
    #[inline]
    pub fn record_refund(&mut self, refund: i64) {
        self.refund += refund;
    }

    /// Marks a loaded account as touched.
    pub fn touch(&mut self, address: &Address) {
        if let Some(account) = self.state.get_mut(address) {
            Self::touch_account(&mut self.journal, address, account);
        }
    }

    fn touch_account(journal: &mut Vec<JournalEntry>, address: &Address, account: &mut Account) {
        if !account.is_touched() {
            journal.push(JournalEntry::AccountTouched { address: *address });
            account.mark_touch();
        }
    }

    /// Ends the transaction, returning the changed state and logs and clearing everything else.
    pub fn finalize(&mut self) -> (State, Vec<Log>) {
        let state = mem::take(&mut self.state);
        let logs = mem::take(&mut self.logs);
        self.journal.clear();
        self.ledger.reset();
        self.depth = 0;
        self.refund = 0;
        (state, logs)
    }

    /// Deploys `code` to a loaded account.
    pub fn set_code(&mut self, address: Address, code: Bytes) {
        let Some(account) = self.state.get_mut(&address) else {
            return;
        };
        Self::touch_account(&mut self.journal, &address, account);
        self.journal.push(JournalEntry::CodeChange { address });

        account.info.code_hash = hash_code(&code);
        account.info.code = Some(code);
    }

    /// Increments the nonce of a loaded account, `None` on overflow.
    pub fn inc_nonce(&mut self, address: Address) -> Option<u64> {
        let account = self.state.get_mut(&address)?;
        if account.info.nonce == u64::MAX {
            return None;
        }
        Self::touch_account(&mut self.journal, &address, account);
        self.journal.push(JournalEntry::NonceChange { address });

        account.info.nonce += 1;
        Some(account.info.nonce)
    }

    /// Moves `balance` between two loaded accounts.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        balance: U256,
    ) -> Result<(), InstructionResult> {
        let Some(from_account) = self.state.get_mut(from) else {
            return Err(InstructionResult::FatalExternalError);
        };
        Self::touch_account(&mut self.journal, from, from_account);
        let from_balance = &mut from_account.info.balance;
        *from_balance = from_balance
            .checked_sub(balance)
            .ok_or(InstructionResult::OutOfFund)?;

        let Some(to_account) = self.state.get_mut(to) else {
            return Err(InstructionResult::FatalExternalError);
        };
        Self::touch_account(&mut self.journal, to, to_account);
        let to_balance = &mut to_account.info.balance;
        *to_balance = to_balance
            .checked_add(balance)
            .ok_or(InstructionResult::OverflowPayment)?;

        self.journal.push(JournalEntry::BalanceTransfer {
            from: *from,
            to: *to,
            balance,
        });
        Ok(())
    }

    /// Enters a frame that creates the loaded account at `address`.
    ///
    /// Fails with `CreateCollision` if the account already has code or a nonce. Value is moved
    /// separately, after the checkpoint is taken.
    pub fn create_account_checkpoint(
        &mut self,
        address: Address,
        spec_id: SpecId,
    ) -> Result<JournalCheckpoint, InstructionResult> {
        let checkpoint = self.checkpoint();

        let Some(account) = self.state.get_mut(&address) else {
            self.checkpoint_revert(checkpoint);
            return Err(InstructionResult::FatalExternalError);
        };
        if account.info.code_hash != KECCAK_EMPTY || account.info.nonce != 0 {
            self.checkpoint_revert(checkpoint);
            return Err(InstructionResult::CreateCollision);
        }

        account.mark_created();
        self.journal.push(JournalEntry::AccountCreated { address });
        account.info.code = None;
        Self::touch_account(&mut self.journal, &address, account);

        // EIP-161: State trie clearing (invariant-preserving alternative)
        if spec_id.is_enabled_in(SpecId::SPURIOUS_DRAGON) {
            account.info.nonce = 1;
        }

        Ok(checkpoint)
    }

    fn journal_revert(state: &mut State, journal_entries: Vec<JournalEntry>) {
        for entry in journal_entries.into_iter().rev() {
            match entry {
                JournalEntry::AccountLoaded { address } => {
                    state.remove(&address);
                }
                JournalEntry::AccountTouched { address } => {
                    if let Some(account) = state.get_mut(&address) {
                        account.unmark_touch();
                    }
                }
                JournalEntry::AccountDestroyed {
                    address,
                    target,
                    was_destroyed,
                    had_balance,
                } => {
                    if let Some(account) = state.get_mut(&address) {
                        if was_destroyed {
                            account.mark_selfdestruct();
                        } else {
                            account.unmark_selfdestruct();
                        }
                        account.info.balance += had_balance;
                    }
                    if address != target {
                        if let Some(target) = state.get_mut(&target) {
                            target.info.balance -= had_balance;
                        }
                    }
                }
                JournalEntry::BalanceTransfer { from, to, balance } => {
                    if let Some(from) = state.get_mut(&from) {
                        from.info.balance += balance;
                    }
                    if let Some(to) = state.get_mut(&to) {
                        to.info.balance -= balance;
                    }
                }
                JournalEntry::NonceChange { address } => {
                    if let Some(account) = state.get_mut(&address) {
                        account.info.nonce -= 1;
                    }
                }
                JournalEntry::AccountCreated { address } => {
                    if let Some(account) = state.get_mut(&address) {
                        account.unmark_created();
                        account.info.nonce = 0;
                    }
                }
                JournalEntry::StorageChange {
                    address,
                    key,
                    had_value,
                } => {
                    let Some(account) = state.get_mut(&address) else {
                        continue;
                    };
                    match had_value {
                        Some(had_value) => {
                            account.storage.insert(key, StorageSlot::new(had_value));
                        }
                        None => {
                            account.storage.remove(&key);
                        }
                    }
                }
                JournalEntry::CodeChange { address } => {
                    if let Some(account) = state.get_mut(&address) {
                        account.info.code_hash = KECCAK_EMPTY;
                        account.info.code = None;
                    }
                }
            }
        }
    }

    /// Enters a new frame.
    pub fn checkpoint(&mut self) -> JournalCheckpoint {
        let checkpoint = JournalCheckpoint {
            log_i: self.logs.len(),
            journal_i: self.journal.len(),
            refund: self.refund,
        };
        self.depth += 1;
        checkpoint
    }

    /// Leaves a frame keeping its changes.
    pub fn checkpoint_commit(&mut self) {
        self.depth -= 1;
    }

    /// Leaves a frame undoing its changes, the refund counter included.
    pub fn checkpoint_revert(&mut self, checkpoint: JournalCheckpoint) {
        self.depth -= 1;
        let entries = self.journal.split_off(checkpoint.journal_i);
        Self::journal_revert(&mut self.state, entries);
        self.logs.truncate(checkpoint.log_i);
        self.refund = checkpoint.refund;
    }

    /// Marks `address` for destruction and moves its balance to `target`.
    pub fn selfdestruct<DB: Database>(
        &mut self,
        address: Address,
        target: Address,
        db: &mut DB,
    ) -> Result<StateLoad<SelfDestructResult>, DB::Error> {
        let target_load = self.load_account_exist(target, db)?;
        // the destroyed account is running code, so it is loaded already
        self.load_account(address, db)?;

        let Some(account) = self.state.get_mut(&address) else {
            return Ok(StateLoad::new(SelfDestructResult::default(), target_load.is_cold));
        };
        let balance = mem::take(&mut account.info.balance);
        let previously_destroyed = account.is_selfdestructed();
        account.mark_selfdestruct();

        // When target and destroyed account are the same the balance is burnt.
        if address != target {
            if let Some(target_account) = self.state.get_mut(&target) {
                Self::touch_account(&mut self.journal, &target, target_account);
                target_account.info.balance += balance;
            }
        }

        self.journal.push(JournalEntry::AccountDestroyed {
            address,
            target,
            was_destroyed: previously_destroyed,
            had_balance: balance,
        });

        Ok(StateLoad::new(
            SelfDestructResult {
                had_value: !balance.is_zero(),
                target_exists: !target_load.is_empty,
                previously_destroyed,
            },
            target_load.is_cold,
        ))
    }

    /// Loads an account into the state, returning whether it was cold.
    pub fn load_account<DB: Database>(
        &mut self,
        address: Address,
        db: &mut DB,
    ) -> Result<StateLoad<&mut Account>, DB::Error> {
        Ok(match self.state.entry(address) {
            Entry::Occupied(entry) => StateLoad::new(entry.into_mut(), false),
            Entry::Vacant(vac) => {
                let account = match db.basic(address)? {
                    Some(info) => info.into(),
                    None => Account::new_not_existing(),
                };
                self.journal.push(JournalEntry::AccountLoaded { address });
                StateLoad::new(vac.insert(account), true)
            }
        })
    }

    /// Loads an account and reports whether a call to it would have to create it.
    pub fn load_account_exist<DB: Database>(
        &mut self,
        address: Address,
        db: &mut DB,
    ) -> Result<AccountLoad, DB::Error> {
        let is_before_spurious_dragon = self.is_before_spurious_dragon;
        let load = self.load_account(address, db)?;
        let account = load.data;

        let exists = if is_before_spurious_dragon {
            !account.is_loaded_as_not_existing() || account.is_touched()
        } else {
            !account.is_empty()
        };
        Ok(AccountLoad {
            is_cold: load.is_cold,
            is_empty: !exists,
        })
    }

    /// Loads an account together with its code.
    pub fn load_code<DB: Database>(
        &mut self,
        address: Address,
        db: &mut DB,
    ) -> Result<StateLoad<&mut Account>, DB::Error> {
        let load = self.load_account(address, db)?;
        let account = load.data;
        if account.info.code.is_none() {
            let code = if account.info.code_hash == KECCAK_EMPTY {
                Bytes::new()
            } else {
                db.code_by_hash(account.info.code_hash)?
            };
            account.info.code = Some(code);
        }
        Ok(StateLoad::new(account, load.is_cold))
    }

    /// Reads a storage slot, loading it from the database if it is cold.
    ///
    /// A cold load records the value in the ledger as the slot's original value.
    pub fn sload<DB: Database>(
        &mut self,
        address: Address,
        key: U256,
        db: &mut DB,
    ) -> Result<StateLoad<U256>, DB::Error> {
        let account = self.load_account(address, db)?.data;
        let is_newly_created = account.is_created();
        let load = match account.storage.entry(key) {
            Entry::Occupied(occ) => StateLoad::new(occ.get().present_value(), false),
            Entry::Vacant(vac) => {
                // storage of an account created in this transaction is empty
                let value = if is_newly_created {
                    U256::ZERO
                } else {
                    db.storage(address, key)?
                };
                vac.insert(StorageSlot::new(value));
                self.journal.push(JournalEntry::StorageChange {
                    address,
                    key,
                    had_value: None,
                });
                self.ledger.record_original(address, key, value);
                StateLoad::new(value, true)
            }
        };
        Ok(load)
    }

    /// Writes a storage slot and returns its original, present and new value.
    pub fn sstore<DB: Database>(
        &mut self,
        address: Address,
        key: U256,
        new: U256,
        db: &mut DB,
    ) -> Result<StateLoad<SStoreResult>, DB::Error> {
        let present = self.sload(address, key, db)?;
        let original_value = self.ledger.original(address, key).unwrap_or(present.data);
        let result = SStoreResult {
            original_value,
            present_value: present.data,
            new_value: new,
        };

        if present.data != new {
            if let Some(account) = self.state.get_mut(&address) {
                account.storage.insert(key, StorageSlot::new(new));
                self.journal.push(JournalEntry::StorageChange {
                    address,
                    key,
                    had_value: Some(present.data),
                });
            }
        }
        Ok(StateLoad::new(result, present.is_cold))
    }

    /// Pushes a log of the running frame.
    #[inline]
    pub fn log(&mut self, log: Log) {
        self.logs.push(log);
    }
}
