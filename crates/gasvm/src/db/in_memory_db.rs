use super::{Database, DatabaseCommit, EmptyDB};
use crate::primitives::{
    hash_code, AccountInfo, Address, Bytes, HashMap, State, B256, KECCAK_EMPTY, U256,
};
use core::convert::Infallible;

/// Memory backend, storing all state values in a `Map` in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryDB {
    /// Account info where `code` is always `None`, code bytes are in `contracts`.
    accounts: HashMap<Address, DbAccount>,
    /// Code by its hash.
    contracts: HashMap<B256, Bytes>,
    /// Block hashes by number. Missing numbers fall back to [`EmptyDB`].
    block_hashes: HashMap<u64, B256>,
}

/// Account stored in [`InMemoryDB`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DbAccount {
    /// Balance, nonce and code hash.
    pub info: AccountInfo,
    /// Storage slots.
    pub storage: HashMap<U256, U256>,
}

impl InMemoryDB {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all accounts.
    pub fn accounts(&self) -> &HashMap<Address, DbAccount> {
        &self.accounts
    }

    /// Returns the account at `address`, if any.
    pub fn account(&self, address: &Address) -> Option<&DbAccount> {
        self.accounts.get(address)
    }

    /// Returns the stored value of a slot, zero if absent.
    pub fn storage_value(&self, address: &Address, slot: &U256) -> U256 {
        self.accounts
            .get(address)
            .and_then(|account| account.storage.get(slot).copied())
            .unwrap_or_default()
    }

    fn insert_contract(&mut self, info: &mut AccountInfo) {
        if let Some(code) = info.code.take() {
            if !code.is_empty() {
                info.code_hash = hash_code(&code);
                self.contracts.insert(info.code_hash, code);
            }
        }
        if info.code_hash == B256::ZERO {
            info.code_hash = KECCAK_EMPTY;
        }
    }

    /// Inserts account info, keeping the storage of an existing account.
    pub fn insert_account_info(&mut self, address: Address, mut info: AccountInfo) {
        self.insert_contract(&mut info);
        self.accounts.entry(address).or_default().info = info;
    }

    /// Deploys `code` at `address`.
    pub fn insert_code(&mut self, address: Address, code: Bytes) {
        let mut info = self
            .accounts
            .get(&address)
            .map(|account| account.info.clone())
            .unwrap_or_default();
        info.set_code(code);
        self.insert_account_info(address, info);
    }

    /// Sets a storage slot of the account at `address`, creating the account if needed.
    pub fn insert_account_storage(&mut self, address: Address, slot: U256, value: U256) {
        self.accounts
            .entry(address)
            .or_default()
            .storage
            .insert(slot, value);
    }

    /// Sets the hash of block `number`.
    pub fn insert_block_hash(&mut self, number: u64, hash: B256) {
        self.block_hashes.insert(number, hash);
    }
}

impl Database for InMemoryDB {
    type Error = Infallible;

    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        Ok(self.accounts.get(&address).map(|account| account.info.clone()))
    }

    fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytes, Self::Error> {
        Ok(self.contracts.get(&code_hash).cloned().unwrap_or_default())
    }

    fn storage(&mut self, address: Address, index: U256) -> Result<U256, Self::Error> {
        Ok(self.storage_value(&address, &index))
    }

    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        match self.block_hashes.get(&number) {
            Some(hash) => Ok(*hash),
            None => EmptyDB.block_hash(number),
        }
    }
}

impl DatabaseCommit for InMemoryDB {
    fn commit(&mut self, changes: State) {
        for (address, mut account) in changes {
            if !account.is_touched() {
                continue;
            }
            if account.is_selfdestructed() {
                let db_account = self.accounts.entry(address).or_default();
                db_account.storage.clear();
                db_account.info = AccountInfo::default();
                continue;
            }
            self.insert_contract(&mut account.info);

            let db_account = self.accounts.entry(address).or_default();
            if account.is_created() {
                db_account.storage.clear();
            }
            db_account.info = account.info;
            db_account.storage.extend(
                account
                    .storage
                    .into_iter()
                    .map(|(key, slot)| (key, slot.present_value())),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{address, bytes, Account};

    #[test]
    fn code_is_split_from_account() {
        let mut db = InMemoryDB::new();
        let target = address!("0000000000000000000000000000000000000aaa");
        db.insert_code(target, bytes!("6001"));

        let info = db.basic(target).unwrap().unwrap();
        assert!(info.code.is_none());
        assert_eq!(db.code_by_hash(info.code_hash).unwrap(), bytes!("6001"));
    }

    #[test]
    fn commit_merges_storage() {
        let mut db = InMemoryDB::new();
        let target = address!("0000000000000000000000000000000000000aaa");
        db.insert_account_storage(target, U256::from(1), U256::from(1));

        let mut account = Account::from(AccountInfo::from_balance(U256::from(10)));
        account.mark_touch();
        account.storage.insert(
            U256::from(2),
            crate::primitives::StorageSlot::new(U256::from(7)),
        );
        db.commit(HashMap::from_iter([(target, account)]));

        assert_eq!(db.storage_value(&target, &U256::from(1)), U256::from(1));
        assert_eq!(db.storage_value(&target, &U256::from(2)), U256::from(7));
        assert_eq!(db.account(&target).unwrap().info.balance, U256::from(10));
    }
}
