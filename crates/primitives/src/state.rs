//! Account state touched by an execution.
use crate::{keccak256, Address, Bytes, HashMap, B256, KECCAK_EMPTY, U256};
use bitflags::bitflags;

/// Account loaded into the journal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Account {
    /// Balance, nonce and code.
    pub info: AccountInfo,
    /// Storage slots touched in this transaction.
    pub storage: Storage,
    /// Account status flags.
    pub status: AccountStatus,
}

bitflags! {
    /// What happened to an account during the transaction.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct AccountStatus: u8 {
        /// Account was created in this transaction, storage is not read from the database.
        const Created = 0b0000_0001;
        /// Account is marked for self destruct.
        const SelfDestructed = 0b0000_0010;
        /// Only touched accounts are written back to the database.
        const Touched = 0b0000_0100;
        /// Account did not exist when it was loaded.
        const LoadedAsNotExisting = 0b0000_1000;
    }
}

/// Accounts changed by a transaction.
pub type State = HashMap<Address, Account>;
/// Storage slots of an account.
pub type Storage = HashMap<U256, StorageSlot>;

impl Account {
    /// Account that is not present in the database.
    pub fn new_not_existing() -> Self {
        Self {
            info: AccountInfo::default(),
            storage: HashMap::default(),
            status: AccountStatus::LoadedAsNotExisting,
        }
    }

    /// Was destroyed in this transaction.
    pub fn is_selfdestructed(&self) -> bool {
        self.status.contains(AccountStatus::SelfDestructed)
    }

    /// Marks the account as destroyed.
    pub fn mark_selfdestruct(&mut self) {
        self.status |= AccountStatus::SelfDestructed;
    }

    /// Clears the destroyed flag.
    pub fn unmark_selfdestruct(&mut self) {
        self.status -= AccountStatus::SelfDestructed;
    }

    /// Was created in this transaction.
    pub fn is_created(&self) -> bool {
        self.status.contains(AccountStatus::Created)
    }

    /// Marks the account as created.
    pub fn mark_created(&mut self) {
        self.status |= AccountStatus::Created;
    }

    /// Clears the created flag.
    pub fn unmark_created(&mut self) {
        self.status -= AccountStatus::Created;
    }

    /// Will be written back to the database.
    pub fn is_touched(&self) -> bool {
        self.status.contains(AccountStatus::Touched)
    }

    /// Marks the account as touched.
    pub fn mark_touch(&mut self) {
        self.status |= AccountStatus::Touched;
    }

    /// Clears the touched flag.
    pub fn unmark_touch(&mut self) {
        self.status -= AccountStatus::Touched;
    }

    /// Did not exist in the database.
    pub fn is_loaded_as_not_existing(&self) -> bool {
        self.status.contains(AccountStatus::LoadedAsNotExisting)
    }

    /// Empty as defined by EIP-161: no code, zero nonce and zero balance.
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }
}

impl From<AccountInfo> for Account {
    fn from(info: AccountInfo) -> Self {
        Self {
            info,
            storage: HashMap::default(),
            status: AccountStatus::empty(),
        }
    }
}

/// Value of a storage slot as seen by the running transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageSlot {
    /// Value after the writes of the transaction so far.
    pub present_value: U256,
}

impl StorageSlot {
    /// Slot holding `present_value`.
    pub fn new(present_value: U256) -> Self {
        Self { present_value }
    }

    /// Returns the present value.
    pub fn present_value(&self) -> U256 {
        self.present_value
    }
}

/// AccountInfo account information.
#[derive(Clone, Debug, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountInfo {
    /// Account balance.
    pub balance: U256,
    /// Account nonce.
    pub nonce: u64,
    /// Hash of `code`.
    pub code_hash: B256,
    /// If `None`, `Database::code_by_hash` is used to fetch it when needed.
    pub code: Option<Bytes>,
}

impl Default for AccountInfo {
    fn default() -> Self {
        Self {
            balance: U256::ZERO,
            nonce: 0,
            code_hash: KECCAK_EMPTY,
            code: Some(Bytes::new()),
        }
    }
}

impl PartialEq for AccountInfo {
    fn eq(&self, other: &Self) -> bool {
        self.balance == other.balance
            && self.nonce == other.nonce
            && self.code_hash == other.code_hash
    }
}

impl AccountInfo {
    /// Account info with the given code, its hash is computed.
    pub fn new(balance: U256, nonce: u64, code: Bytes) -> Self {
        Self {
            balance,
            nonce,
            code_hash: hash_code(&code),
            code: Some(code),
        }
    }

    /// Account holding only the given balance.
    pub fn from_balance(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// Empty as defined by EIP-161.
    pub fn is_empty(&self) -> bool {
        let code_empty = self.code_hash == KECCAK_EMPTY || self.code_hash == B256::ZERO;
        code_empty && self.balance == U256::ZERO && self.nonce == 0
    }

    /// Returns `true` if the code hash is not the empty hash.
    pub fn has_code(&self) -> bool {
        !(self.code_hash == KECCAK_EMPTY || self.code_hash == B256::ZERO)
    }

    /// Replaces the code and its hash.
    pub fn set_code(&mut self, code: Bytes) {
        self.code_hash = hash_code(&code);
        self.code = Some(code);
    }
}

/// Keccak256 of the code, [`KECCAK_EMPTY`] for empty code.
#[inline]
pub fn hash_code(code: &[u8]) -> B256 {
    if code.is_empty() {
        KECCAK_EMPTY
    } else {
        keccak256(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes;

    #[test]
    fn emptiness() {
        assert!(AccountInfo::default().is_empty());
        assert!(!AccountInfo::from_balance(U256::from(1)).is_empty());

        let info = AccountInfo::new(U256::ZERO, 0, bytes!("00"));
        assert!(info.has_code());
        assert!(!info.is_empty());
    }

    #[test]
    fn status_flags() {
        let mut account = Account::new_not_existing();
        assert!(account.is_loaded_as_not_existing());
        account.mark_touch();
        account.mark_selfdestruct();
        assert!(account.is_touched() && account.is_selfdestructed());
        account.unmark_selfdestruct();
        assert!(!account.is_selfdestructed());
        assert!(account.is_touched());
    }
}
