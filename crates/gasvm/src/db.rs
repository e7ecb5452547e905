//! [Database] interface and implementations.

mod emptydb;
mod in_memory_db;

pub use emptydb::EmptyDB;
pub use in_memory_db::{DbAccount, InMemoryDB};

use crate::primitives::{AccountInfo, Address, Bytes, State, B256, U256};
use auto_impl::auto_impl;

/// EVM database interface.
///
/// Only the account and storage lookups the interpreter needs. Errors abort execution with
/// [`EVMError::Database`](crate::EVMError::Database).
#[auto_impl(&mut, Box)]
pub trait Database {
    /// The database error type.
    type Error;

    /// Get basic account information.
    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error>;

    /// Get account code by its hash.
    fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytes, Self::Error>;

    /// Get storage value of address at index.
    fn storage(&mut self, address: Address, index: U256) -> Result<U256, Self::Error>;

    /// Get block hash by block number.
    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error>;
}

/// EVM database commit interface.
#[auto_impl(&mut, Box)]
pub trait DatabaseCommit {
    /// Commit changes to the database.
    fn commit(&mut self, changes: State);
}
