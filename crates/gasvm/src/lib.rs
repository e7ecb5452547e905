//! # gasvm
//!
//! Gas metered execution of EVM bytecode. [`Evm`] hosts the frames run by the
//! [`interpreter`], keeping the transaction journal, the storage ledger used by net metered
//! `SSTORE` and the refund counter.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub mod db;
mod error;
mod evm;
mod journaled_state;
mod ledger;
mod transfer;

pub use db::{Database, DatabaseCommit, EmptyDB, InMemoryDB};
pub use error::EVMError;
pub use evm::{execute, Evm};
pub use journaled_state::{JournalCheckpoint, JournalEntry, JournaledState};
pub use ledger::StorageLedger;
pub use transfer::{BalanceTransfer, NoopTransfer, TransferHooks};

// reexport dependencies
pub use interpreter;
pub use primitives;
