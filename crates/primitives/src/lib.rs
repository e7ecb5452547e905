//! # gasvm-primitives
//!
//! Types shared by the gasvm interpreter and executor: hardfork identifiers, the rule set that
//! selects gas schedules, the execution environment, account state and execution results.
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub mod constants;
pub mod env;
pub mod hardfork;
pub mod result;
pub mod rules;
pub mod schedule;
pub mod state;

pub use alloy_primitives::{
    self, address, b256, bytes, fixed_bytes, hex, hex_literal, keccak256,
    map::{hash_map, HashMap, HashSet},
    ruint, uint, Address, Bytes, FixedBytes, Log, LogData, B256, I256, U256,
};
pub use constants::*;
pub use env::*;
pub use hardfork::SpecId;
pub use result::*;
pub use rules::{Eips, RuleSet, RuleSetError};
pub use schedule::{ForkCondition, ForkSchedule};
pub use state::*;
