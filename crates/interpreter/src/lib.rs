//! # gasvm-interpreter
//!
//! Bytecode interpreter of gasvm: stack, memory, the opcode table and the gas schedule that
//! meters every instruction.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub mod gas;
mod host;
mod inner_models;
mod instruction_result;
#[macro_use]
mod instructions;
mod interpreter;
pub mod opcode;

// Reexport primary types.
pub use gas::Gas;
pub use host::{AccountLoad, DummyHost, Host, SStoreResult, SelfDestructResult, StateLoad};
pub use inner_models::*;
pub use instruction_result::*;
pub use interpreter::{
    analysis, AnalyzedBytecode, Contract, Interpreter, JumpTable, Memory, Stack,
};
pub use opcode::{
    make_instruction_table, Instruction, InstructionTable, OpCode, OpCodeInfo,
    OPCODE_INFO_JUMPTABLE,
};
#[doc(hidden)]
pub use primitives;
