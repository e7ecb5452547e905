//! Instruction handlers, grouped by the part of the machine they touch.
//!
//! Static gas is charged by the interpreter loop before a handler runs, handlers only charge the
//! dynamic part of their cost.

#[macro_use]
mod macros;

pub(crate) mod arithmetic;
pub(crate) mod bitwise;
pub(crate) mod contract;
pub(crate) mod control;
pub(crate) mod host;
pub(crate) mod host_env;
pub(crate) mod i256;
pub(crate) mod memory;
pub(crate) mod stack;
pub(crate) mod system;
