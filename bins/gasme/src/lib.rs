//! Command line runner of gasvm.
pub mod cmd;
