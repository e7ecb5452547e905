/// `gasme memory-cost`.
pub mod memory_cost;
/// `gasme run`.
pub mod run;

use clap::Parser;

/// Runs EVM bytecode and reports its gas usage.
#[derive(Parser, Debug)]
#[command(infer_subcommands = true)]
pub enum MainCmd {
    /// Execute bytecode against an empty in-memory database.
    Run(run::Cmd),
    /// Print the cost of growing empty memory to a size.
    MemoryCost(memory_cost::Cmd),
}

/// Failure of a subcommand.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `run` failed.
    #[error(transparent)]
    Run(#[from] run::Errors),
    /// `memory-cost` failed.
    #[error(transparent)]
    MemoryCost(#[from] memory_cost::Errors),
}

impl MainCmd {
    /// Runs the selected subcommand.
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Self::Run(cmd) => cmd.run().map_err(Into::into),
            Self::MemoryCost(cmd) => cmd.run().map_err(Into::into),
        }
    }
}
