use clap::Parser;
use gasvm::{
    primitives::{hex, Address, Bytes, Env, RuleSet, RuleSetError, SpecId},
    EVMError, Evm, InMemoryDB,
};
use std::{convert::Infallible, time::Instant};
use tracing::info;

/// Errors of `run`.
#[derive(Debug, thiserror::Error)]
pub enum Errors {
    /// Bytecode is not hex.
    #[error("invalid bytecode")]
    InvalidBytecode,
    /// Input is not hex.
    #[error("invalid input")]
    InvalidInput,
    /// No hardfork has the given name.
    #[error("unknown hardfork {0}")]
    UnknownSpec(String),
    /// The EIP list can not be applied.
    #[error(transparent)]
    RuleSet(#[from] RuleSetError),
    /// Execution was aborted.
    #[error(transparent)]
    Evm(#[from] EVMError<Infallible>),
    /// The result could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Caller of the executed code.
pub const CALLER: Address = Address::with_last_byte(0xca);
/// Account the code runs as.
pub const TARGET: Address = Address::with_last_byte(0xaa);

/// Runs hex encoded bytecode and prints the execution result.
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Hex-encoded EVM bytecode to be executed
    bytecode: String,
    /// Hex-encoded input/calldata bytes
    #[arg(long, default_value = "")]
    input: String,
    /// Gas limit
    #[arg(long, default_value = "1000000")]
    gas_limit: u64,
    /// Hardfork name, for example `Istanbul` or `Berlin`
    #[arg(long, default_value = "Latest")]
    spec: String,
    /// Additional EIPs to enable, comma separated
    #[arg(long, value_delimiter = ',')]
    eips: Vec<u16>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl Cmd {
    /// Builds the rule set from `--spec` and `--eips`.
    pub fn rules(&self) -> Result<RuleSet, Errors> {
        let spec_id: SpecId = self
            .spec
            .parse()
            .map_err(|_| Errors::UnknownSpec(self.spec.clone()))?;
        Ok(RuleSet::new(spec_id).with_extra_eips(&self.eips)?)
    }

    /// Executes the bytecode and prints the result.
    pub fn run(&self) -> Result<(), Errors> {
        let code: Bytes = hex::decode(self.bytecode.trim())
            .map_err(|_| Errors::InvalidBytecode)?
            .into();
        let input: Bytes = hex::decode(self.input.trim())
            .map_err(|_| Errors::InvalidInput)?
            .into();
        let rules = self.rules()?;

        let mut env = Env::default();
        env.tx.caller = CALLER;
        env.tx.origin = CALLER;
        env.tx.transact_to = TARGET;

        let mut evm = Evm::new(InMemoryDB::new(), env, rules);
        let time = Instant::now();
        let result = evm.execute(code, input, self.gas_limit)?;
        info!(elapsed = ?time.elapsed(), gas_used = result.gas_used, "executed");

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("Outcome: {:?}", result.outcome);
            println!("Output: {}", result.output_data());
            println!("Gas used: {}", result.gas_used);
            println!("Gas remaining: {}", result.gas_remaining);
            println!("Refund: {} (paid {})", result.refund, result.capped_refund());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gasvm::primitives::Eips;

    #[test]
    fn parses_rules() {
        let cmd = Cmd::parse_from(["run", "00", "--spec", "Petersburg", "--eips", "2200,1884"]);
        let rules = cmd.rules().unwrap();
        assert_eq!(rules.spec_id, SpecId::PETERSBURG);
        assert!(rules.has(Eips::NET_SSTORE_2200 | Eips::SLOAD_1884));

        let cmd = Cmd::parse_from(["run", "00", "--spec", "Paris"]);
        assert!(matches!(cmd.rules(), Err(Errors::UnknownSpec(_))));
    }
}
