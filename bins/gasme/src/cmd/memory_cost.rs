use clap::Parser;
use gasvm::interpreter::gas::{memory_expansion_cost, GasOverflow};

/// Errors of `memory-cost`.
#[derive(Debug, thiserror::Error)]
pub enum Errors {
    /// The size can not be addressed.
    #[error("memory size {0} is past the limit")]
    Overflow(u64),
}

/// Prints the gas needed to expand empty memory so that `size` bytes are addressable.
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Memory size in bytes, decimal or `0x` prefixed hex.
    #[arg(value_parser = parse_size)]
    size: u64,
}

impl Cmd {
    /// Prints the cost.
    pub fn run(&self) -> Result<(), Errors> {
        println!("{}", cost(self.size)?);
        Ok(())
    }
}

/// Expansion cost from empty memory.
pub fn cost(size: u64) -> Result<u64, Errors> {
    match memory_expansion_cost(0, size) {
        Ok(Some((_, cost))) => Ok(cost),
        Ok(None) => Ok(0),
        Err(GasOverflow) => Err(Errors::Overflow(size)),
    }
}

fn parse_size(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit() {
        assert_eq!(cost(0).unwrap(), 0);
        assert_eq!(cost(32).unwrap(), 3);
        assert_eq!(cost(0x1f_ffff_ffe0).unwrap(), 36028809887088637);
        assert!(matches!(cost(0x1f_ffff_ffe1), Err(Errors::Overflow(_))));
    }

    #[test]
    fn size_formats() {
        assert_eq!(parse_size("0x20"), Ok(32));
        assert_eq!(parse_size("32"), Ok(32));
        assert!(parse_size("0xzz").is_err());
    }
}
