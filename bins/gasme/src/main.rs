use clap::Parser;
use gasme::cmd::{Error, MainCmd};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    MainCmd::parse().run()
}
