use clap::Parser;
use sim::{AnyResult, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> AnyResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    sim::run(&Cli::parse())
}
