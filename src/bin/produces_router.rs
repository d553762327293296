use clap::Parser;
use produces_router::cli::{run_cli, Cli};
use produces_router::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    init_logging(&LogConfig::from_env())?;
    run_cli(Cli::parse())
}
