//! Windsock CLI - builds the climb forecast site model from cached data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "windsock-cli",
    version,
    about = "Wind-adjusted climb forecasts for cyclists"
)]
struct Cli {
    #[command(subcommand)]
    command: windsock_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("starting windsock-cli");
    windsock_cmd::run(cli.command)
}
