//! flu-cli - Command line tool for querying influenza forecast hub data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "flu-cli",
    version,
    about = "Influenza forecast hub dashboard data"
)]
struct Cli {
    #[command(subcommand)]
    command: flu_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    flu_cmd::run(cli.command)
}
