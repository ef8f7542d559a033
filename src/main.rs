use anyhow::Result;
use clap::Parser;
use config_keys::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
