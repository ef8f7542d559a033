use crate::cli::Context;
use crate::config::{ConfigFormat, formats};
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output format: json, toml, yaml
    #[arg(short, long, default_value = "json")]
    pub format: String,
}

pub fn execute(args: ShowArgs, context: &Context) -> Result<()> {
    let format: ConfigFormat = args.format.parse()?;
    let manager = context.open_manager()?;

    let output = formats::export_highlighted(&manager.raw(), format)?;
    println!("{}", output.trim_end());
    Ok(())
}
