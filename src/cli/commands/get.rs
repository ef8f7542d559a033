use crate::accessor::TypedValue;
use crate::cli::Context;
use anyhow::{Result, anyhow};
use clap::Args;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Dotted key path, e.g. `database.host` or `servers.0.name`
    pub path: String,
}

pub fn execute(args: GetArgs, context: &Context) -> Result<()> {
    let manager = context.open_manager()?;
    let config = manager.get();

    let value = config
        .lookup(&args.path)
        .ok_or_else(|| anyhow!("Configuration key '{}' not found", args.path))?;

    match value {
        TypedValue::String(text) => println!("{text}"),
        TypedValue::Integer(n) => println!("{n}"),
        TypedValue::Float(n) => println!("{n}"),
        TypedValue::Boolean(flag) => println!("{flag}"),
        TypedValue::Absent => println!("null"),
        other => println!("{}", serde_json::to_string_pretty(&other.to_json())?),
    }
    Ok(())
}
