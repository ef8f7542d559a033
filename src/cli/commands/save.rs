use crate::cli::Context;
use anyhow::{Context as _, Result, bail};
use clap::Args;
use serde_json::Value;

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// JSON object to deep-merge into the document
    pub update: String,
}

pub fn execute(args: SaveArgs, context: &Context) -> Result<()> {
    let update: Value = serde_json::from_str(&args.update).context("Update is not valid JSON")?;
    let Value::Object(map) = &update else {
        bail!("Update must be a JSON object");
    };
    let keys: Vec<String> = map.keys().cloned().collect();

    let manager = context.open_manager()?;
    let config = manager.save(update)?;

    context.output.success(&format!(
        "Saved {} and regenerated {} types",
        manager.source_path().display(),
        config.schema().len()
    ));
    for key in keys {
        context.output.list_item(&key);
    }
    Ok(())
}
