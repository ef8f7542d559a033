use crate::cli::Context;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {}

pub fn execute(_args: GenerateArgs, context: &Context) -> Result<()> {
    let manager = context.open_manager()?;
    let config = manager.get();

    context.output.success(&format!(
        "Generated {} types into {}",
        config.schema().len(),
        manager.artifact_path().display()
    ));
    context.output.key_value("source:", &manager.source_path().display().to_string(), false);
    context.output.key_value("root type:", config.type_name(), true);
    context.output.verbose(&format!("pipeline state: {}", manager.state()));
    Ok(())
}
