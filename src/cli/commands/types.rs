use crate::cli::Context;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug, Default)]
pub struct TypesArgs {}

pub fn execute(_args: TypesArgs, context: &Context) -> Result<()> {
    let manager = context.open_manager()?;
    let config = manager.get();
    let schema = config.schema();

    for record in schema.iter() {
        println!("{}\t{}", record.name, record.path);
    }
    context.output.verbose(&format!(
        "{} types written to {}",
        schema.len(),
        manager.artifact_path().display()
    ));
    Ok(())
}
