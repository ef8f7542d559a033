use crate::cli::Context;
use crate::templates;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug, Default)]
pub struct ConsolidateArgs {
    /// Let template values replace values already in the document
    #[arg(long)]
    pub overwrite: bool,
}

pub fn execute(args: ConsolidateArgs, context: &Context) -> Result<()> {
    let modules_dir = context.modules_dir();
    let found = templates::discover(&modules_dir, &context.settings.template_file);
    if found.is_empty() {
        context.output.warning(&format!(
            "No {} files found below {}",
            context.settings.template_file,
            modules_dir.display()
        ));
        return Ok(());
    }

    let fragments = templates::load_fragments(&found)?;
    let manager = context.open_manager()?;
    let summary = templates::consolidate_into(
        &manager,
        &fragments,
        !args.overwrite,
        &context.settings.backup_suffix,
    )?;

    if let Some(backup) = &summary.backup {
        context.output.info(&format!("Created backup: {}", backup.display()));
    }
    context.output.section_header("Configuration Summary:");
    for (module, items) in &summary.modules {
        context.output.table_row(module, &format!("{items} items"));
    }
    for module in &summary.skipped {
        context.output.warning(&format!("{module}: no configuration data found"));
    }
    context.output.count("✔", "Modules processed", summary.modules.len());
    Ok(())
}
