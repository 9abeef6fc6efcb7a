//! Check command - verify pre-installed directories

use crate::cli::TechContext;
use crate::error::{TechError, TechResult};
use crate::tech::check_installs;
use console::style;

/// Execute the check command
pub async fn execute(ctx: &TechContext) -> TechResult<()> {
    if !check_installs(&ctx.tech, &ctx.settings)? {
        return Err(TechError::MissingInstall {
            technology: ctx.tech.name.clone(),
        });
    }

    let count = ctx.tech.config.installs.as_ref().map_or(0, Vec::len);
    println!(
        "{} {} install(s) present for {}",
        style("[OK]").green(),
        count,
        ctx.tech.name
    );
    Ok(())
}
