//! Extract command - make technology files available on disk

use crate::cli::TechContext;
use crate::error::{TechError, TechResult};
use console::style;

/// Execute the extract command
pub async fn execute(ctx: &TechContext) -> TechResult<()> {
    let cache = ctx.cache()?;

    if ctx.tech.extract_technology_files(&ctx.settings, &cache)? {
        println!(
            "{} Technology files for {} are available",
            style("[OK]").green(),
            ctx.tech.name
        );
        return Ok(());
    }

    if ctx.tech.config.installs.is_some() {
        Err(TechError::MissingInstall {
            technology: ctx.tech.name.clone(),
        })
    } else {
        Err(TechError::User(format!(
            "Technology {} specified neither tarballs nor installs",
            ctx.tech.name
        )))
    }
}
