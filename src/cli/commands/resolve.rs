//! Resolve command - map library-relative paths to absolute paths

use crate::cli::args::ResolveArgs;
use crate::cli::TechContext;
use crate::error::{TechError, TechResult};
use crate::tech::{Library, PathPrefix, PathResolver};

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, ctx: &TechContext) -> TechResult<()> {
    let library = scoped_library(&args, ctx)?;
    let cache = ctx.cache_if_needed()?;
    let resolver = PathResolver::new(&ctx.tech, &ctx.settings, cache.as_ref());

    for path in &args.paths {
        let resolved = resolver.resolve(path, library.as_ref())?;
        println!("{}", resolved.display());
    }

    Ok(())
}

/// Copy of the selected library with any `--prefix` entries attached
fn scoped_library(args: &ResolveArgs, ctx: &TechContext) -> TechResult<Option<Library>> {
    let mut library = match args.library {
        Some(ref name) => Some(ctx.tech.library(name).cloned().ok_or_else(|| {
            TechError::User(format!(
                "Library '{}' is not declared by technology {}",
                name, ctx.tech.name
            ))
        })?),
        None if !args.prefix.is_empty() => Some(Library::default()),
        None => None,
    };

    if let Some(ref mut lib) = library {
        for (prefix, path) in &args.prefix {
            lib.add_extra_prefix(PathPrefix::new(prefix.clone(), path));
        }
    }

    Ok(library)
}
