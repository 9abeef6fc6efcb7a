//! Libraries command - list libraries declared by the technology

use crate::cli::args::{LibrariesArgs, OutputFormat};
use crate::cli::TechContext;
use crate::error::TechResult;
use crate::tech::Library;
use console::style;

/// Execute the libraries command
pub async fn execute(args: LibrariesArgs, ctx: &TechContext) -> TechResult<()> {
    let libraries = ctx.tech.tech_defined_libraries();

    if libraries.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => println!("No libraries declared by {}", ctx.tech.name),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(libraries),
        OutputFormat::Json => print_json(libraries)?,
        OutputFormat::Plain => print_plain(libraries),
    }

    Ok(())
}

fn display_name(library: &Library) -> &str {
    library.name.as_deref().unwrap_or("(unnamed)")
}

fn print_table(libraries: &[Library]) {
    println!(
        "{:<24} {:<10} {:<40}",
        style("NAME").bold(),
        style("FILES").bold(),
        style("FIRST FILE").bold()
    );
    println!("{}", "-".repeat(74));

    for library in libraries {
        let files = library.file_fields();
        let first = files.first().map_or("-", |(_, path)| *path);
        println!("{:<24} {:<10} {:<40}", display_name(library), files.len(), first);
    }

    println!();
    println!("{} library(ies)", libraries.len());
}

fn print_json(libraries: &[Library]) -> TechResult<()> {
    let json = serde_json::to_string_pretty(libraries)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(libraries: &[Library]) {
    for library in libraries {
        println!("{}", display_name(library));
    }
}
