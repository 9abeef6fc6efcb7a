//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// vlsitech - technology plugin inspector
///
/// Loads a technology description and resolves its library paths
/// against installs, extracted tarballs and library prefixes.
#[derive(Parser, Debug)]
#[command(name = "vlsitech")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "VLSITECH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Technology directory (contains <name>.tech.json or <name>.tech.yml)
    #[arg(long, global = true, env = "VLSITECH_TECH_DIR")]
    pub tech_dir: Option<PathBuf>,

    /// Technology name; looked up in the configured search paths unless
    /// --tech-dir is given (defaults to the directory name)
    #[arg(long, global = true, env = "VLSITECH_TECH")]
    pub tech: Option<String>,

    /// Settings files (JSON, YAML or TOML), later files take precedence
    #[arg(short, long = "settings", global = true)]
    pub settings: Vec<PathBuf>,

    /// Override a single setting (KEY=VALUE)
    #[arg(long = "set", global = true, value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Cache directory for this technology's extracted tarballs
    #[arg(long, global = true, env = "VLSITECH_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve library-relative paths to absolute paths
    Resolve(ResolveArgs),

    /// Check installs or extract tarballs so technology files are available
    Extract,

    /// Check that pre-installed directories exist
    Check,

    /// List libraries declared by the technology
    Libraries(LibrariesArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Paths to resolve, e.g. vendor/lef/cells.lef
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Resolve in the scope of this library
    #[arg(short, long)]
    pub library: Option<String>,

    /// Extra library prefix (NAME=PATH)
    #[arg(long, value_parser = parse_key_value)]
    pub prefix: Vec<(String, String)>,
}

/// Arguments for the libraries command
#[derive(Parser, Debug)]
pub struct LibrariesArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Output format for list commands
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Plain,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

/// Parse a KEY=VALUE pair
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE format: no '=' found in '{s}'"))?;
    if pos == 0 {
        return Err(format!("invalid KEY=VALUE format: empty key in '{s}'"));
    }
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}
