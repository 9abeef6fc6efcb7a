//! External archive tools
//!
//! Extraction and permission repair shell out to `tar` and `chmod`. The
//! `ArchiveTool` trait keeps the cache independent of the host tools so
//! tests can count invocations without touching real archives.

use crate::error::{TechError, TechResult};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Operations the archive cache needs from the host
pub trait ArchiveTool: Send + Sync {
    /// Extract `archive` into the existing directory `dest`
    fn extract(&self, archive: &Path, dest: &Path) -> TechResult<()>;

    /// Recursively grant the invoking user read/write/execute on `dir`
    fn grant_user_access(&self, dir: &Path) -> TechResult<()>;
}

/// `tar` + `chmod` from the host
#[derive(Debug, Clone, Default)]
pub struct SystemArchiveTool;

impl SystemArchiveTool {
    pub fn new() -> Self {
        Self
    }

    /// Run a tool to completion, capturing stderr
    fn run(&self, program: &str, args: &[&str]) -> TechResult<()> {
        let command = format!("{} {}", program, args.join(" "));
        debug!("Executing: {}", command);

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| TechError::command_failed(&command, e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(TechError::ToolFailed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl ArchiveTool for SystemArchiveTool {
    fn extract(&self, archive: &Path, dest: &Path) -> TechResult<()> {
        let archive = archive.to_string_lossy();
        let dest = dest.to_string_lossy();
        self.run("tar", &["-xf", &archive, "-C", &dest])
    }

    fn grant_user_access(&self, dir: &Path) -> TechResult<()> {
        let dir = dir.to_string_lossy();
        self.run("chmod", &["-R", "u+rwX", &dir])
    }
}
