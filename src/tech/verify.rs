//! Install verification

use crate::error::TechResult;
use crate::settings::SettingsLookup;
use crate::tech::Technology;
use tracing::{debug, error};

/// Check that every pre-installed directory the technology declares exists.
///
/// Installs with an empty `base_var` point at the technology directory and
/// always count as present. Stops at the first missing directory, logs it
/// and returns `false`. A `base_var` missing from the settings is an error.
pub fn check_installs(tech: &Technology, settings: &dyn SettingsLookup) -> TechResult<bool> {
    for install in tech.config.installs.iter().flatten() {
        if install.base_var.is_empty() {
            continue;
        }

        let install_path = tech.base_dir(&install.base_var, settings)?;
        if !install_path.exists() {
            error!(
                "installs {} for technology {} does not exist",
                install_path.display(),
                tech.name
            );
            return Ok(false);
        }
        debug!("Found install {} at {}", install.path, install_path.display());
    }
    Ok(true)
}
