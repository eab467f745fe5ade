//! Settings loading: defaults, user config, instance config, environment

use config::{Config, Environment, File};
use directories::ProjectDirs;
use ghostctl_core::config::Settings;
use ghostctl_core::error::{AppError, Result};
use std::path::{Path, PathBuf};

/// Per-instance settings file, relative to the instance directory
pub const INSTANCE_SETTINGS_FILE: &str = ".ghostctl.toml";

const ENV_PREFIX: &str = "GHOSTCTL";

/// User-level settings file (`~/.config/ghostctl/config.toml` on Linux)
pub fn user_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "ghost", "ghostctl").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load settings, later sources overriding earlier ones
///
/// # Arguments
/// * `instance_dir` - Directory of the managed instance
/// * `explicit` - `--config` file, required to exist when given
pub fn load(instance_dir: &Path, explicit: Option<&Path>) -> Result<Settings> {
    let mut builder = Config::builder();

    if let Some(path) = user_settings_path() {
        builder = builder.add_source(File::from(path).required(false));
    }

    builder = builder.add_source(File::from(instance_dir.join(INSTANCE_SETTINGS_FILE)).required(false));

    if let Some(path) = explicit {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .and_then(|config| config.try_deserialize::<Settings>())
        .map_err(|e| AppError::Settings(e.to_string()))
}

/// Expand `~` and environment variables in a user-supplied path
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    shellexpand::full(raw)
        .map(|expanded| PathBuf::from(expanded.into_owned()))
        .map_err(|e| AppError::Settings(format!("Cannot expand path '{}': {}", raw, e)))
}
