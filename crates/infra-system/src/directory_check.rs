// Ancestor directory permission check
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, warn};

use ghostctl_core::error::{AppError, Result};
use ghostctl_core::port::DirectoryChecker;

/// "other" read bit
const OTHERS_READ: u32 = 0o004;

/// Requires every directory from `dir` up to `/` to be readable by others,
/// so the dedicated system user can reach the install
#[derive(Debug, Default)]
pub struct AncestorDirectoryChecker;

impl AncestorDirectoryChecker {
    pub fn new() -> Self {
        Self
    }

    fn check_one(&self, dir: &Path, remedy: &str, task: &str) -> Result<()> {
        let metadata = std::fs::symlink_metadata(dir)?;

        if others_can_read(&metadata) {
            return Ok(());
        }

        warn!(dir = %dir.display(), "Directory is not readable by others");

        Err(AppError::configuration(
            format!(
                "The directory {} is not readable by other users on the system.\n\
                 This can cause issues with the CLI, you must either make this directory readable by others or {} in another location.",
                dir.display(),
                remedy
            ),
            None,
            Some(task),
        ))
    }
}

#[async_trait]
impl DirectoryChecker for AncestorDirectoryChecker {
    async fn check_directory_and_above(&self, dir: &Path, remedy: &str, task: &str) -> Result<()> {
        for ancestor in dir.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            debug!(dir = %ancestor.display(), "Checking directory permissions");
            self.check_one(ancestor, remedy, task)?;
        }

        Ok(())
    }
}

#[cfg(unix)]
fn others_can_read(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & OTHERS_READ != 0
}

#[cfg(not(unix))]
fn others_can_read(_metadata: &std::fs::Metadata) -> bool {
    true
}
