// System probe implementation
// reason: nix for access(2) and passwd lookups without shelling out
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use ghostctl_core::domain::Platform;
use ghostctl_core::error::{AppError, Result};
use ghostctl_core::port::system_probe::SystemProbe;

/// Host filesystem and platform facts
pub struct SystemProbeImpl {
    ghost_user: String,
}

impl SystemProbeImpl {
    /// # Arguments
    /// * `ghost_user` - System user a supervised install runs as
    pub fn new(ghost_user: impl Into<String>) -> Self {
        Self {
            ghost_user: ghost_user.into(),
        }
    }

    #[cfg(unix)]
    fn lookup_uid(&self) -> Result<Option<u32>> {
        use nix::unistd::User;

        let user = User::from_name(&self.ghost_user).map_err(|e| AppError::Io(e.into()))?;
        Ok(user.map(|u| u.uid.as_raw()))
    }

    #[cfg(not(unix))]
    fn lookup_uid(&self) -> Result<Option<u32>> {
        Ok(None)
    }
}

impl Default for SystemProbeImpl {
    fn default() -> Self {
        Self::new("ghost")
    }
}

impl SystemProbe for SystemProbeImpl {
    fn platform(&self) -> Platform {
        Platform::current()
    }

    fn current_dir(&self) -> Result<PathBuf> {
        Ok(std::env::current_dir()?)
    }

    #[cfg(unix)]
    fn check_access(&self, path: &Path) -> io::Result<()> {
        use nix::unistd::{access, AccessFlags};

        access(path, AccessFlags::R_OK | AccessFlags::W_OK).map_err(io::Error::from)
    }

    #[cfg(not(unix))]
    fn check_access(&self, path: &Path) -> io::Result<()> {
        let metadata = std::fs::metadata(path)?;
        if metadata.permissions().readonly() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        Ok(())
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn setup_marker(&self, dir: &Path) -> Result<Option<u32>> {
        let Some(uid) = self.lookup_uid()? else {
            debug!(user = %self.ghost_user, "No such user");
            return Ok(None);
        };

        let content = dir.join("content");
        let metadata = match std::fs::symlink_metadata(&content) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %content.display(), "Content directory missing");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let owner = owner_uid(&metadata);
        debug!(user = %self.ghost_user, uid, owner = ?owner, "Resolved setup marker");

        Ok((owner == Some(uid)).then_some(uid))
    }
}

#[cfg(unix)]
fn owner_uid(metadata: &std::fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.uid())
}

#[cfg(not(unix))]
fn owner_uid(_metadata: &std::fs::Metadata) -> Option<u32> {
    None
}
