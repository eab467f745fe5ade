// Host facts port
use crate::domain::Platform;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// System probe port for filesystem and platform facts
pub trait SystemProbe: Send + Sync {
    /// Operating system family of this host
    fn platform(&self) -> Platform;

    /// Working directory of the current process
    fn current_dir(&self) -> Result<PathBuf>;

    /// Succeeds if the current user can read and write `path`
    fn check_access(&self, path: &Path) -> std::io::Result<()>;

    fn path_exists(&self, path: &Path) -> bool;

    /// Setup marker for an install directory
    ///
    /// # Returns
    /// The uid of the dedicated system user when it exists and owns the
    /// instance's `content` directory, `None` otherwise
    fn setup_marker(&self, dir: &Path) -> Result<Option<u32>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// Mock SystemProbe for testing
    pub struct MockSystemProbe {
        platform: Platform,
        cwd: PathBuf,
        writable: bool,
        marker: Option<u32>,
        existing: Arc<Mutex<HashSet<PathBuf>>>,
    }

    impl MockSystemProbe {
        pub fn new(platform: Platform, cwd: impl Into<PathBuf>) -> Self {
            Self {
                platform,
                cwd: cwd.into(),
                writable: true,
                marker: None,
                existing: Arc::new(Mutex::new(HashSet::new())),
            }
        }

        pub fn linux(cwd: impl Into<PathBuf>) -> Self {
            Self::new(Platform::from_os("linux"), cwd)
        }

        pub fn read_only(mut self) -> Self {
            self.writable = false;
            self
        }

        pub fn with_marker(mut self, uid: u32) -> Self {
            self.marker = Some(uid);
            self
        }

        pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
            self.existing.lock().unwrap().insert(path.into());
            self
        }
    }

    impl SystemProbe for MockSystemProbe {
        fn platform(&self) -> Platform {
            self.platform
        }

        fn current_dir(&self) -> Result<PathBuf> {
            Ok(self.cwd.clone())
        }

        fn check_access(&self, _path: &Path) -> std::io::Result<()> {
            if self.writable {
                Ok(())
            } else {
                Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "permission denied",
                ))
            }
        }

        fn path_exists(&self, path: &Path) -> bool {
            self.existing.lock().unwrap().contains(path)
        }

        fn setup_marker(&self, _dir: &Path) -> Result<Option<u32>> {
            Ok(self.marker)
        }
    }
}
