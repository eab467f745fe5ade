// Directory Checker Port
// Verifies a directory and all of its ancestors are usable by the runtime user

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait DirectoryChecker: Send + Sync {
    /// Check `dir` and every ancestor up to the filesystem root
    ///
    /// # Arguments
    /// * `dir` - Directory to start from
    /// * `remedy` - Alternative the operator is offered (e.g. "run `ghost install`")
    /// * `task` - Task label attached to any error
    ///
    /// # Errors
    /// - AppError::Configuration naming the first offending directory
    async fn check_directory_and_above(&self, dir: &Path, remedy: &str, task: &str) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// A recorded directory check
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CheckCall {
        pub dir: PathBuf,
        pub remedy: String,
        pub task: String,
    }

    /// Mock checker that always passes and counts calls
    #[derive(Default)]
    pub struct MockDirectoryChecker {
        calls: Arc<Mutex<Vec<CheckCall>>>,
    }

    impl MockDirectoryChecker {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<CheckCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DirectoryChecker for MockDirectoryChecker {
        async fn check_directory_and_above(
            &self,
            dir: &Path,
            remedy: &str,
            task: &str,
        ) -> Result<()> {
            self.calls.lock().unwrap().push(CheckCall {
                dir: dir.to_path_buf(),
                remedy: remedy.to_string(),
                task: task.to_string(),
            });
            Ok(())
        }
    }
}
