// Execution context handed to doctor-style tasks

use crate::domain::Instance;
use serde::{Deserialize, Serialize};

/// Host operating system facts relevant to task decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Platform {
    pub linux: bool,
    pub macos: bool,
    pub windows: bool,
}

impl Platform {
    /// Platform of the running binary
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        Self {
            linux: os == "linux",
            macos: os == "macos",
            windows: os == "windows",
        }
    }
}

/// Context for a single CLI command invocation
#[derive(Debug, Clone, Default)]
pub struct TaskContext {
    /// `--local` was passed (development install)
    pub local: bool,
    pub instance: Option<Instance>,
    pub platform: Platform,
    /// `Some(false)` when `--no-setup-linux-user` was passed
    pub setup_linux_user: Option<bool>,
}

impl TaskContext {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            ..Default::default()
        }
    }

    /// Local installs skip every system-level check
    pub fn is_local(&self) -> bool {
        self.local || self.instance.as_ref().is_some_and(Instance::is_local)
    }

    pub fn linux_user_setup_disabled(&self) -> bool {
        self.setup_linux_user == Some(false)
    }
}
