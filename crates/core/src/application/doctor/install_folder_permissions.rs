// Install folder permissions check

use super::DoctorCheck;
use crate::domain::TaskContext;
use crate::error::{AppError, Result};
use crate::port::{DirectoryChecker, SystemProbe};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

pub const TASK_TITLE: &str = "Checking current folder permissions";

const CATEGORIES: &[&str] = &["install", "update", "start"];

const HELP_URL: &str = "https://ghost.org/docs/install/ubuntu/#create-a-directory";

const ANCESTOR_REMEDY: &str = "run `ghost install`";

/// Verifies the install directory (the instance's, else the working
/// directory) is writable and, for supervised Linux installs, that every
/// ancestor directory is traversable
pub struct InstallFolderPermissions {
    system: Arc<dyn SystemProbe>,
    checker: Arc<dyn DirectoryChecker>,
}

impl InstallFolderPermissions {
    pub fn new(system: Arc<dyn SystemProbe>, checker: Arc<dyn DirectoryChecker>) -> Self {
        Self { system, checker }
    }
}

#[async_trait]
impl DoctorCheck for InstallFolderPermissions {
    fn title(&self) -> &'static str {
        TASK_TITLE
    }

    fn categories(&self) -> &'static [&'static str] {
        CATEGORIES
    }

    async fn run(&self, ctx: &TaskContext) -> Result<()> {
        let dir = match &ctx.instance {
            Some(instance) => instance.dir.clone(),
            None => self.system.current_dir()?,
        };

        if let Err(e) = self.system.check_access(&dir) {
            warn!(dir = %dir.display(), error = %e, "Install directory is not writable");
            return Err(AppError::configuration(
                format!(
                    "The directory {} is not writable by your user. You must grant write access and try again.",
                    dir.display()
                ),
                Some(HELP_URL.to_string()),
                Some(TASK_TITLE),
            ));
        }

        if ctx.is_local() || !ctx.platform.linux || ctx.linux_user_setup_disabled() {
            debug!(
                local = ctx.is_local(),
                linux = ctx.platform.linux,
                "Skipping ancestor directory check"
            );
            return Ok(());
        }

        self.checker
            .check_directory_and_above(&dir, ANCESTOR_REMEDY, TASK_TITLE)
            .await
    }
}
