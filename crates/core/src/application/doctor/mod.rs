// Doctor checks - fail-fast prechecks run before lifecycle commands

pub mod install_folder_permissions;

pub use install_folder_permissions::InstallFolderPermissions;

use crate::domain::TaskContext;
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// A single precheck
#[async_trait]
pub trait DoctorCheck: Send + Sync {
    fn title(&self) -> &'static str;

    /// Commands this check guards (`install`, `update`, `start`, ...)
    fn categories(&self) -> &'static [&'static str];

    async fn run(&self, ctx: &TaskContext) -> Result<()>;
}

/// Run every check registered for `category`, in order, stopping at the first failure
pub async fn run_checks(
    checks: &[&dyn DoctorCheck],
    category: &str,
    ctx: &TaskContext,
) -> Result<usize> {
    let mut ran = 0;

    for check in checks
        .iter()
        .filter(|check| check.categories().contains(&category))
    {
        info!(check = check.title(), category = %category, "Running check");
        check.run(ctx).await?;
        ran += 1;
    }

    Ok(ran)
}
