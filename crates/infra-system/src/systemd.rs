// Systemd process manager
// reason: systemctl has no structured status output we rely on, so query
// results are classified from its human-readable text
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use ghostctl_core::config::Settings;
use ghostctl_core::domain::{Instance, ServiceName};
use ghostctl_core::error::{AppError, Result};
use ghostctl_core::port::{
    CommandRunner, CommandSpec, EnsureStartedOptions, ExecutionError, ProcessManager,
    ProcessManagerProvider, ReadinessProbe, SystemProbe,
};

/// Printed by `systemctl is-enabled` for units that are not enabled, or when
/// the unit file cannot be read
const NOT_ENABLED_MARKERS: &[&str] = &["disabled", "Failed to get unit file state"];

/// Printed by `systemctl is-active` for stopped or still-starting units
const NOT_RUNNING_MARKERS: &[&str] = &["inactive", "activating"];

const SETUP_LINUX_USER_MESSAGE: &str = "Systemd process manager has not been set up. Run `ghost setup linux-user systemd` and try again.";

const SETUP_SYSTEMD_MESSAGE: &str =
    "Systemd process manager has not been set up. Run `ghost setup systemd` and try again.";

/// Binaries and paths the systemd adapter works with
#[derive(Debug, Clone)]
pub struct SystemdConfig {
    pub supervisor: String,
    pub notifier: String,
    pub unit_dir: PathBuf,
    /// How long to stay alive after notifying systemd
    pub notify_delay: Duration,
}

impl From<&Settings> for SystemdConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            supervisor: settings.supervisor.clone(),
            notifier: settings.notifier.clone(),
            unit_dir: settings.unit_dir.clone(),
            notify_delay: settings.notify_delay(),
        }
    }
}

impl Default for SystemdConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// Process manager backed by systemd units named `ghost_<instance>`
pub struct SystemdProcessManager {
    instance: Instance,
    runner: Arc<dyn CommandRunner>,
    system: Arc<dyn SystemProbe>,
    readiness: Arc<dyn ReadinessProbe>,
    config: SystemdConfig,
}

impl SystemdProcessManager {
    pub fn new(
        instance: Instance,
        runner: Arc<dyn CommandRunner>,
        system: Arc<dyn SystemProbe>,
        readiness: Arc<dyn ReadinessProbe>,
        config: SystemdConfig,
    ) -> Self {
        Self {
            instance,
            runner,
            system,
            readiness,
            config,
        }
    }

    pub fn systemd_name(&self) -> ServiceName {
        self.instance.service_name()
    }

    pub fn log_suggestion(&self) -> String {
        self.systemd_name().log_suggestion()
    }

    fn systemctl(&self, action: &str) -> CommandSpec {
        CommandSpec::new(
            &self.config.supervisor,
            [action.to_string(), self.systemd_name().to_string()],
        )
    }

    fn systemctl_quiet(&self, action: &str) -> CommandSpec {
        CommandSpec::new(
            &self.config.supervisor,
            [
                action.to_string(),
                self.systemd_name().to_string(),
                "--quiet".to_string(),
            ],
        )
    }

    /// Guard for start/stop/restart: linux user and unit file must both be set up
    fn precheck(&self) -> Result<()> {
        if self.system.setup_marker(self.instance.dir())?.is_none() {
            return Err(AppError::SetupRequired(SETUP_LINUX_USER_MESSAGE.to_string()));
        }

        let unit_file = self
            .config
            .unit_dir
            .join(self.systemd_name().unit_file_name());

        if self.system.path_exists(&unit_file) {
            return Ok(());
        }

        Err(AppError::SetupRequired(SETUP_SYSTEMD_MESSAGE.to_string()))
    }

    /// Run an elevated systemctl action, wrapping failures as process errors
    async fn sudo_action(&self, command: CommandSpec) -> Result<()> {
        info!(service = %self.systemd_name(), command = %command, "Running systemd action");

        self.runner
            .sudo(&command)
            .await
            .map(|_| ())
            .map_err(|e| AppError::from(e).into_process_error())
    }

    /// Elevated action followed by a readiness wait
    async fn sudo_action_and_wait(&self, command: CommandSpec) -> Result<()> {
        self.sudo_action(command).await?;

        self.readiness
            .ensure_started(EnsureStartedOptions {
                log_suggestion: self.log_suggestion(),
            })
            .await
            .map_err(AppError::into_process_error)
    }

    /// Query whose failure output may carry a recognized negative answer
    async fn query(&self, action: &str, negative_markers: &[&str]) -> Result<bool> {
        match self.runner.run(&self.systemctl(action)).await {
            Ok(_) => Ok(true),
            Err(e) if e.mentions_any(negative_markers) => {
                info!(service = %self.systemd_name(), query = action, "Supervisor answered no");
                Ok(false)
            }
            Err(e) => {
                warn!(service = %self.systemd_name(), query = action, error = %e, "Supervisor query failed");
                Err(e.into())
            }
        }
    }

    /// Send a notification to systemd, then stay alive long enough for it to be read
    async fn notify(&self, args: Vec<String>) -> Result<()> {
        let command = CommandSpec::new(&self.config.notifier, args);

        self.runner
            .run(&command)
            .await
            .map_err(|e: ExecutionError| AppError::Process(e.to_string()))?;

        tokio::time::sleep(self.config.notify_delay).await;
        Ok(())
    }
}

#[async_trait]
impl ProcessManager for SystemdProcessManager {
    fn name(&self) -> &'static str {
        "systemd"
    }

    async fn start(&self) -> Result<()> {
        self.precheck()?;
        self.sudo_action_and_wait(self.systemctl("start")).await
    }

    async fn stop(&self) -> Result<()> {
        self.precheck()?;
        self.sudo_action(self.systemctl("stop")).await
    }

    async fn restart(&self) -> Result<()> {
        self.precheck()?;
        self.sudo_action_and_wait(self.systemctl("restart")).await
    }

    async fn is_running(&self) -> Result<bool> {
        self.query("is-active", NOT_RUNNING_MARKERS).await
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.query("is-enabled", NOT_ENABLED_MARKERS).await
    }

    async fn enable(&self) -> Result<()> {
        self.sudo_action(self.systemctl_quiet("enable")).await
    }

    async fn disable(&self) -> Result<()> {
        self.sudo_action(self.systemctl_quiet("disable")).await
    }

    async fn success(&self, pid: u32) -> Result<()> {
        self.notify(vec!["--ready".to_string(), format!("--pid={}", pid)])
            .await
    }

    async fn error(&self, message: &str) -> Result<()> {
        self.notify(vec![format!("--status={}", message)]).await
    }
}

/// Builds systemd process managers when `systemctl` is available
pub struct SystemdProvider {
    runner: Arc<dyn CommandRunner>,
    system: Arc<dyn SystemProbe>,
    readiness: Arc<dyn ReadinessProbe>,
    config: SystemdConfig,
}

impl SystemdProvider {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        system: Arc<dyn SystemProbe>,
        readiness: Arc<dyn ReadinessProbe>,
        config: SystemdConfig,
    ) -> Self {
        Self {
            runner,
            system,
            readiness,
            config,
        }
    }
}

#[async_trait]
impl ProcessManagerProvider for SystemdProvider {
    fn name(&self) -> &'static str {
        "systemd"
    }

    async fn will_run(&self) -> bool {
        self.runner.exists(&self.config.supervisor).await
    }

    fn create(&self, instance: Instance) -> Arc<dyn ProcessManager> {
        Arc::new(SystemdProcessManager::new(
            instance,
            self.runner.clone(),
            self.system.clone(),
            self.readiness.clone(),
            self.config.clone(),
        ))
    }
}
