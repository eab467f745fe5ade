//! Ghostctl CLI - lifecycle control for supervised Ghost instances

mod logging;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::info;

use ghostctl_core::application::{run_checks, select_provider, DoctorCheck, InstallFolderPermissions};
use ghostctl_core::config::Settings;
use ghostctl_core::domain::{Instance, TaskContext};
use ghostctl_core::error::AppError;
use ghostctl_core::port::{ProcessManager, ProcessManagerProvider, SystemProbe};
use ghostctl_infra_system::{
    AncestorDirectoryChecker, PortPollingReadiness, SystemProbeImpl, SystemdConfig,
    SystemdProvider, TokioCommandRunner,
};

#[derive(Parser)]
#[command(name = "ghostctl")]
#[command(about = "Manage a supervised Ghost instance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Instance directory (defaults to the current directory)
    #[arg(long, global = true, env = "GHOSTCTL_DIR")]
    dir: Option<String>,

    /// Instance name (defaults to the directory name)
    #[arg(long, global = true, env = "GHOSTCTL_NAME")]
    name: Option<String>,

    /// Extra settings file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Force a process manager instead of probing
    #[arg(long, global = true)]
    process: Option<String>,

    /// Development install: skip system-level checks
    #[arg(long, global = true)]
    local: bool,

    /// Do not expect a dedicated system user
    #[arg(long, global = true)]
    no_setup_linux_user: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the instance
    Start {
        /// Also enable the service at boot
        #[arg(long)]
        enable: bool,
    },

    /// Stop the instance
    Stop {
        /// Also disable the service at boot
        #[arg(long)]
        disable: bool,
    },

    /// Restart the instance
    Restart,

    /// Enable the service at boot
    Enable,

    /// Disable the service at boot
    Disable,

    /// Show whether the instance is enabled and running
    Status,

    /// Run prechecks for a command category (install, update, start)
    Check {
        #[arg(default_value = "install")]
        category: String,
    },

    /// Notify the supervisor from inside the managed process
    Notify {
        #[command(subcommand)]
        signal: NotifySignal,
    },
}

#[derive(Subcommand)]
enum NotifySignal {
    /// The process finished starting
    Ready {
        /// Main PID of the managed process (defaults to our parent)
        #[arg(long)]
        pid: Option<u32>,
    },
    /// The process failed
    Error {
        /// Status message passed to the supervisor
        message: String,
    },
}

#[derive(Tabled)]
struct StatusRow {
    instance: String,
    service: String,
    process_manager: String,
    enabled: String,
    running: String,
}

/// Wired adapters for one invocation
struct App {
    settings: Settings,
    instance: Instance,
    ctx: TaskContext,
    system: Arc<SystemProbeImpl>,
    providers: Vec<Arc<dyn ProcessManagerProvider>>,
}

impl App {
    fn build(cli: &Cli) -> Result<Self> {
        let dir = match &cli.dir {
            Some(raw) => settings::expand_path(raw)?,
            None => std::env::current_dir().context("Failed to resolve current directory")?,
        };

        let explicit = cli
            .config
            .as_deref()
            .map(settings::expand_path)
            .transpose()?;
        let mut settings =
            settings::load(&dir, explicit.as_deref()).context("Failed to load settings")?;
        if let Some(process) = &cli.process {
            settings.process = Some(process.clone());
        }

        let name = cli.name.clone().unwrap_or_else(|| default_name(&dir));
        let mut instance = Instance::new(name, dir);
        if let Some(process) = &settings.process {
            instance = instance.with_process_name(process.clone());
        }

        let system = Arc::new(SystemProbeImpl::new(settings.ghost_user.clone()));
        let runner = Arc::new(TokioCommandRunner::new());
        let readiness = Arc::new(PortPollingReadiness::from_settings(&settings));

        let providers: Vec<Arc<dyn ProcessManagerProvider>> = vec![Arc::new(SystemdProvider::new(
            runner,
            system.clone(),
            readiness,
            SystemdConfig::from(&settings),
        ))];

        let ctx = TaskContext {
            local: cli.local,
            instance: Some(instance.clone()),
            platform: system.platform(),
            setup_linux_user: cli.no_setup_linux_user.then_some(false),
        };

        info!(instance = %instance.name, dir = %instance.dir.display(), "Resolved instance");

        Ok(Self {
            settings,
            instance,
            ctx,
            system,
            providers,
        })
    }

    async fn process_manager(&self) -> Result<Arc<dyn ProcessManager>> {
        let provider = select_provider(&self.providers, self.settings.process.as_deref()).await?;
        Ok(provider.create(self.instance.clone()))
    }

    async fn prechecks(&self, category: &str) -> Result<()> {
        let permissions =
            InstallFolderPermissions::new(self.system.clone(), Arc::new(AncestorDirectoryChecker::new()));
        let checks: Vec<&dyn DoctorCheck> = vec![&permissions];

        run_checks(&checks, category, &self.ctx).await?;
        Ok(())
    }
}

fn default_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ghost".to_string())
}

/// PID reported as the unit's main process: the caller of `ghostctl notify`
fn notify_pid(explicit: Option<u32>) -> u32 {
    explicit.unwrap_or_else(parent_pid)
}

#[cfg(unix)]
fn parent_pid() -> u32 {
    std::os::unix::process::parent_id()
}

#[cfg(not(unix))]
fn parent_pid() -> u32 {
    std::process::id()
}

fn yes_no(value: bool) -> String {
    if value {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}

async fn run(cli: Cli) -> Result<()> {
    let app = App::build(&cli)?;

    match cli.command {
        Commands::Start { enable } => {
            app.prechecks("start").await?;
            let pm = app.process_manager().await?;

            pm.start().await?;
            if enable {
                pm.enable().await?;
            }

            println!("{}", format!("✓ Started {}", app.instance.service_name()).green().bold());
        }

        Commands::Stop { disable } => {
            let pm = app.process_manager().await?;

            pm.stop().await?;
            if disable {
                pm.disable().await?;
            }

            println!("{}", format!("✓ Stopped {}", app.instance.service_name()).green().bold());
        }

        Commands::Restart => {
            app.prechecks("start").await?;
            let pm = app.process_manager().await?;
            pm.restart().await?;

            println!("{}", format!("✓ Restarted {}", app.instance.service_name()).green().bold());
        }

        Commands::Enable => {
            app.process_manager().await?.enable().await?;
            println!("{}", format!("✓ Enabled {}", app.instance.service_name()).green().bold());
        }

        Commands::Disable => {
            app.process_manager().await?.disable().await?;
            println!("{}", format!("✓ Disabled {}", app.instance.service_name()).green().bold());
        }

        Commands::Status => {
            let pm = app.process_manager().await?;
            let row = StatusRow {
                instance: app.instance.name.clone(),
                service: app.instance.service_name().to_string(),
                process_manager: pm.name().to_string(),
                enabled: yes_no(pm.is_enabled().await?),
                running: yes_no(pm.is_running().await?),
            };

            println!("{}", Table::new(vec![row]));
        }

        Commands::Check { category } => {
            app.prechecks(&category).await?;
            println!("{}", format!("✓ All {} checks passed", category).green().bold());
        }

        Commands::Notify { signal } => {
            let pm = app.process_manager().await?;
            match signal {
                NotifySignal::Ready { pid } => pm.success(notify_pid(pid)).await?,
                NotifySignal::Error { message } => pm.error(&message).await?,
            }
        }
    }

    Ok(())
}

/// Print an error with its remediation hint and task label
fn render_error(err: &anyhow::Error) {
    match err.downcast_ref::<AppError>() {
        Some(app_err) => {
            if let Some(task) = app_err.task() {
                eprintln!("{} {}", "✗".red(), task.bold());
            }
            eprintln!("{} {}", "Error:".red().bold(), app_err);
            if let Some(help) = app_err.help() {
                eprintln!("{} {}", "Help:".cyan().bold(), help);
            }
        }
        None => eprintln!("{} {:#}", "Error:".red().bold(), err),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli).await {
        render_error(&e);
        std::process::exit(1);
    }
}
