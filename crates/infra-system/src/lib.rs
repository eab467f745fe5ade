// Ghostctl Infrastructure - System Adapters
// Implements: CommandRunner, SystemProbe, ReadinessProbe, DirectoryChecker, ProcessManager

pub mod command_runner;
pub mod directory_check;
pub mod readiness;
pub mod system_probe_impl;
pub mod systemd;

pub use command_runner::TokioCommandRunner;
pub use directory_check::AncestorDirectoryChecker;
pub use readiness::PortPollingReadiness;
pub use system_probe_impl::SystemProbeImpl;
pub use systemd::{SystemdConfig, SystemdProcessManager, SystemdProvider};
