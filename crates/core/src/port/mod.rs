// Port Layer - Interfaces for external dependencies

pub mod command_runner;
pub mod directory_checker;
pub mod process_manager;
pub mod readiness;
pub mod system_probe;

// Re-exports
pub use command_runner::{CommandOutput, CommandRunner, CommandSpec, ExecutionError};
pub use directory_checker::DirectoryChecker;
pub use process_manager::{ProcessManager, ProcessManagerProvider};
pub use readiness::{EnsureStartedOptions, ReadinessProbe};
pub use system_probe::SystemProbe;
