// Domain Layer - Pure entities, no I/O

pub mod context;
pub mod instance;

// Re-exports
pub use context::{Platform, TaskContext};
pub use instance::{Instance, ServiceName, LOCAL_PROCESS_NAME};
