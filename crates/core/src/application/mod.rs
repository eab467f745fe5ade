// Application Layer - Use Cases

pub mod doctor;
pub mod selection;

// Re-exports
pub use doctor::{run_checks, DoctorCheck, InstallFolderPermissions};
pub use selection::select_provider;
