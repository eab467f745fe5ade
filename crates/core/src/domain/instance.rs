// Instance entity and derived supervisor identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Process name used by instances that run in the foreground for development
pub const LOCAL_PROCESS_NAME: &str = "local";

/// A managed Ghost deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    pub dir: PathBuf,
    /// Configured process manager (`systemd`, `local`, ...)
    #[serde(default)]
    pub process_name: Option<String>,
}

impl Instance {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            process_name: None,
        }
    }

    pub fn with_process_name(mut self, process_name: impl Into<String>) -> Self {
        self.process_name = Some(process_name.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_local(&self) -> bool {
        self.process_name.as_deref() == Some(LOCAL_PROCESS_NAME)
    }

    /// Name the instance is registered under with the service supervisor
    pub fn service_name(&self) -> ServiceName {
        ServiceName::for_instance(&self.name)
    }
}

/// Supervisor unit name, always `ghost_<instance name>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn for_instance(instance_name: &str) -> Self {
        Self(format!("ghost_{}", instance_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unit definition file name (`ghost_<name>.service`)
    pub fn unit_file_name(&self) -> String {
        format!("{}.service", self.0)
    }

    /// Command an operator can run to inspect recent service logs
    pub fn log_suggestion(&self) -> String {
        format!("journalctl -u {} -n 50", self.0)
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
