// Settings model (loading lives in the CLI composition root)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for ghostctl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Service supervisor control binary
    pub supervisor: String,
    /// Readiness/status notification binary
    pub notifier: String,
    /// Directory holding unit definition files
    pub unit_dir: PathBuf,
    /// System user that owns a supervised install
    pub ghost_user: String,
    /// Seconds to keep the process alive after a notification
    pub notify_delay_secs: u64,
    pub readiness_timeout_secs: u64,
    pub readiness_interval_ms: u64,
    pub host: String,
    pub port: u16,
    /// Force a process manager by name instead of probing
    pub process: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            supervisor: "systemctl".to_string(),
            notifier: "systemd-notify".to_string(),
            unit_dir: PathBuf::from("/lib/systemd/system"),
            ghost_user: "ghost".to_string(),
            notify_delay_secs: 10,
            readiness_timeout_secs: 60,
            readiness_interval_ms: 500,
            host: "127.0.0.1".to_string(),
            port: 2368,
            process: None,
        }
    }
}

impl Settings {
    pub fn notify_delay(&self) -> Duration {
        Duration::from_secs(self.notify_delay_secs)
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_secs(self.readiness_timeout_secs)
    }

    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.supervisor, "systemctl");
        assert_eq!(settings.notify_delay(), Duration::from_secs(10));
        assert_eq!(settings.unit_dir, PathBuf::from("/lib/systemd/system"));
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"port": 2369}"#).unwrap();
        assert_eq!(settings.port, 2369);
        assert_eq!(settings.ghost_user, "ghost");
    }
}
