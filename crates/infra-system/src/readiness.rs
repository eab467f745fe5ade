// Port polling readiness probe
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use ghostctl_core::config::Settings;
use ghostctl_core::error::{AppError, Result};
use ghostctl_core::port::{EnsureStartedOptions, ReadinessProbe};

/// Waits until the instance accepts TCP connections on its configured port
pub struct PortPollingReadiness {
    host: String,
    port: u16,
    timeout: Duration,
    interval: Duration,
}

impl PortPollingReadiness {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration, interval: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
            interval,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.host.clone(),
            settings.port,
            settings.readiness_timeout(),
            settings.readiness_interval(),
        )
    }

    async fn try_connect(&self) -> bool {
        let attempt = timeout(
            self.interval,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await;

        matches!(attempt, Ok(Ok(_)))
    }
}

#[async_trait]
impl ReadinessProbe for PortPollingReadiness {
    async fn ensure_started(&self, options: EnsureStartedOptions) -> Result<()> {
        let deadline = Instant::now() + self.timeout;
        let mut attempts = 0u32;

        loop {
            attempts += 1;

            if self.try_connect().await {
                info!(host = %self.host, port = self.port, attempts, "Instance is accepting connections");
                return Ok(());
            }

            debug!(host = %self.host, port = self.port, attempts, "Instance not ready yet");

            if Instant::now() + self.interval > deadline {
                break;
            }
            sleep(self.interval).await;
        }

        warn!(host = %self.host, port = self.port, attempts, "Instance did not start in time");

        Err(AppError::Process(format!(
            "Ghost did not start within {} seconds on {}:{}. Check the logs with: {}",
            self.timeout.as_secs(),
            self.host,
            self.port,
            options.log_suggestion
        )))
    }
}
