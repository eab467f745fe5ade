// Process Manager Port
// Uniform lifecycle control over whatever supervises the instance

use crate::domain::Instance;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Lifecycle capability set for one instance
///
/// Implementations:
/// - SystemdProcessManager: drives `systemctl` / `systemd-notify`
#[async_trait]
pub trait ProcessManager: Send + Sync {
    /// Short identifier (`systemd`, ...)
    fn name(&self) -> &'static str;

    /// Start the instance and wait until it is running
    async fn start(&self) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    /// Restart the instance and wait until it is running
    async fn restart(&self) -> Result<()>;

    /// `false` when the supervisor reports the instance as not running
    async fn is_running(&self) -> Result<bool>;

    /// `false` when the supervisor reports the instance as not enabled at boot
    async fn is_enabled(&self) -> Result<bool>;

    async fn enable(&self) -> Result<()>;

    async fn disable(&self) -> Result<()>;

    /// Tell the supervisor the managed process (`pid`) finished starting
    async fn success(&self, pid: u32) -> Result<()>;

    /// Tell the supervisor the managed process failed with `message`
    async fn error(&self, message: &str) -> Result<()>;
}

/// Factory + capability probe for one process manager implementation
#[async_trait]
pub trait ProcessManagerProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this implementation can run on the current host. Never fails.
    async fn will_run(&self) -> bool;

    fn create(&self, instance: Instance) -> Arc<dyn ProcessManager>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Mock process manager recording lifecycle verbs
    #[derive(Default)]
    pub struct MockProcessManager {
        running: bool,
        enabled: bool,
        actions: Mutex<Vec<String>>,
    }

    impl MockProcessManager {
        pub fn new(running: bool, enabled: bool) -> Self {
            Self {
                running,
                enabled,
                actions: Mutex::new(Vec::new()),
            }
        }

        pub fn actions(&self) -> Vec<String> {
            self.actions.lock().unwrap().clone()
        }

        fn record(&self, action: impl Into<String>) {
            self.actions.lock().unwrap().push(action.into());
        }
    }

    #[async_trait]
    impl ProcessManager for MockProcessManager {
        fn name(&self) -> &'static str {
            "mock"
        }
        async fn start(&self) -> Result<()> {
            self.record("start");
            Ok(())
        }
        async fn stop(&self) -> Result<()> {
            self.record("stop");
            Ok(())
        }
        async fn restart(&self) -> Result<()> {
            self.record("restart");
            Ok(())
        }
        async fn is_running(&self) -> Result<bool> {
            Ok(self.running)
        }
        async fn is_enabled(&self) -> Result<bool> {
            Ok(self.enabled)
        }
        async fn enable(&self) -> Result<()> {
            self.record("enable");
            Ok(())
        }
        async fn disable(&self) -> Result<()> {
            self.record("disable");
            Ok(())
        }
        async fn success(&self, pid: u32) -> Result<()> {
            self.record(format!("success: {}", pid));
            Ok(())
        }
        async fn error(&self, message: &str) -> Result<()> {
            self.record(format!("error: {}", message));
            Ok(())
        }
    }

    /// Mock provider with a fixed probe answer
    pub struct MockProvider {
        name: &'static str,
        will_run: bool,
        probes: Mutex<usize>,
    }

    impl MockProvider {
        pub fn new(name: &'static str, will_run: bool) -> Self {
            Self {
                name,
                will_run,
                probes: Mutex::new(0),
            }
        }

        pub fn probe_count(&self) -> usize {
            *self.probes.lock().unwrap()
        }
    }

    #[async_trait]
    impl ProcessManagerProvider for MockProvider {
        fn name(&self) -> &'static str {
            self.name
        }
        async fn will_run(&self) -> bool {
            *self.probes.lock().unwrap() += 1;
            self.will_run
        }
        fn create(&self, _instance: Instance) -> Arc<dyn ProcessManager> {
            Arc::new(MockProcessManager::new(false, false))
        }
    }
}
