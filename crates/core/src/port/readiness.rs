// Readiness Port
// Waits for a freshly (re)started instance to accept traffic

use crate::error::Result;
use async_trait::async_trait;

/// Options for a readiness wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureStartedOptions {
    /// Command the operator can run to diagnose a failed start
    pub log_suggestion: String,
}

#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Resolve once the instance is running
    ///
    /// # Errors
    /// Taxonomy errors (usually `AppError::Process`) on timeout or failure
    async fn ensure_started(&self, options: EnsureStartedOptions) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::{Arc, Mutex};

    /// Mock readiness probe recording every wait
    #[derive(Default)]
    pub struct MockReadinessProbe {
        failure: Option<String>,
        seen: Arc<Mutex<Vec<EnsureStartedOptions>>>,
    }

    impl MockReadinessProbe {
        pub fn new_ready() -> Self {
            Self::default()
        }

        /// Every wait fails with `AppError::Process(message)`
        pub fn new_failing(message: impl Into<String>) -> Self {
            Self {
                failure: Some(message.into()),
                ..Default::default()
            }
        }

        pub fn seen(&self) -> Vec<EnsureStartedOptions> {
            self.seen.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ReadinessProbe for MockReadinessProbe {
        async fn ensure_started(&self, options: EnsureStartedOptions) -> Result<()> {
            self.seen.lock().unwrap().push(options);
            match &self.failure {
                Some(message) => Err(AppError::Process(message.clone())),
                None => Ok(()),
            }
        }
    }
}
