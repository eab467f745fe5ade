// Process manager selection by capability probing

use crate::error::{AppError, Result};
use crate::port::ProcessManagerProvider;
use std::sync::Arc;
use tracing::{debug, info};

const SELECTION_HELP: &str =
    "Install a supported service supervisor (systemd), or pick one with `--process <name>`";

/// Pick the process manager for this host
///
/// With `forced` set, only the provider of that name is considered; otherwise
/// the first provider whose probe succeeds wins.
///
/// # Errors
/// - AppError::Configuration if no provider qualifies
pub async fn select_provider(
    providers: &[Arc<dyn ProcessManagerProvider>],
    forced: Option<&str>,
) -> Result<Arc<dyn ProcessManagerProvider>> {
    if let Some(name) = forced {
        let provider = providers
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| {
                AppError::configuration(
                    format!("Unknown process manager '{}'", name),
                    Some(SELECTION_HELP.to_string()),
                    None,
                )
            })?;

        if !provider.will_run().await {
            return Err(AppError::configuration(
                format!("Process manager '{}' cannot run on this system", name),
                Some(SELECTION_HELP.to_string()),
                None,
            ));
        }

        info!(process_manager = name, "Using configured process manager");
        return Ok(provider.clone());
    }

    for provider in providers {
        let will_run = provider.will_run().await;
        debug!(process_manager = provider.name(), will_run, "Probed process manager");

        if will_run {
            info!(process_manager = provider.name(), "Selected process manager");
            return Ok(provider.clone());
        }
    }

    Err(AppError::configuration(
        "No supported process manager found on this system",
        Some(SELECTION_HELP.to_string()),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::process_manager::mocks::MockProvider;

    #[tokio::test]
    async fn test_first_probe_success_wins() {
        let a = Arc::new(MockProvider::new("a", false));
        let b = Arc::new(MockProvider::new("b", true));
        let c = Arc::new(MockProvider::new("c", true));
        let providers: Vec<Arc<dyn ProcessManagerProvider>> = vec![a.clone(), b.clone(), c.clone()];

        let selected = select_provider(&providers, None).await.unwrap();

        assert_eq!(selected.name(), "b");
        assert_eq!(a.probe_count(), 1);
        assert_eq!(c.probe_count(), 0);
    }

    #[tokio::test]
    async fn test_none_available() {
        let providers: Vec<Arc<dyn ProcessManagerProvider>> =
            vec![Arc::new(MockProvider::new("a", false))];

        let err = select_provider(&providers, None).await.err().unwrap();
        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_forced_provider() {
        let providers: Vec<Arc<dyn ProcessManagerProvider>> = vec![
            Arc::new(MockProvider::new("a", true)),
            Arc::new(MockProvider::new("b", true)),
        ];

        let selected = select_provider(&providers, Some("b")).await.unwrap();
        assert_eq!(selected.name(), "b");

        let err = select_provider(&providers, Some("nope")).await.err().unwrap();
        assert!(err.to_string().contains("Unknown process manager 'nope'"));
    }

    #[tokio::test]
    async fn test_forced_provider_must_pass_probe() {
        let providers: Vec<Arc<dyn ProcessManagerProvider>> =
            vec![Arc::new(MockProvider::new("a", false))];

        let err = select_provider(&providers, Some("a")).await.err().unwrap();
        assert!(err.to_string().contains("cannot run on this system"));
    }
}
