// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// `SetupRequired`, `Process` and `Configuration` form the taxonomy shown to
/// the operator. The remaining variants are raw failures that get wrapped
/// into `Process` before they cross a process-manager boundary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    SetupRequired(String),

    #[error("Process error: {0}")]
    Process(String),

    #[error("{message}")]
    Configuration {
        message: String,
        help: Option<String>,
        task: Option<String>,
    },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Execution error: {0}")]
    Execution(#[from] crate::port::ExecutionError),
}

impl AppError {
    /// Configuration error with remediation help and a task label
    pub fn configuration(
        message: impl Into<String>,
        help: Option<String>,
        task: Option<&str>,
    ) -> Self {
        AppError::Configuration {
            message: message.into(),
            help,
            task: task.map(str::to_string),
        }
    }

    /// True for members of the operator-facing taxonomy
    pub fn is_cli_error(&self) -> bool {
        matches!(
            self,
            AppError::SetupRequired(_) | AppError::Process(_) | AppError::Configuration { .. }
        )
    }

    /// Pass taxonomy members through, wrap everything else as `Process`
    pub fn into_process_error(self) -> Self {
        if self.is_cli_error() {
            self
        } else {
            AppError::Process(self.failure_text())
        }
    }

    /// Remediation hint, if any
    pub fn help(&self) -> Option<&str> {
        match self {
            AppError::Configuration { help, .. } => help.as_deref(),
            _ => None,
        }
    }

    /// Task label, if any
    pub fn task(&self) -> Option<&str> {
        match self {
            AppError::Configuration { task, .. } => task.as_deref(),
            _ => None,
        }
    }

    // Raw failure text without our own variant prefix
    fn failure_text(&self) -> String {
        match self {
            AppError::Io(e) => e.to_string(),
            AppError::Execution(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::ExecutionError;

    #[test]
    fn test_taxonomy_members_pass_through() {
        let err = AppError::SetupRequired("run setup".to_string()).into_process_error();
        assert!(matches!(err, AppError::SetupRequired(msg) if msg == "run setup"));

        let err = AppError::configuration("not writable", None, Some("task")).into_process_error();
        assert_eq!(err.task(), Some("task"));
    }

    #[test]
    fn test_raw_failures_are_wrapped() {
        let raw = ExecutionError::SpawnFailed("systemctl: not found".to_string());
        let err = AppError::from(raw).into_process_error();

        match err {
            AppError::Process(text) => assert!(text.contains("systemctl: not found")),
            other => panic!("expected process error, got {:?}", other),
        }
    }

    #[test]
    fn test_io_error_is_not_cli_error() {
        let err = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(!err.is_cli_error());
        assert!(err.help().is_none());
    }
}
