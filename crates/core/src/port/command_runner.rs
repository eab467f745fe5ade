// Command Runner Port
// Abstraction for invoking external command-line tools (plain or elevated)

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// An external command line: program plus arguments, no shell involved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured output of a command that exited successfully
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Execution errors
///
/// The `Failed` message carries everything the tool printed, so callers can
/// match on human-readable markers in it.
#[derive(Error, Debug, Clone)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Command failed with {}: {command}\n{stderr}\n{stdout}", describe_exit(.exit_code))]
    Failed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    IoError(String),
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl ExecutionError {
    /// True if the failure text contains any of the given markers
    pub fn mentions_any(&self, markers: &[&str]) -> bool {
        let text = self.to_string();
        markers.iter().any(|marker| text.contains(marker))
    }
}

/// Command Runner trait
///
/// Implementations:
/// - TokioCommandRunner: spawns real child processes
/// - MockCommandRunner: scripted responses for tests
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command as the current user
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the program cannot be started
    /// - ExecutionError::Failed on a non-zero exit
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ExecutionError>;

    /// Run a command with elevated privileges
    async fn sudo(&self, command: &CommandSpec) -> Result<CommandOutput, ExecutionError>;

    /// Check whether a program resolves on this system. Never fails.
    async fn exists(&self, program: &str) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    /// Scripted outcome for one command line
    #[derive(Debug, Clone)]
    pub enum MockResponse {
        /// Exit 0 with stdout
        Success(String),
        /// Non-zero exit with stdout and stderr
        Fail { stdout: String, stderr: String },
        /// Program could not be spawned
        SpawnFailed(String),
    }

    impl MockResponse {
        pub fn fail_stdout(stdout: impl Into<String>) -> Self {
            MockResponse::Fail {
                stdout: stdout.into(),
                stderr: String::new(),
            }
        }

        pub fn fail_stderr(stderr: impl Into<String>) -> Self {
            MockResponse::Fail {
                stdout: String::new(),
                stderr: stderr.into(),
            }
        }
    }

    /// A command seen by the mock
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub sudo: bool,
        pub command: String,
    }

    /// Mock Command Runner for testing
    ///
    /// Unscripted commands succeed with empty output.
    #[derive(Default)]
    pub struct MockCommandRunner {
        responses: Arc<Mutex<HashMap<String, MockResponse>>>,
        tools: Arc<Mutex<HashSet<String>>>,
        calls: Arc<Mutex<Vec<RecordedCall>>>,
    }

    impl MockCommandRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the response for an exact command line (`program arg1 arg2`)
        pub fn respond(&self, command_line: impl Into<String>, response: MockResponse) {
            self.responses
                .lock()
                .unwrap()
                .insert(command_line.into(), response);
        }

        /// Make `exists(program)` return true
        pub fn with_tool(self, program: impl Into<String>) -> Self {
            self.tools.lock().unwrap().insert(program.into());
            self
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn answer(&self, sudo: bool, command: &CommandSpec) -> Result<CommandOutput, ExecutionError> {
            let line = command.to_string();
            self.calls.lock().unwrap().push(RecordedCall {
                sudo,
                command: line.clone(),
            });

            let response = self.responses.lock().unwrap().get(&line).cloned();
            match response {
                None => Ok(CommandOutput {
                    exit_code: Some(0),
                    ..Default::default()
                }),
                Some(MockResponse::Success(stdout)) => Ok(CommandOutput {
                    exit_code: Some(0),
                    stdout,
                    stderr: String::new(),
                }),
                Some(MockResponse::Fail { stdout, stderr }) => Err(ExecutionError::Failed {
                    command: line,
                    exit_code: Some(1),
                    stdout,
                    stderr,
                }),
                Some(MockResponse::SpawnFailed(msg)) => Err(ExecutionError::SpawnFailed(msg)),
            }
        }
    }

    #[async_trait]
    impl CommandRunner for MockCommandRunner {
        async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ExecutionError> {
            self.answer(false, command)
        }

        async fn sudo(&self, command: &CommandSpec) -> Result<CommandOutput, ExecutionError> {
            self.answer(true, command)
        }

        async fn exists(&self, program: &str) -> bool {
            self.tools.lock().unwrap().contains(program)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_display() {
        let cmd = CommandSpec::new("systemctl", ["enable", "ghost_blog", "--quiet"]);
        assert_eq!(cmd.to_string(), "systemctl enable ghost_blog --quiet");
    }

    #[test]
    fn test_failed_message_includes_stdout_and_stderr() {
        let err = ExecutionError::Failed {
            command: "systemctl is-enabled ghost_blog".to_string(),
            exit_code: Some(1),
            stdout: "disabled".to_string(),
            stderr: "warning".to_string(),
        };

        let text = err.to_string();
        assert!(text.contains("exit code 1"));
        assert!(text.contains("disabled"));
        assert!(text.contains("warning"));
        assert!(err.mentions_any(&["inactive", "disabled"]));
        assert!(!err.mentions_any(&["activating"]));
    }

    #[tokio::test]
    async fn test_mock_runner_scripted_responses() {
        use mocks::{MockCommandRunner, MockResponse};

        let runner = MockCommandRunner::new().with_tool("systemctl");
        runner.respond(
            "systemctl is-active ghost_blog",
            MockResponse::Success("active".to_string()),
        );
        runner.respond(
            "systemctl is-enabled ghost_blog",
            MockResponse::fail_stdout("disabled"),
        );

        let out = runner
            .run(&CommandSpec::new("systemctl", ["is-active", "ghost_blog"]))
            .await
            .unwrap();
        assert_eq!(out.stdout, "active");
        assert_eq!(out.exit_code, Some(0));

        let err = runner
            .sudo(&CommandSpec::new("systemctl", ["is-enabled", "ghost_blog"]))
            .await
            .unwrap_err();
        assert!(err.mentions_any(&["disabled"]));

        let unscripted = runner
            .run(&CommandSpec::new("systemctl", ["daemon-reload"]))
            .await
            .unwrap();
        assert!(unscripted.stdout.is_empty());

        assert!(runner.exists("systemctl").await);
        assert!(!runner.exists("pm2").await);

        let calls = runner.calls();
        assert_eq!(runner.call_count(), 3);
        assert!(!calls[0].sudo);
        assert!(calls[1].sudo);
    }
}
