// Command runner implementation
// reason: tokio for async process management
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use ghostctl_core::port::command_runner::{
    CommandOutput, CommandRunner, CommandSpec, ExecutionError,
};

/// Runs external commands as child processes
///
/// Elevated commands are prefixed with `sudo -E` unless we already run as root.
pub struct TokioCommandRunner {
    elevate: bool,
}

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self {
            elevate: !running_as_root(),
        }
    }

    /// Wrap a command for privileged execution
    fn elevated(&self, command: &CommandSpec) -> CommandSpec {
        if !self.elevate {
            return command.clone();
        }

        let mut args = vec!["-E".to_string(), command.program.clone()];
        args.extend(command.args.iter().cloned());
        CommandSpec::new("sudo", args)
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(
        &self,
        command: &CommandSpec,
        stdin: Stdio,
    ) -> Result<std::process::Output, ExecutionError> {
        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", command.program, e)))?;

        child
            .wait_with_output()
            .await
            .map_err(|e| ExecutionError::IoError(e.to_string()))
    }

    /// Build command output from process output, failing on non-zero exit
    fn build_result(
        &self,
        command: &CommandSpec,
        output: std::process::Output,
    ) -> Result<CommandOutput, ExecutionError> {
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(ExecutionError::Failed {
                command: command.to_string(),
                exit_code: output.status.code(),
                stdout,
                stderr,
            });
        }

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout,
            stderr,
        })
    }

    async fn execute(
        &self,
        command: &CommandSpec,
        stdin: Stdio,
    ) -> Result<CommandOutput, ExecutionError> {
        info!(command = %command, "Running command");

        let output = self.spawn_and_wait(command, stdin).await?;
        let result = self.build_result(command, output);

        match &result {
            Ok(out) => debug!(command = %command, exit_code = ?out.exit_code, "Command completed"),
            Err(e) => debug!(command = %command, error = %e, "Command failed"),
        }

        result
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ExecutionError> {
        self.execute(command, Stdio::null()).await
    }

    async fn sudo(&self, command: &CommandSpec) -> Result<CommandOutput, ExecutionError> {
        // sudo may need to prompt for a password
        self.execute(&self.elevated(command), Stdio::inherit()).await
    }

    async fn exists(&self, program: &str) -> bool {
        let status = Command::new("which")
            .arg(program)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        let found = matches!(status, Ok(s) if s.success());
        debug!(program = %program, found, "Probed for program");
        found
    }
}

fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }

    #[cfg(not(unix))]
    {
        false
    }
}
