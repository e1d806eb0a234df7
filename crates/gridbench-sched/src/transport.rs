//! The command execution seam.
//!
//! Everything the scheduler client does is a shell command run somewhere.
//! `CommandTransport` is that somewhere: the stock implementation runs
//! locally, and a wrapper argv (e.g. `["ssh", "head-node"]`) turns it
//! into a remote hop without this crate knowing anything about ssh.

use tokio::process::Command;
use tracing::debug;

use crate::error::TransportError;

/// Captured output of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code; -1 when the process was terminated by a signal.
    pub exit_code: i32,
}

/// Runs a shell command and captures its output.
#[allow(async_fn_in_trait)]
pub trait CommandTransport {
    async fn run(&mut self, command: &str) -> Result<CommandOutput, TransportError>;
}

/// Runs commands via `sh -c`, optionally behind a wrapper argv.
///
/// With an empty wrapper the command runs on this host. With a wrapper
/// like `["ssh", "cluster-head"]` the command string is handed to the
/// wrapper as its final argument, which is how ssh, kubectl exec, and
/// similar tools expect a remote command.
#[derive(Debug, Clone, Default)]
pub struct LocalTransport {
    wrapper: Vec<String>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wrapper(wrapper: Vec<String>) -> Self {
        Self { wrapper }
    }
}

impl CommandTransport for LocalTransport {
    async fn run(&mut self, command: &str) -> Result<CommandOutput, TransportError> {
        let mut cmd = match self.wrapper.split_first() {
            Some((head, rest)) => {
                let mut c = Command::new(head);
                c.args(rest);
                c.arg(command);
                c
            }
            None => {
                let mut c = Command::new("sh");
                c.args(["-c", command]);
                c
            }
        };

        debug!(%command, wrapper = ?self.wrapper, "running command");
        let output = cmd.output().await?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_a_local_command() {
        let mut transport = LocalTransport::new();
        let out = transport.run("printf scaling").await.unwrap();
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, "scaling");
    }

    #[tokio::test]
    async fn captures_nonzero_exit_and_stderr() {
        let mut transport = LocalTransport::new();
        let out = transport.run("echo nope >&2; exit 3").await.unwrap();
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stderr.trim(), "nope");
    }

    #[tokio::test]
    async fn wrapper_receives_the_command_as_one_argument() {
        // `sh -c 'printf %s "$1"' --` prints its single extra argument,
        // which is exactly what an ssh-style wrapper would receive.
        let mut transport = LocalTransport::with_wrapper(vec![
            "sh".to_string(),
            "-c".to_string(),
            r#"printf %s "$1""#.to_string(),
            "--".to_string(),
        ]);
        let out = transport.run("sinfo -h -o %D").await.unwrap();
        assert_eq!(out.stdout, "sinfo -h -o %D");
    }

    #[tokio::test]
    async fn missing_wrapper_binary_is_an_io_error() {
        let mut transport =
            LocalTransport::with_wrapper(vec!["gridbench-no-such-binary".to_string()]);
        let err = transport.run("true").await.unwrap_err();
        assert!(matches!(err, TransportError::Io(_)));
    }
}
