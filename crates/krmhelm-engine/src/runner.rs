//! Running the helm executable
//!
//! The inflate provider talks to helm through the [`HelmRunner`] trait so
//! tests can substitute [`FakeHelmRunner`] and never need helm installed.

use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use krmhelm_core::{Error, Result};

use crate::config::Config;

/// Captured result of one helm invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelmOutput {
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl HelmOutput {
    /// Whether helm exited with status 0
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs helm with a prepared argument list
#[async_trait]
pub trait HelmRunner: Send + Sync {
    /// Run helm and capture stdout and stderr separately
    ///
    /// A non-zero exit is not an error at this level; it is reported in
    /// [`HelmOutput::status`]. Errors are reserved for failing to run helm
    /// at all.
    async fn run(&self, args: &[String]) -> Result<HelmOutput>;
}

/// Runs a real helm executable as a child process
#[derive(Debug, Clone)]
pub struct CommandHelmRunner {
    program: String,
    timeout: Duration,
}

impl CommandHelmRunner {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.helm_bin.clone(), config.helm_timeout)
    }
}

#[async_trait]
impl HelmRunner for CommandHelmRunner {
    async fn run(&self, args: &[String]) -> Result<HelmOutput> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the future on timeout must not leave helm running
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => {
                result.map_err(|e| Error::io(format!("failed to run {}", self.program), e))?
            }
            Err(_) => {
                return Err(Error::generation(
                    "inflate",
                    format!(
                        "{} timed out after {:?}",
                        self.program, self.timeout
                    ),
                ));
            }
        };

        Ok(HelmOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// One call observed by [`FakeHelmRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub args: Vec<String>,
    /// Content of the `--values` file at call time, if one was passed
    pub values_file: Option<String>,
}

/// In-memory helm stand-in for testing
///
/// Returns a canned [`HelmOutput`] and records every invocation, including
/// the values file content (the real file is removed once generation ends).
#[derive(Debug, Clone, Default)]
pub struct FakeHelmRunner {
    output: HelmOutput,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeHelmRunner {
    /// Runner that exits 0 with the given stdout
    pub fn succeeding(stdout: impl Into<String>) -> Self {
        Self {
            output: HelmOutput {
                status: Some(0),
                stdout: stdout.into(),
                stderr: String::new(),
            },
            ..Default::default()
        }
    }

    /// Runner that exits with `code` and the given stderr
    pub fn failing(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            output: HelmOutput {
                status: Some(code),
                stdout: String::new(),
                stderr: stderr.into(),
            },
            ..Default::default()
        }
    }

    /// Calls recorded so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl HelmRunner for FakeHelmRunner {
    async fn run(&self, args: &[String]) -> Result<HelmOutput> {
        let values_file = args
            .iter()
            .position(|a| a == "--values")
            .and_then(|i| args.get(i + 1))
            .map(std::fs::read_to_string)
            .transpose()
            .map_err(|e| Error::io("failed to read values file", e))?;

        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall {
                args: args.to_vec(),
                values_file,
            });

        Ok(self.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helm_output_success() {
        assert!(HelmOutput { status: Some(0), ..Default::default() }.success());
        assert!(!HelmOutput { status: Some(1), ..Default::default() }.success());
        assert!(!HelmOutput::default().success());
    }

    #[tokio::test]
    async fn test_fake_runner_records_calls() {
        let runner = FakeHelmRunner::succeeding("kind: ConfigMap\n");
        let out = runner.run(&["template".to_string(), "x".to_string()]).await.unwrap();

        assert_eq!(out.stdout, "kind: ConfigMap\n");
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["template", "x"]);
        assert_eq!(calls[0].values_file, None);
    }

    #[tokio::test]
    async fn test_missing_executable_is_io_error() {
        let runner = CommandHelmRunner::new("krmhelm-definitely-not-installed", Duration::from_secs(5));
        let err = runner.run(&["version".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("failed to run krmhelm-definitely-not-installed"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_runner_captures_streams_separately() {
        let runner = CommandHelmRunner::new("sh", Duration::from_secs(10));
        let args = vec![
            "-c".to_string(),
            "echo out; echo err >&2; exit 3".to_string(),
        ];
        let out = runner.run(&args).await.unwrap();

        assert_eq!(out.status, Some(3));
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_runner_times_out() {
        let runner = CommandHelmRunner::new("sleep", Duration::from_millis(100));
        let err = runner.run(&["5".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Generation { .. }));
        assert!(err.to_string().contains("timed out"));
    }
}
