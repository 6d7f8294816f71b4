//! Source readers: thin adapters over external processes and HTTP probes.
//!
//! A reader never lets a failure escape its boundary. A missing binary, a
//! non-zero exit, or a timeout all come back as `ok: false` with empty
//! output, and the aggregators substitute defaults for that cycle.

use std::process::Stdio;
use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;
use tokio::process::Command;

use crate::error::Result;

/// Latency sentinel reported when an endpoint probe fails outright.
pub const UNREACHABLE_SECS: f64 = 999.0;

/// Raw output of one reader invocation.
#[derive(Debug, Clone, Default)]
pub struct ReadOutput {
    pub ok: bool,
    pub text: String,
}

impl ReadOutput {
    pub fn success(text: String) -> Self {
        Self { ok: true, text }
    }

    pub fn failed() -> Self {
        Self {
            ok: false,
            text: String::new(),
        }
    }
}

/// Capability seam for raw monitoring data.
///
/// The production implementation spawns external commands; tests substitute
/// fixed output. Alternate backends (direct file tailing, native socket
/// tables) slot in here without touching aggregation or alerting.
pub trait SourceReader: Send + Sync {
    fn read(&self) -> BoxFuture<'_, ReadOutput>;
}

/// Reader that runs an external command and captures stdout, bounded by a
/// per-invocation timeout. The child is killed if the future is dropped.
pub struct CommandReader {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandReader {
    pub fn new<S: Into<String>>(program: S, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self) -> ReadOutput {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                ReadOutput::success(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(Ok(output)) => {
                log::debug!("reader `{}` exited with {}", self.program, output.status);
                ReadOutput::failed()
            }
            Ok(Err(err)) => {
                log::debug!("reader `{}` failed to spawn: {err}", self.program);
                ReadOutput::failed()
            }
            Err(_) => {
                log::debug!(
                    "reader `{}` timed out after {:?}",
                    self.program,
                    self.timeout
                );
                ReadOutput::failed()
            }
        }
    }
}

impl SourceReader for CommandReader {
    fn read(&self) -> BoxFuture<'_, ReadOutput> {
        Box::pin(self.run())
    }
}

/// HTTP endpoint prober measuring wall-clock GET latency.
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        // Deployments under watch often run on self-signed staging certs;
        // a failing handshake must still yield a latency, not an error.
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Probe a single endpoint. Any transport error (refused, DNS, TLS,
    /// timeout) maps to [`UNREACHABLE_SECS`]; HTTP error statuses still
    /// count as reachable.
    pub async fn probe(&self, url: &str) -> f64 {
        let started = Instant::now();
        match self.client.get(url).send().await {
            Ok(_) => started.elapsed().as_secs_f64(),
            Err(err) => {
                log::debug!("probe `{url}` unreachable: {err}");
                UNREACHABLE_SECS
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test double returning canned output.
    pub struct FixedReader(pub ReadOutput);

    impl SourceReader for FixedReader {
        fn read(&self) -> BoxFuture<'_, ReadOutput> {
            let output = self.0.clone();
            Box::pin(async move { output })
        }
    }

    #[tokio::test]
    async fn test_missing_binary_fails_soft() {
        let reader = CommandReader::new("vigil-test-no-such-binary", vec![]);
        let output = reader.read().await;
        assert!(!output.ok);
        assert!(output.text.is_empty());
    }

    #[tokio::test]
    async fn test_successful_command_captures_stdout() {
        let reader = CommandReader::new("echo", vec!["hello".to_string()]);
        let output = reader.read().await;
        assert!(output.ok);
        assert_eq!(output.text.trim(), "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_fails_soft() {
        let reader = CommandReader::new("false", vec![]);
        let output = reader.read().await;
        assert!(!output.ok);
    }

    #[tokio::test]
    async fn test_fixed_reader_seam() {
        let reader: Box<dyn SourceReader> =
            Box::new(FixedReader(ReadOutput::success("line".into())));
        let output = reader.read().await;
        assert!(output.ok);
        assert_eq!(output.text, "line");
    }
}
