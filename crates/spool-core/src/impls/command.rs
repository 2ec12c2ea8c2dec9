//! CommandProcessor - 外部コマンドで payload を処理する
//!
//! 終了コードの意味:
//! - 0: 成功（stdout の各行を feed キューに追加）
//! - 75 (EX_TEMPFAIL): まだ早い -> Skipped
//! - それ以外: Known failure

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::{ProcessError, ProcessOutcome};
use crate::error::SpoolError;
use crate::ports::{Processor, WorkQueue};

/// Exit code that means "not yet, skip this item".
pub const EXIT_SKIP: i32 = 75;

/// Env var carrying the payload (it is also the last argument).
pub const PAYLOAD_ENV: &str = "SPOOL_PAYLOAD";

pub struct CommandProcessor {
    program: String,
    args: Vec<String>,
    feed: Option<Arc<dyn WorkQueue>>,
}

impl CommandProcessor {
    /// `command[0]` is the program, the rest are leading arguments.
    pub fn new(command: &[String]) -> Result<Self, SpoolError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| SpoolError::InvalidConfig("empty command".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            feed: None,
        })
    }

    /// Append every non-empty stdout line of a successful run to `feed`.
    pub fn with_feed(mut self, feed: Arc<dyn WorkQueue>) -> Self {
        self.feed = Some(feed);
        self
    }
}

#[async_trait]
impl Processor for CommandProcessor {
    async fn process(&self, payload: &str) -> Result<ProcessOutcome, ProcessError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(payload)
            .env(PAYLOAD_ENV, payload)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ProcessError::unexpected(format!("failed to run {}", self.program)).with_source(e)
            })?;

        match output.status.code() {
            Some(0) => {
                if let Some(feed) = &self.feed {
                    let derived: Vec<String> = String::from_utf8_lossy(&output.stdout)
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_owned)
                        .collect();
                    tracing::debug!(payload, derived = derived.len(), "feeding derived work");
                    feed.enqueue_multiple(derived).await.map_err(|e| {
                        ProcessError::unexpected("failed to enqueue derived work").with_source(e)
                    })?;
                }
                Ok(ProcessOutcome::Succeeded)
            }
            Some(EXIT_SKIP) => Ok(ProcessOutcome::Skipped),
            code => {
                let status = match code {
                    Some(code) => format!("exit code {code}"),
                    None => "a signal".to_string(),
                };
                let stderr = String::from_utf8_lossy(&output.stderr);
                let stderr = stderr.trim();
                let message = if stderr.is_empty() {
                    format!("{} terminated by {status}", self.program)
                } else {
                    format!("{} terminated by {status}: {stderr}", self.program)
                };
                Err(ProcessError::known(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::impls::InMemoryWorkQueue;

    fn sh(script: &str) -> CommandProcessor {
        CommandProcessor::new(&["sh".to_string(), "-c".to_string(), script.to_string()]).unwrap()
    }

    #[tokio::test]
    async fn exit_zero_succeeds_and_feeds_stdout_lines() {
        let feed = Arc::new(InMemoryWorkQueue::new());
        let processor = sh(r#"echo "anime:$SPOOL_PAYLOAD"; echo; echo " manga:7 ""#)
            .with_feed(feed.clone());

        let outcome = processor.process("1535").await.unwrap();
        assert_eq!(outcome, ProcessOutcome::Succeeded);

        let payloads: Vec<String> = feed
            .items()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.payload)
            .collect();
        assert_eq!(payloads, ["anime:1535", "manga:7"]);
    }

    #[tokio::test]
    async fn exit_75_skips() {
        let outcome = sh("exit 75").process("alice").await.unwrap();
        assert_eq!(outcome, ProcessOutcome::Skipped);
    }

    #[tokio::test]
    async fn other_exit_codes_are_known_failures_with_stderr() {
        let err = sh("echo 'user page missing' >&2; exit 3")
            .process("alice")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Known);
        assert!(err.message().contains("exit code 3"));
        assert!(err.message().contains("user page missing"));
    }

    #[tokio::test]
    async fn missing_program_is_unexpected() {
        let processor =
            CommandProcessor::new(&["/nonexistent/spool-processor".to_string()]).unwrap();
        let err = processor.process("alice").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn empty_command_is_invalid() {
        assert!(matches!(
            CommandProcessor::new(&[]),
            Err(SpoolError::InvalidConfig(_))
        ));
    }
}
