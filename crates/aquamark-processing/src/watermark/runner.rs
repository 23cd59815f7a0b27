//! Supervised external transformer invocation.
//!
//! The transformer is an opaque command-line tool judged only by exit
//! status and elapsed time. Supervision is a non-blocking poll loop:
//! `try_wait` then a scheduler yield, so a slow transcode never pins the
//! task driving an unrelated request.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use aquamark_core::models::ProcessOutcome;

use super::filter::DrawtextFilter;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Failed to spawn transformer: {0}")]
    Spawn(#[source] std::io::Error),

    /// `try_wait` itself failed for a reason unrelated to a timeout
    /// (e.g. process table exhaustion). Supervision is abandoned.
    #[error("Failed to poll transformer: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Transformer did not finish within {0:?} and was terminated")]
    TimedOut(Duration),
}

/// Seam between the orchestrator and the external transformation. The
/// production implementation shells out to ffmpeg; tests substitute stubs.
#[async_trait]
pub trait VariantTransformer: Send + Sync {
    /// Transform `input` into `output` applying `filter`. A non-zero exit
    /// code is reported inside the outcome, not as an error — treating it
    /// as a transformation failure is the caller's decision. The runner
    /// never retries.
    async fn transform(
        &self,
        input: &Path,
        output: &Path,
        filter: &DrawtextFilter,
    ) -> Result<ProcessOutcome, RunnerError>;
}

/// ffmpeg-backed transformer with poll-loop supervision.
pub struct WatermarkRunner {
    program: String,
    poll_interval: Duration,
    max_wait: Option<Duration>,
}

impl WatermarkRunner {
    /// `max_wait` bounds one invocation; on expiry the child is killed and
    /// the run reported as timed out. `None` waits indefinitely.
    pub fn new(program: impl Into<String>, poll_interval: Duration, max_wait: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            poll_interval,
            max_wait,
        }
    }
}

#[async_trait]
impl VariantTransformer for WatermarkRunner {
    async fn transform(
        &self,
        input: &Path,
        output: &Path,
        filter: &DrawtextFilter,
    ) -> Result<ProcessOutcome, RunnerError> {
        let start = Instant::now();
        let mut child = Command::new(&self.program)
            .arg("-i")
            .arg(input)
            .arg("-vf")
            .arg(filter.render())
            .arg("-y")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(RunnerError::Spawn)?;

        // Drain stderr concurrently so a chatty transformer never blocks on
        // a full pipe while we poll.
        let stderr_pipe = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(mut pipe) = stderr_pipe {
                let _ = pipe.read_to_string(&mut buf).await;
            }
            buf
        });

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if let Some(max_wait) = self.max_wait {
                        if start.elapsed() >= max_wait {
                            tracing::warn!(
                                program = %self.program,
                                input = %input.display(),
                                "transformer exceeded maximum wait, killing"
                            );
                            let _ = child.start_kill();
                            let _ = child.wait().await;
                            stderr_task.abort();
                            return Err(RunnerError::TimedOut(max_wait));
                        }
                    }
                    // Yield the scheduler instead of occupying the task.
                    tokio::time::sleep(self.poll_interval).await;
                }
                Err(e) => {
                    stderr_task.abort();
                    return Err(RunnerError::Wait(e));
                }
            }
        };

        let stderr = stderr_task.await.unwrap_or_default();
        let elapsed = start.elapsed();

        if status.success() {
            tracing::debug!(
                input = %input.display(),
                output = %output.display(),
                duration_ms = elapsed.as_secs_f64() * 1000.0,
                "transformer finished"
            );
        } else {
            tracing::warn!(
                input = %input.display(),
                exit_code = ?status.code(),
                stderr = %stderr.trim(),
                duration_ms = elapsed.as_secs_f64() * 1000.0,
                "transformer exited with failure"
            );
        }

        Ok(ProcessOutcome {
            exit_code: status.code(),
            elapsed,
            stderr,
        })
    }
}
