//! External process outcome model

use std::time::Duration;

/// Result of one external transformer invocation: the exit status, elapsed
/// wall time, and whatever the process wrote to stderr. Stderr is carried
/// for diagnostics only — it is never parsed for control flow.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Exit code; `None` means abnormal termination (killed by signal).
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Short human-readable failure description for error reports.
    pub fn failure_reason(&self) -> String {
        let diag = self.stderr.trim();
        let status = match self.exit_code {
            Some(code) => format!("transformer exited with status {}", code),
            None => "transformer terminated abnormally".to_string(),
        };
        if diag.is_empty() {
            status
        } else {
            format!("{}: {}", status, diag)
        }
    }
}
