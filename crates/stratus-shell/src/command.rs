use stratus_types::Severity;

use crate::context::ShellContext;

/// Result of one handler run, fed to the session recorder and the console.
///
/// The return code is binary: 0 for success, 1 for any failure. Severity
/// drives console coloring and the echo threshold; it does not extend the
/// return code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub retcode: i64,
    pub severity: Severity,
    pub message: String,
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            retcode: 0,
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            retcode: 1,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Degraded-but-continuing outcome (bad config value, ignored input).
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            retcode: 1,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.retcode == 0
    }
}

/// One shell command module (a plugin in shell-speak).
///
/// Responsibilities:
/// - Parse and validate its own argument line
/// - Call the provider through the context, never directly
/// - Report every run as an `Outcome`; failures are data, not panics
///
/// Handlers print tabular detail straight to stdout; the returned outcome
/// carries the one-line summary that gets journaled and echoed.
pub trait Command: Send + Sync {
    /// Registry key and first REPL token, e.g. "servers".
    fn name(&self) -> &'static str;

    /// One-line description shown by `help` and `list_plugins`.
    fn summary(&self) -> &'static str;

    /// Run one sub-command line (everything after the plugin name).
    fn execute(&self, ctx: &ShellContext, line: &str) -> Outcome;

    /// Completion candidates for a partial sub-command line. Entries that
    /// end in ':' are parameter prefixes still expecting a value.
    fn complete(&self, line: &str) -> Vec<String>;
}
