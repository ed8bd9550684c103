use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use is_terminal::IsTerminal;
use once_cell::sync::OnceCell;
use owo_colors::OwoColorize;
use stratus_journal::{Journal, SessionRecord};
use stratus_provider::{Credentials, ProviderClient};
use stratus_types::Severity;

use crate::command::Outcome;
use crate::queue::MessageQueue;

/// How command results reach the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoMode {
    /// Severity-colored message lines for a human at a TTY.
    Interactive,
    /// `retcode|message` lines for a parsing caller.
    Script,
}

/// Default poll interval for server provisioning watchers.
pub const DEFAULT_BUILD_POLL: Duration = Duration::from_secs(30);

/// Shared state threaded through every handler call.
///
/// Constructed once in `main` and passed by reference; there are no
/// process globals. Background workers get the pieces they need (provider
/// handle, queue, termination flag) as owned clones, never the context
/// itself, so the journal connection stays on the shell thread.
pub struct ShellContext {
    provider: Arc<ProviderClient>,
    sid: String,
    credentials: Credentials,
    db_path: Option<PathBuf>,
    journal: OnceCell<Journal>,
    queue: MessageQueue,
    terminate: Arc<AtomicBool>,
    echo_threshold: Mutex<Severity>,
    echo_mode: EchoMode,
    build_poll: Duration,
}

impl ShellContext {
    pub fn new(
        provider: ProviderClient,
        db_path: PathBuf,
        credentials: Credentials,
        echo_mode: EchoMode,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            sid: uuid::Uuid::new_v4().to_string(),
            credentials,
            db_path: Some(db_path),
            journal: OnceCell::new(),
            queue: MessageQueue::new(),
            terminate: Arc::new(AtomicBool::new(false)),
            echo_threshold: Mutex::new(Severity::Info),
            echo_mode,
            build_poll: DEFAULT_BUILD_POLL,
        }
    }

    /// Context over the in-memory provider and an in-memory journal.
    /// Used by tests and demos; nothing touches the filesystem.
    pub fn in_memory() -> Self {
        let ctx = Self {
            provider: Arc::new(ProviderClient::mock()),
            sid: uuid::Uuid::new_v4().to_string(),
            credentials: Credentials::default(),
            db_path: None,
            journal: OnceCell::new(),
            queue: MessageQueue::new(),
            terminate: Arc::new(AtomicBool::new(false)),
            echo_threshold: Mutex::new(Severity::Info),
            echo_mode: EchoMode::Script,
            build_poll: Duration::from_millis(1),
        };
        if let Ok(journal) = Journal::open_in_memory() {
            if let Err(e) = journal.record_session(&ctx.session_record()) {
                tracing::warn!("session row not recorded: {}", e);
            }
            let _ = ctx.journal.set(journal);
        }
        ctx
    }

    pub fn with_build_poll(mut self, interval: Duration) -> Self {
        self.build_poll = interval;
        self
    }

    pub fn provider(&self) -> &ProviderClient {
        &self.provider
    }

    /// Owned provider handle for background workers.
    pub fn provider_handle(&self) -> Arc<ProviderClient> {
        Arc::clone(&self.provider)
    }

    /// Session id for this shell run, generated at construction.
    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    pub fn terminate_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate)
    }

    pub fn request_terminate(&self) {
        self.terminate.store(true, Ordering::SeqCst);
    }

    pub fn is_terminating(&self) -> bool {
        self.terminate.load(Ordering::SeqCst)
    }

    pub fn echo_threshold(&self) -> Severity {
        *self.echo_threshold.lock().unwrap()
    }

    pub fn set_echo_threshold(&self, level: Severity) {
        *self.echo_threshold.lock().unwrap() = level;
    }

    pub fn build_poll(&self) -> Duration {
        self.build_poll
    }

    /// Journal handle, opened on first use. An unopenable journal is a
    /// warning and `None`, never a crash: the shell keeps running with
    /// recording disabled.
    pub fn journal(&self) -> Option<&Journal> {
        if let Some(journal) = self.journal.get() {
            return Some(journal);
        }
        let db_path = self.db_path.as_ref()?;
        match Journal::open(db_path) {
            Ok(journal) => {
                if let Err(e) = journal.record_session(&self.session_record()) {
                    tracing::warn!("session row not recorded: {}", e);
                }
                let _ = self.journal.set(journal);
                self.journal.get()
            }
            Err(e) => {
                tracing::warn!("journal unavailable at {}: {}", db_path.display(), e);
                None
            }
        }
    }

    /// Journal one command run and echo its summary to the console.
    pub fn record(&self, cmd_in: &str, outcome: &Outcome) {
        if let Some(journal) = self.journal() {
            if let Err(e) = journal.record_command(
                &self.sid,
                cmd_in,
                outcome.retcode,
                outcome.severity,
                &outcome.message,
            ) {
                tracing::warn!("command not journaled: {}", e);
            }
        }
        self.echo(outcome);
    }

    /// Print one outcome, honoring the echo threshold and mode.
    pub fn echo(&self, outcome: &Outcome) {
        if outcome.severity < self.echo_threshold() {
            return;
        }
        match self.echo_mode {
            EchoMode::Script => println!("{}|{}", outcome.retcode, outcome.message),
            EchoMode::Interactive => {
                let color = std::io::stdout().is_terminal();
                println!("{}", paint(outcome.severity, &outcome.message, color));
            }
        }
    }

    fn session_record(&self) -> SessionRecord {
        SessionRecord {
            sid: self.sid.clone(),
            t: chrono::Utc::now().timestamp_millis(),
            username: self.credentials.username.clone(),
            apikey: self.credentials.api_key.clone(),
            token: self.credentials.token.clone(),
            region: self.credentials.region.clone(),
            identity_type: self.credentials.identity_type.clone(),
        }
    }
}

/// Severity coloring for interactive echo. Plain text off-TTY.
fn paint(severity: Severity, message: &str, color: bool) -> String {
    if !color {
        return message.to_string();
    }
    match severity {
        Severity::Debug => message.white().to_string(),
        Severity::Info => message.blue().to_string(),
        Severity::Warning => message.magenta().to_string(),
        Severity::Error => message.red().to_string(),
        Severity::Critical => message.bright_red().to_string(),
    }
}
