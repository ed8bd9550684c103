// NOTE: stratus Architecture Rationale
//
// Why a first-run bootstrap that exits (not lazy setup)?
// - The shell depends on a home directory (journal db, config, log file)
// - Creating it silently mid-session hides where state lives from operators
// - A visible one-time report ("created ~/.stratus/stratus.db") documents the
//   layout once, then every later run verifies the pieces and moves on
//
// Why one ShellContext owning the journal (not module-level state)?
// - The journal connection is single-threaded; the context pins it to the
//   REPL thread and hands background workers only the pieces that are safe
//   to share (provider handle, message queue, terminate flag)
// - Tests get a fully isolated in-memory context with no cross-test bleed
//
// Why retcode|message lines in script mode (not the interactive renderer)?
// - Piped callers parse output; ANSI colors and notification regions would
//   corrupt it
// - The packed prefix mirrors what the journal stores, so a transcript and
//   the command history agree line for line

mod app;
mod args;
pub mod bootstrap;
pub mod config;
pub mod repl;

pub use app::run;
pub use args::Cli;
