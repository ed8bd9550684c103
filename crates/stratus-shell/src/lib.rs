// Shell core: command dispatch, shared context, background jobs
//
// NOTE: Shell Design Rationale
//
// Commands are statically linked modules behind a `Command` trait and a
// name -> command map (no runtime discovery, no dynamic loading). All
// cross-thread traffic goes through one message queue; background threads
// never touch the terminal or the journal directly.

// Error types
pub mod error;

// Command trait and handler outcomes
pub mod command;

// Name -> command map with checked registration
pub mod registry;

// Shared state passed to every handler
pub mod context;

// Worker -> shell message channel
pub mod queue;

// Top-right screen notifier thread
pub mod notifier;

// Server provisioning watcher threads
pub mod workers;

// Built-in command modules
pub mod plugins;

pub use command::{Command, Outcome};
pub use context::{EchoMode, ShellContext};
pub use error::{Error, Result};
pub use notifier::{AnsiTarget, MockTarget, Notifier, NotifyTarget};
pub use queue::MessageQueue;
pub use registry::CommandRegistry;
pub use workers::ServerBuildWatcher;
