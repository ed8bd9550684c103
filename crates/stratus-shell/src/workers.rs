use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use stratus_provider::ProviderClient;

use crate::error::Result;
use crate::queue::MessageQueue;

/// Background thread that follows one server build to completion.
///
/// Every poll pushes a progress line onto the queue, changed or not, so
/// the operator sees the build is alive. The thread stops on its own when
/// the server reaches a terminal status, when the termination flag is
/// observed at a poll boundary, or when the provider call fails. Failures
/// stay inside the thread: they become queue messages, never panics in
/// the shell loop.
pub struct ServerBuildWatcher {
    handle: JoinHandle<()>,
}

impl ServerBuildWatcher {
    pub fn spawn(
        provider: Arc<ProviderClient>,
        queue: MessageQueue,
        terminate: Arc<AtomicBool>,
        server_id: String,
        interval: Duration,
    ) -> Result<Self> {
        let handle = std::thread::Builder::new()
            .name(format!("server-build-{}", server_id))
            .spawn(move || {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    watch(&provider, &queue, &terminate, &server_id, interval);
                }));

                if let Err(panic_err) = result {
                    let panic_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_err.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "watcher thread panicked with unknown error".to_string()
                    };
                    queue.push(format!(
                        "FATAL: watcher for server {} panicked: {}",
                        server_id, panic_msg
                    ));
                }
            })?;
        Ok(Self { handle })
    }

    /// Wait for the watcher to finish. Tests use this; the shell leaves
    /// watchers running and exits without joining.
    pub fn join(self) {
        let _ = self.handle.join();
    }
}

fn watch(
    provider: &ProviderClient,
    queue: &MessageQueue,
    terminate: &AtomicBool,
    server_id: &str,
    interval: Duration,
) {
    loop {
        match provider.compute.get_server(server_id) {
            Ok(server) => {
                queue.push(format!(
                    "server {} build: {} {}%",
                    server.name, server.status, server.progress
                ));
                if server.status.is_terminal() {
                    break;
                }
            }
            Err(e) => {
                queue.push(format!("server {} build watch failed: {}", server_id, e));
                break;
            }
        }
        if terminate.load(Ordering::SeqCst) {
            break;
        }
        std::thread::sleep(interval);
    }
}
