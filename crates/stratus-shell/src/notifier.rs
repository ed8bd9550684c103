use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::Result;
use crate::queue::MessageQueue;

/// Default notifier cycle interval.
pub const DEFAULT_NOTIFY_POLL: Duration = Duration::from_secs(1);

/// Columns reserved at the right edge of the top row.
const REGION_WIDTH: usize = 60;

/// Where rendered notifications go. The ANSI implementation writes to the
/// real terminal; the mock captures for tests.
pub trait NotifyTarget: Send {
    fn notify(&mut self, message: &str);
}

/// Renders into a fixed region at the top-right of the screen without
/// disturbing the prompt: save cursor, jump, write, restore.
pub struct AnsiTarget;

impl AnsiTarget {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnsiTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyTarget for AnsiTarget {
    fn notify(&mut self, message: &str) {
        let width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);
        print!("{}", render_region(message, width));
        let _ = std::io::stdout().flush();
    }
}

pub struct MockTarget {
    pub messages: Vec<String>,
}

impl MockTarget {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }
}

impl Default for MockTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyTarget for MockTarget {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Build the escape sequence that paints `message` into the top-right
/// region. The text is right-aligned and padded to the full region width
/// so a shorter message blanks out whatever was there before.
fn render_region(message: &str, width: usize) -> String {
    let region = REGION_WIDTH.min(width.max(1));
    let col = width.saturating_sub(region) + 1;
    let text: String = message.chars().take(region).collect();
    let padded = format!("{:>width$}", text, width = region);
    format!("\x1B7\x1B[1;{}f{}\x1B8", col, padded)
}

/// One notifier cycle: pop and render at most one message, then report
/// whether the loop should continue. Popping exactly once per cycle is
/// what keeps delivery FIFO and at most one message per interval.
fn cycle(queue: &MessageQueue, terminate: &AtomicBool, target: &mut dyn NotifyTarget) -> bool {
    if let Some(message) = queue.pop() {
        target.notify(&message);
    }
    !terminate.load(Ordering::SeqCst)
}

fn run_loop(
    queue: &MessageQueue,
    terminate: &AtomicBool,
    interval: Duration,
    target: &mut dyn NotifyTarget,
) {
    while cycle(queue, terminate, target) {
        std::thread::sleep(interval);
    }
}

/// Background thread that surfaces worker messages on screen for the
/// lifetime of the shell. Stops cooperatively: the termination flag is
/// checked once per cycle, after the pop, so a message queued right
/// before shutdown still gets rendered. Worst-case shutdown latency is
/// one interval.
pub struct Notifier {
    handle: JoinHandle<()>,
}

impl Notifier {
    pub fn spawn(
        queue: MessageQueue,
        terminate: Arc<AtomicBool>,
        interval: Duration,
        mut target: Box<dyn NotifyTarget>,
    ) -> Result<Self> {
        let handle = std::thread::Builder::new()
            .name("notifier".to_string())
            .spawn(move || {
                run_loop(&queue, &terminate, interval, target.as_mut());
            })?;
        Ok(Self { handle })
    }

    /// Wait for the thread to stop. Tests use this; the shell itself
    /// shuts down fire-and-forget.
    pub fn join(self) {
        let _ = self.handle.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_three_cycles_render_three_messages_fifo() {
        let queue = MessageQueue::new();
        let terminate = AtomicBool::new(false);
        let mut target = MockTarget::new();
        queue.push("m1");
        queue.push("m2");
        queue.push("m3");

        assert!(cycle(&queue, &terminate, &mut target));
        assert!(cycle(&queue, &terminate, &mut target));
        assert!(cycle(&queue, &terminate, &mut target));

        assert_eq!(target.messages, vec!["m1", "m2", "m3"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_at_most_one_message_per_cycle() {
        let queue = MessageQueue::new();
        let terminate = AtomicBool::new(false);
        let mut target = MockTarget::new();
        queue.push("m1");
        queue.push("m2");

        cycle(&queue, &terminate, &mut target);

        assert_eq!(target.messages, vec!["m1"]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_empty_queue_cycle_renders_nothing() {
        let queue = MessageQueue::new();
        let terminate = AtomicBool::new(false);
        let mut target = MockTarget::new();

        assert!(cycle(&queue, &terminate, &mut target));
        assert!(target.messages.is_empty());
    }

    #[test]
    fn test_terminate_checked_after_pop() {
        let queue = MessageQueue::new();
        let terminate = AtomicBool::new(true);
        let mut target = MockTarget::new();
        queue.push("last words");

        // Flag already set: the cycle still delivers the queued message,
        // then reports stop.
        assert!(!cycle(&queue, &terminate, &mut target));
        assert_eq!(target.messages, vec!["last words"]);
    }

    struct CaptureTarget {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl NotifyTarget for CaptureTarget {
        fn notify(&mut self, message: &str) {
            self.seen.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_spawned_notifier_delivers_then_stops() {
        let queue = MessageQueue::new();
        let terminate = Arc::new(AtomicBool::new(false));
        let seen = Arc::new(Mutex::new(Vec::new()));
        queue.push("m1");
        queue.push("m2");

        let notifier = Notifier::spawn(
            queue.clone(),
            Arc::clone(&terminate),
            Duration::from_millis(1),
            Box::new(CaptureTarget {
                seen: Arc::clone(&seen),
            }),
        )
        .unwrap();

        std::thread::sleep(Duration::from_millis(50));
        terminate.store(true, Ordering::SeqCst);
        notifier.join();

        assert_eq!(*seen.lock().unwrap(), vec!["m1", "m2"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_render_region_saves_and_restores_cursor() {
        let rendered = render_region("hello", 80);
        assert!(rendered.starts_with("\x1B7"));
        assert!(rendered.ends_with("\x1B8"));
        assert!(rendered.contains("\x1B[1;21f"));
        assert!(rendered.contains("hello"));
    }

    #[test]
    fn test_render_region_pads_to_full_region() {
        let rendered = render_region("hi", 80);
        // 60-column region, right-aligned: 58 leading blanks.
        let body = rendered
            .trim_start_matches("\x1B7\x1B[1;21f")
            .trim_end_matches("\x1B8");
        assert_eq!(body.chars().count(), 60);
        assert!(body.ends_with("hi"));
    }

    #[test]
    fn test_render_region_truncates_on_narrow_terminal() {
        let rendered = render_region("a very long progress message", 10);
        let body = rendered
            .trim_start_matches("\x1B7\x1B[1;1f")
            .trim_end_matches("\x1B8");
        assert_eq!(body.chars().count(), 10);
    }
}
