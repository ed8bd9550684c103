use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// FIFO message channel between background workers and the notifier.
///
/// Cloning is cheap and shares the underlying queue. Push and pop are
/// single atomic operations under one lock; no other state is shared
/// between the shell and its workers.
#[derive(Clone, Default)]
pub struct MessageQueue {
    inner: Arc<Mutex<VecDeque<String>>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: impl Into<String>) {
        self.inner.lock().unwrap().push_back(message.into());
    }

    /// Pop the oldest message, if any.
    pub fn pop(&self) -> Option<String> {
        self.inner.lock().unwrap().pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
