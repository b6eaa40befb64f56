//=========================================================================
// Mailbox
//=========================================================================
//
// Per-recipient FIFO queue with its own lock.
//
// Enqueuing to one recipient never contends with draining another: the
// bus only holds a shared lock on its mailbox table while it touches a
// single mailbox's mutex.
//
// The bus-wide pending counter is adjusted while the mailbox mutex is
// held, so it never drops below the number of queued messages.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

//=== Internal Dependencies ===============================================

use super::Message;

//=========================================================================

/// Pending messages for one recipient, oldest first.
#[derive(Debug, Default)]
pub(super) struct Mailbox {
    queue: Mutex<Vec<Arc<Message>>>,
}

impl Mailbox {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Appends a message at the back of the queue and counts it as pending.
    pub(super) fn push(&self, message: Arc<Message>, pending: &AtomicUsize) {
        let mut queue = self.lock();
        queue.push(message);
        pending.fetch_add(1, Ordering::AcqRel);
    }

    /// Removes and returns every queued message in arrival order.
    ///
    /// The mailbox keeps its allocation for reuse on the next tick.
    pub(super) fn take(&self, pending: &AtomicUsize) -> Vec<Arc<Message>> {
        let mut queue = self.lock();
        pending.fetch_sub(queue.len(), Ordering::AcqRel);
        queue.drain(..).collect()
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.lock().len()
    }

    /// A handler that panicked mid-drain must not wedge the mailbox.
    fn lock(&self) -> MutexGuard<'_, Vec<Arc<Message>>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//=========================================================================
// Tests
//=========================================================================
