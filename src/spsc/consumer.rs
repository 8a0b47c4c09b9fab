//! Consumer handle for RingQueue<T>

use std::sync::Arc;

use super::queue::RingQueue;
use super::StopHandle;

/// State reported by [`Consumer::try_pop`].
///
/// End-of-service is a distinct tag rather than a sentinel value of `T`,
/// so payload types whose zero/default value is meaningful stay
/// unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopState {
    /// An item is available; `pop_after_try` may be called
    Ready,
    /// Queue is empty but still running
    NotReady,
    /// Queue is empty, stopped, and fully drained; permanent
    EndOfService,
}

/// The consuming side of a [`RingQueue`].
///
/// `Send` but not `Clone`: exactly one thread owns this role. Obtained
/// from [`RingQueue::split`].
pub struct Consumer<T> {
    queue: Arc<RingQueue<T>>,
}

impl<T> Consumer<T> {
    pub(crate) fn new(queue: Arc<RingQueue<T>>) -> Self {
        Self { queue }
    }

    /// Dequeue the next item, blocking by busy-polling while the queue is
    /// empty.
    ///
    /// Returns `None` once the queue is empty, shutdown was requested,
    /// and every item enqueued before the shutdown snapshot has been
    /// drained. `None` is permanent: every subsequent call returns it.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let queue = &*self.queue;
        let read = queue.consumer_position();

        loop {
            if queue.published_position() != read {
                break;
            }
            // >= rather than ==: a push racing with stop() can complete
            // one position past the snapshot, and that item is drained
            // above before we get here
            if queue.is_stopped() && read >= queue.stop_at() {
                return None;
            }
            std::hint::spin_loop();
        }

        let value = unsafe { queue.read_slot(read) };
        queue.release(read);
        Some(value)
    }

    /// Report the current consumer-side state without side effects
    #[inline]
    pub fn try_pop(&self) -> PopState {
        let queue = &*self.queue;
        let read = queue.consumer_position();

        if queue.published_position() != read {
            return PopState::Ready;
        }
        if queue.is_stopped() && read >= queue.stop_at() {
            return PopState::EndOfService;
        }
        PopState::NotReady
    }

    /// Dequeue after [`try_pop`](Self::try_pop) returned
    /// [`PopState::Ready`], without re-checking availability.
    ///
    /// Calling this after `NotReady` or `EndOfService` is a caller error:
    /// occupancy accounting becomes undefined.
    #[inline]
    pub fn pop_after_try(&mut self) -> T {
        let queue = &*self.queue;
        let read = queue.consumer_position();
        debug_assert!(
            queue.published_position() != read,
            "pop_after_try without a ready try_pop"
        );

        let value = unsafe { queue.read_slot(read) };
        queue.release(read);
        value
    }

    /// Request shutdown (idempotent, any thread)
    pub fn stop(&self) {
        self.queue.stop();
    }

    /// Has the queue been stopped?
    pub fn is_stopped(&self) -> bool {
        self.queue.is_stopped()
    }

    /// Cloneable handle for supervising threads
    pub fn stop_handle(&self) -> StopHandle<T> {
        StopHandle::new(self.queue.clone())
    }

    /// Queue depth
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Buffered item count snapshot
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
