//! Producer handle for RingQueue<T>

use std::sync::Arc;

use super::queue::RingQueue;
use super::StopHandle;

/// The producing side of a [`RingQueue`].
///
/// `Send` but not `Clone`: exactly one thread owns this role. Obtained
/// from [`RingQueue::split`].
pub struct Producer<T> {
    queue: Arc<RingQueue<T>>,
}

impl<T> Producer<T> {
    pub(crate) fn new(queue: Arc<RingQueue<T>>) -> Self {
        Self { queue }
    }

    /// Enqueue `value`, blocking by busy-polling while the queue is full.
    ///
    /// Returns `Err(value)` if shutdown was requested before the call or
    /// while it was blocked; the value is handed back undelivered.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), T> {
        let queue = &*self.queue;
        let write = queue.producer_position();

        loop {
            if queue.is_stopped() {
                return Err(value);
            }
            if write.wrapping_sub(queue.freed_position()) < queue.depth() {
                break;
            }
            std::hint::spin_loop();
        }

        unsafe {
            queue.write_slot(write, value);
        }
        queue.publish(write);
        Ok(())
    }

    /// Report, without side effects, whether a slot is currently free and
    /// shutdown has not been requested.
    #[inline]
    pub fn try_push(&self) -> bool {
        let queue = &*self.queue;
        if queue.is_stopped() {
            return false;
        }
        queue.producer_position().wrapping_sub(queue.freed_position()) < queue.depth()
    }

    /// Enqueue after a successful [`try_push`](Self::try_push), without
    /// re-checking capacity.
    ///
    /// Calling this when the preceding `try_push` did not return `true`
    /// is a caller error: occupancy accounting becomes undefined.
    #[inline]
    pub fn push_after_try(&mut self, value: T) {
        let queue = &*self.queue;
        let write = queue.producer_position();
        debug_assert!(
            write.wrapping_sub(queue.freed_position()) < queue.depth(),
            "push_after_try without a ready try_push"
        );

        unsafe {
            queue.write_slot(write, value);
        }
        queue.publish(write);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_push_respects_capacity() {
        let (mut producer, _consumer) = RingQueue::<u64>::with_capacity_mask(0b11)
            .unwrap()
            .split();

        for i in 0..4 {
            assert!(producer.try_push());
            producer.push_after_try(i);
        }
        assert!(!producer.try_push());
        assert_eq!(producer.len(), 4);
    }

    #[test]
    fn test_push_rejected_after_stop() {
        let (mut producer, _consumer) = RingQueue::<u64>::with_capacity_mask(0b1)
            .unwrap()
            .split();

        producer.push(7).unwrap();
        producer.stop();

        assert!(!producer.try_push());
        assert_eq!(producer.push(8), Err(8));
        assert_eq!(producer.len(), 1);
    }

    #[test]
    fn test_stop_handle_reaches_producer() {
        let (producer, _consumer) = RingQueue::<u64>::with_capacity_mask(0b1)
            .unwrap()
            .split();

        let supervisor = producer.stop_handle();
        assert!(!supervisor.is_stopped());
        supervisor.clone().stop();
        assert!(producer.is_stopped());
    }
}
