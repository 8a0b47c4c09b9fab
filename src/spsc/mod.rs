//! Lock-free single-producer/single-consumer ring queue.
//!
//! ## Shape
//!
//! | Type | Role |
//! |------|------|
//! | `RingQueue<T>` | the ring itself; construct, then `split()` |
//! | `Producer<T>` | `push` / `try_push` / `push_after_try` |
//! | `Consumer<T>` | `pop` / `try_pop` / `pop_after_try` |
//! | `StopHandle<T>` | cloneable shutdown trigger for supervisors |
//!
//! Blocking operations busy-poll; the `try_*` / `*_after_try` pairs are
//! the escape hatch for callers that must not burn a core on idle
//! traffic (pair them with [`crate::park::Waiter`]).
//!
//! ## Shutdown
//!
//! `stop()` snapshots the write position and sets the stop flag. The
//! consumer keeps draining until it reaches the snapshot, then `pop`
//! returns `None` forever: RUNNING -> DRAINING -> STOPPED.

pub mod queue;
pub mod producer;
pub mod consumer;

pub use queue::RingQueue;
pub use producer::Producer;
pub use consumer::{ Consumer, PopState };

use std::sync::Arc;

use serde::{ Deserialize, Serialize };

use crate::constants::DEFAULT_CAPACITY_MASK;
use crate::error::Result;

/// Construction-time configuration for a [`RingQueue`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Contiguous low-bit mask; queue depth is `capacity_mask + 1`
    pub capacity_mask: u64,
    /// Allocate via anonymous mmap + mlock instead of the heap
    #[serde(default)]
    pub mapped: bool,
}

impl QueueConfig {
    /// Create a configuration with the given capacity mask.
    ///
    /// The mask is validated here so a bad value fails at configuration
    /// time rather than at queue construction.
    pub fn new(capacity_mask: u64) -> Result<Self> {
        // Runs the same checks construction would
        queue::validate_mask(capacity_mask)?;
        Ok(Self {
            capacity_mask,
            mapped: false,
        })
    }

    /// Use mmap + mlock backed slot storage
    pub fn with_mapped(mut self, mapped: bool) -> Self {
        self.mapped = mapped;
        self
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity_mask: DEFAULT_CAPACITY_MASK,
            mapped: false,
        }
    }
}

/// Cloneable shutdown handle for threads outside the producer/consumer
/// pair, e.g. a supervisor deciding when to wind the hand-off down.
pub struct StopHandle<T> {
    queue: Arc<RingQueue<T>>,
}

impl<T> StopHandle<T> {
    pub(crate) fn new(queue: Arc<RingQueue<T>>) -> Self {
        Self { queue }
    }

    /// Request shutdown (idempotent)
    pub fn stop(&self) {
        self.queue.stop();
    }

    /// Has the queue been stopped?
    pub fn is_stopped(&self) -> bool {
        self.queue.is_stopped()
    }
}

impl<T> Clone for StopHandle<T> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = QueueConfig::new(0b1111).unwrap();
        assert_eq!(config.capacity_mask, 0b1111);
        assert!(!config.mapped);

        let queue = RingQueue::<u64>::with_config(&config).unwrap();
        assert_eq!(queue.capacity(), 16);
    }

    #[test]
    fn test_config_invalid_mask() {
        assert!(QueueConfig::new(0).is_err());
        assert!(QueueConfig::new(0b01001111).is_err());
    }

    #[test]
    fn test_config_mapped_builder() {
        let config = QueueConfig::new(0b11).unwrap().with_mapped(true);
        let queue = RingQueue::<u64>::with_config(&config).unwrap();
        assert_eq!(queue.capacity(), 4);
    }

    #[test]
    fn test_config_default_is_valid() {
        let config = QueueConfig::default();
        assert!(RingQueue::<u64>::with_config(&config).is_ok());
    }
}
