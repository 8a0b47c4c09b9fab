//! sluice - lock-free SPSC ring queue for latency-critical hand-off
//!
//! A fixed-capacity ring buffer moving values between exactly two
//! threads with no locks and no system calls on the hot path. Slots and
//! position counters are isolated on their own cache lines so the
//! producer and consumer never invalidate each other's lines, and
//! publication uses release/acquire ordering so a value is fully visible
//! before the position increment that announces it.
//!
//! ```
//! use sluice::RingQueue;
//! use std::thread;
//!
//! let (mut producer, mut consumer) = RingQueue::<u64>::with_capacity_mask(0b1111)
//!     .unwrap()
//!     .split();
//!
//! let feeder = thread::spawn(move || {
//!     for i in 0..1000 {
//!         producer.push(i).unwrap();
//!     }
//!     producer.stop();
//! });
//!
//! let mut next = 0;
//! while let Some(value) = consumer.pop() {
//!     assert_eq!(value, next);
//!     next += 1;
//! }
//! assert_eq!(next, 1000);
//! feeder.join().unwrap();
//! ```
//!
//! Blocking `push`/`pop` busy-poll; `try_push`/`try_pop` with
//! their `*_after_try` counterparts are the non-spinning alternative for
//! low-frequency traffic, optionally paired with [`park::Waiter`].
//! `stop()` (any thread, idempotent) starts a drain-then-stop shutdown:
//! buffered items are still delivered, then `pop` returns `None` forever.

pub mod constants;
pub mod error;
pub mod cpu;
pub mod checksum;
pub mod block;
pub mod park;
pub mod spsc;

pub use error::{ Result, SluiceError };
pub use spsc::{ Consumer, PopState, Producer, QueueConfig, RingQueue, StopHandle };
pub use block::StampedBlock;
pub use park::Waiter;
