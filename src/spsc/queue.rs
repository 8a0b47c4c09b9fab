//! RingQueue - fixed-capacity SPSC ring queue core
//!
//! The queue is a bounded circular buffer of cache-line padded slots
//! indexed by two monotonically increasing positions. The producer thread
//! is the only writer of `write_position`, the consumer thread the only
//! writer of `read_position`; that single-writer-per-field rule is what
//! makes unsynchronized access by exactly two threads sound.
//!
//! ## Allocation strategies
//!
//! - `with_capacity_mask()` - standard heap allocation
//! - `with_capacity_mask_mapped()` - anonymous mmap with mlock (no page
//!   faults on the hot path)
//!
//! One padded guard cell sits before and after the ring, and a guard line
//! brackets the control block, so hardware prefetch past the edges of the
//! allocation never touches a line owned by the opposite thread.

use std::cell::UnsafeCell;
use std::mem::{ self, MaybeUninit };
use std::ptr;
use std::sync::atomic::{ fence, AtomicBool, AtomicU64, Ordering };
use std::sync::Arc;

use crate::constants::{ CACHE_LINE_SIZE, MAX_CAPACITY };
use crate::error::{ Result, SluiceError };
use super::{ Consumer, Producer, QueueConfig };

/// Check that `mask` is a non-zero contiguous low-bit run and decode the
/// queue depth it encodes.
pub(crate) fn validate_mask(mask: u64) -> Result<usize> {
    if mask == 0 {
        return Err(SluiceError::config("Capacity mask must be non-zero"));
    }
    // A contiguous run from the LSB means mask + 1 is a power of two
    if mask & mask.wrapping_add(1) != 0 {
        return Err(
            SluiceError::config(
                format!(
                    "Capacity mask must be contiguous bits set from the LSB, e.g. 0b1111 not {:#b}",
                    mask
                )
            )
        );
    }
    if mask >= MAX_CAPACITY {
        return Err(
            SluiceError::config(
                format!("Queue depth {} exceeds maximum {}", (mask as u128) + 1, MAX_CAPACITY)
            )
        );
    }
    Ok((mask + 1) as usize)
}

/// One storage cell, padded to a whole number of cache lines so that no
/// two slots share a line.
#[repr(C, align(64))]
pub(crate) struct Slot<T> {
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        // Zero-initialized like the mmap path; the zeroes are never read
        // as T, slots only become initialized by a publish
        Self {
            value: UnsafeCell::new(MaybeUninit::zeroed()),
        }
    }
}

/// A control field isolated on its own cache line
#[repr(C, align(64))]
struct Padded<V>(V);

/// One untouched cache line bracketing the hot fields
#[repr(C, align(64))]
struct GuardLine([u8; CACHE_LINE_SIZE]);

impl GuardLine {
    const fn new() -> Self {
        Self([0u8; CACHE_LINE_SIZE])
    }
}

/// Shutdown flags. Written once by the first `stop()` caller, read by both
/// threads; cold enough to share a line.
struct StopState {
    claim: AtomicBool,
    requested: AtomicBool,
}

/// Fixed-capacity lock-free SPSC ring queue.
///
/// Constructed once with a contiguous low-bit capacity mask, used by
/// exactly one producer and one consumer thread via [`split`](Self::split),
/// stopped at most once, then dropped. There is no resize and no reset.
#[repr(C)]
pub struct RingQueue<T> {
    _guard_head: GuardLine,
    /// Next position the producer will write. Producer-only writer.
    write_position: Padded<AtomicU64>,
    /// Next position the consumer will read. Consumer-only writer.
    read_position: Padded<AtomicU64>,
    /// Snapshot of `write_position` at the moment of `stop()`; valid only
    /// once `stop_requested` is observable.
    stop_at_position: Padded<AtomicU64>,
    stop_state: Padded<StopState>,
    /// Direct pointer to slot 0 (guard cell precedes it)
    buffer: *mut Slot<T>,
    mask: u64,
    capacity: u64,
    /// Keep heap allocation alive (None for mmap)
    _heap: Option<Box<[Slot<T>]>>,
    /// mmap'd allocation, for Drop
    is_mapped: bool,
    map_len: usize,
    _guard_tail: GuardLine,
}

unsafe impl<T: Send> Send for RingQueue<T> {}
unsafe impl<T: Send> Sync for RingQueue<T> {}

impl<T> RingQueue<T> {
    /// Create with heap allocation.
    ///
    /// `capacity_mask` must be a contiguous run of set bits starting at
    /// bit 0 (`0b1111`, not `0b01001111`); queue depth is `mask + 1`.
    pub fn with_capacity_mask(capacity_mask: u64) -> Result<Self> {
        let capacity = validate_mask(capacity_mask)?;

        // capacity slots plus one guard cell at each edge
        let cells: Box<[Slot<T>]> = (0..capacity + 2)
            .map(|_| Slot::empty())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        let base = cells.as_ptr() as *mut Slot<T>;

        let queue = Self {
            _guard_head: GuardLine::new(),
            write_position: Padded(AtomicU64::new(0)),
            read_position: Padded(AtomicU64::new(0)),
            stop_at_position: Padded(AtomicU64::new(0)),
            stop_state: Padded(StopState {
                claim: AtomicBool::new(false),
                requested: AtomicBool::new(false),
            }),
            buffer: unsafe { base.add(1) },
            mask: capacity_mask,
            capacity: capacity as u64,
            _heap: Some(cells),
            is_mapped: false,
            map_len: 0,
            _guard_tail: GuardLine::new(),
        };

        queue.validate_alignment()?;
        Ok(queue)
    }

    /// Create with anonymous memory-mapped allocation (mmap + mlock).
    ///
    /// Locking the pages keeps the hot path free of page faults; otherwise
    /// identical to [`with_capacity_mask`](Self::with_capacity_mask).
    pub fn with_capacity_mask_mapped(capacity_mask: u64) -> Result<Self> {
        let capacity = validate_mask(capacity_mask)?;
        let map_len = (capacity + 2) * mem::size_of::<Slot<T>>();

        let base = unsafe {
            let p = libc::mmap(
                ptr::null_mut(),
                map_len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0
            );

            if p == libc::MAP_FAILED {
                return Err(SluiceError::memory("mmap failed"));
            }

            // Lock memory to prevent swapping; best effort
            let _ = libc::mlock(p, map_len);

            ptr::write_bytes(p as *mut u8, 0, map_len);

            p as *mut Slot<T>
        };

        let queue = Self {
            _guard_head: GuardLine::new(),
            write_position: Padded(AtomicU64::new(0)),
            read_position: Padded(AtomicU64::new(0)),
            stop_at_position: Padded(AtomicU64::new(0)),
            stop_state: Padded(StopState {
                claim: AtomicBool::new(false),
                requested: AtomicBool::new(false),
            }),
            buffer: unsafe { base.add(1) },
            mask: capacity_mask,
            capacity: capacity as u64,
            _heap: None,
            is_mapped: true,
            map_len,
            _guard_tail: GuardLine::new(),
        };

        queue.validate_alignment()?;
        Ok(queue)
    }

    /// Create from a [`QueueConfig`]
    pub fn with_config(config: &QueueConfig) -> Result<Self> {
        if config.mapped {
            Self::with_capacity_mask_mapped(config.capacity_mask)
        } else {
            Self::with_capacity_mask(config.capacity_mask)
        }
    }

    /// Split into the two role handles.
    ///
    /// The handles are `Send` and not `Clone`: exactly one thread may hold
    /// each role for the lifetime of the queue.
    pub fn split(self) -> (Producer<T>, Consumer<T>) {
        let queue = Arc::new(self);
        (Producer::new(queue.clone()), Consumer::new(queue))
    }

    /// Position counters must sit on the platform's natural word alignment
    /// for their loads and stores to be single operations.
    fn validate_alignment(&self) -> Result<()> {
        let write = &self.write_position.0 as *const AtomicU64 as usize;
        let read = &self.read_position.0 as *const AtomicU64 as usize;
        if write % mem::align_of::<AtomicU64>() != 0 || read % mem::align_of::<AtomicU64>() != 0 {
            return Err(SluiceError::config("Queue position counters are misaligned in memory"));
        }
        Ok(())
    }

    /// Queue depth (capacity mask + 1)
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Capacity mask used for index wrap-around
    #[inline(always)]
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// Number of items currently buffered.
    ///
    /// Loads the read position first so the result can never appear
    /// negative; it is a snapshot, exact only while the counterpart
    /// thread is quiescent.
    pub fn len(&self) -> usize {
        let read = self.read_position.0.load(Ordering::Acquire);
        let write = self.write_position.0.load(Ordering::Acquire);
        write.wrapping_sub(read) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Request shutdown. Callable from any thread, idempotent.
    ///
    /// Snapshots `write_position` as the drain boundary, then publishes
    /// the stop flag. Already-buffered items are still delivered; the
    /// snapshot only tells the consumer where draining ends.
    pub fn stop(&self) {
        if self.stop_state.0.claim.swap(true, Ordering::AcqRel) {
            return;
        }
        let snapshot = self.write_position.0.load(Ordering::Acquire);
        self.stop_at_position.0.store(snapshot, Ordering::Relaxed);
        // Release: the snapshot store above is visible to whoever
        // acquires the flag
        self.stop_state.0.requested.store(true, Ordering::Release);
    }

    /// Has `stop()` been called?
    #[inline(always)]
    pub fn is_stopped(&self) -> bool {
        self.stop_state.0.requested.load(Ordering::Acquire)
    }

    /// Drain boundary recorded by `stop()`. Valid only once
    /// `is_stopped()` returned true.
    #[inline(always)]
    pub(crate) fn stop_at(&self) -> u64 {
        self.stop_at_position.0.load(Ordering::Relaxed)
    }

    #[inline(always)]
    pub(crate) fn depth(&self) -> u64 {
        self.capacity
    }

    /// Producer's own position; producer thread only
    #[inline(always)]
    pub(crate) fn producer_position(&self) -> u64 {
        self.write_position.0.load(Ordering::Relaxed)
    }

    /// Consumer's own position; consumer thread only
    #[inline(always)]
    pub(crate) fn consumer_position(&self) -> u64 {
        self.read_position.0.load(Ordering::Relaxed)
    }

    /// Highest published position, as seen by the consumer
    #[inline(always)]
    pub(crate) fn published_position(&self) -> u64 {
        self.write_position.0.load(Ordering::Acquire)
    }

    /// Highest freed position, as seen by the producer
    #[inline(always)]
    pub(crate) fn freed_position(&self) -> u64 {
        self.read_position.0.load(Ordering::Acquire)
    }

    #[inline(always)]
    fn slot_ptr(&self, position: u64) -> *mut T {
        let idx = (position & self.mask) as usize;
        unsafe { (*self.buffer.add(idx)).value.get() as *mut T }
    }

    /// Move a value into the slot at `position`.
    ///
    /// # Safety
    /// Producer thread only, and the slot must be free: the occupancy
    /// check for `position` must have passed since the consumer last
    /// advanced past it.
    #[inline(always)]
    pub(crate) unsafe fn write_slot(&self, position: u64, value: T) {
        ptr::write(self.slot_ptr(position), value);
    }

    /// Move the value out of the slot at `position`.
    ///
    /// # Safety
    /// Consumer thread only, and `position` must have been published.
    #[inline(always)]
    pub(crate) unsafe fn read_slot(&self, position: u64) -> T {
        ptr::read(self.slot_ptr(position))
    }

    /// Publish the slot written at `position`: the payload store becomes
    /// visible before the position increment that signals availability.
    #[inline(always)]
    pub(crate) fn publish(&self, position: u64) {
        fence(Ordering::Release);
        self.write_position.0.store(position.wrapping_add(1), Ordering::Relaxed);
    }

    /// Free the slot read at `position`: the payload read completes
    /// before the increment hands the slot back to the producer.
    #[inline(always)]
    pub(crate) fn release(&self, position: u64) {
        fence(Ordering::Release);
        self.read_position.0.store(position.wrapping_add(1), Ordering::Relaxed);
    }
}

impl<T> Drop for RingQueue<T> {
    fn drop(&mut self) {
        // Drain unconsumed values; positions in [read, write) hold
        // initialized payloads
        if mem::needs_drop::<T>() {
            let mut position = self.read_position.0.load(Ordering::Acquire);
            let published = self.write_position.0.load(Ordering::Acquire);
            while position != published {
                unsafe {
                    ptr::drop_in_place(self.slot_ptr(position));
                }
                position = position.wrapping_add(1);
            }
        }

        if self.is_mapped && !self.buffer.is_null() {
            unsafe {
                libc::munmap(self.buffer.sub(1) as *mut libc::c_void, self.map_len);
            }
        }
        // Heap storage (_heap) is dropped automatically; slots hold
        // MaybeUninit so the box never double-drops payloads
    }
}
