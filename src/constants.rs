//! Core constants used by the ring queue implementation.

/// Cache line size for alignment (64 bytes on most CPUs)
pub const CACHE_LINE_SIZE: usize = 64;

/// Default capacity mask (contiguous low bits, depth = mask + 1)
pub const DEFAULT_CAPACITY_MASK: u64 = 0b1111_1111_1111; // 4096 slots

/// Maximum queue depth accepted at construction
pub const MAX_CAPACITY: u64 = 4 * 1024 * 1024; // 4M slots

/// Page size for memory allocation
pub const PAGE_SIZE: usize = 4096;
