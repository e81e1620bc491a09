//! Process memory telemetry.
//!
//! Two sources, both advisory:
//! - resident and virtual size from `/proc/self/status` (zero elsewhere)
//! - peak live heap bytes from [`TrackingAllocator`], when the binary
//!   installs it as the global allocator

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Point-in-time process memory, in megabytes (10^6 bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemorySnapshot {
    pub rss_mb: f64,
    pub vms_mb: f64,
}

impl MemorySnapshot {
    #[cfg(target_os = "linux")]
    pub fn read() -> Self {
        let status = std::fs::read_to_string("/proc/self/status").unwrap_or_default();
        parse_status(&status)
    }

    #[cfg(not(target_os = "linux"))]
    pub fn read() -> Self {
        Self::default()
    }
}

/// Pull `VmRSS` and `VmSize` (reported in kB) out of a procfs status file.
pub fn parse_status(status: &str) -> MemorySnapshot {
    let field_kb = |key: &str| -> f64 {
        status
            .lines()
            .find(|line| line.starts_with(key))
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|kb| kb.parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    MemorySnapshot {
        rss_mb: field_kb("VmRSS:") * 1024.0 / 1e6,
        vms_mb: field_kb("VmSize:") * 1024.0 / 1e6,
    }
}

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

/// `System` allocator wrapper that tracks live and peak heap bytes.
///
/// ```ignore
/// #[global_allocator]
/// static GLOBAL: mmbench::TrackingAllocator = mmbench::TrackingAllocator;
/// ```
pub struct TrackingAllocator;

fn record_alloc(size: usize) {
    let current = ALLOCATED.fetch_add(size, Ordering::SeqCst) + size;
    PEAK_ALLOCATED.fetch_max(current, Ordering::SeqCst);
}

fn record_dealloc(size: usize) {
    ALLOCATED.fetch_sub(size, Ordering::SeqCst);
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // SAFETY: same layout handed straight to the system allocator
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        // SAFETY: as for `alloc`
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: ptr was produced by this allocator with this layout
        unsafe { System.dealloc(ptr, layout) };
        record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        // SAFETY: caller upholds the GlobalAlloc::realloc contract
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            if new_size > layout.size() {
                record_alloc(new_size - layout.size());
            } else {
                record_dealloc(layout.size() - new_size);
            }
        }
        new_ptr
    }
}

/// Live heap bytes seen by [`TrackingAllocator`].
pub fn heap_allocated_bytes() -> usize {
    ALLOCATED.load(Ordering::SeqCst)
}

/// Highest live heap byte count since the last [`reset_heap_peak`].
pub fn heap_peak_bytes() -> usize {
    PEAK_ALLOCATED.load(Ordering::SeqCst)
}

pub fn heap_peak_mib() -> f64 {
    heap_peak_bytes() as f64 / BYTES_PER_MIB
}

/// Restart peak tracking from the current live byte count.
pub fn reset_heap_peak() {
    PEAK_ALLOCATED.store(heap_allocated_bytes(), Ordering::SeqCst);
}
