#![expect(
    unsafe_code,
    reason = "device allocate/free through resolved driver entry points"
)]

//! RAII device memory.

use std::sync::Arc;

use tracing::{trace, warn};

use super::ffi::{self, CUdeviceptr};
use super::{CudaDriver, CudaError};

/// One device allocation, freed exactly once on drop.
///
/// Holds the driver `Arc` so the library cannot unload while the address is
/// live. Deliberately not `Clone`: this object is the sole owner of its
/// allocation and the only place its free may happen.
pub struct DeviceBuffer {
    driver: Arc<CudaDriver>,
    ptr: CUdeviceptr,
    size: usize,
}

impl std::fmt::Debug for DeviceBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceBuffer")
            .field("ptr", &format_args!("{:#x}", self.ptr))
            .field("size", &self.size)
            .finish()
    }
}

impl DeviceBuffer {
    /// Allocate `size` bytes on the device through the shared driver,
    /// constructing the driver if no instance is live.
    pub fn new(size: usize) -> Result<Self, CudaError> {
        Self::with_driver(CudaDriver::get()?, size)
    }

    /// Allocate against an explicit driver handle.
    pub fn with_driver(driver: Arc<CudaDriver>, size: usize) -> Result<Self, CudaError> {
        let mut ptr: CUdeviceptr = 0;
        // Safety: required symbol resolved at driver construction; the out
        // pointer is local.
        let rc = unsafe { (driver.mem_alloc)(&mut ptr, size) };
        if rc != ffi::CUDA_SUCCESS {
            return Err(CudaError::Call {
                call: "cuMemAlloc",
                code: rc,
            });
        }
        trace!("allocated {size} device bytes at {ptr:#x}");
        Ok(Self { driver, ptr, size })
    }

    /// Device address of the allocation. Valid only while `self` is alive.
    pub fn device_ptr(&self) -> CUdeviceptr {
        self.ptr
    }

    /// Originally requested size in bytes, not the driver's rounded size.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the allocation was requested with size zero.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl Drop for DeviceBuffer {
    fn drop(&mut self) {
        // Safety: `ptr` came from this buffer's cuMemAlloc and is freed
        // exactly once.
        let rc = unsafe { (self.driver.mem_free)(self.ptr) };
        if rc != ffi::CUDA_SUCCESS {
            warn!("cuMemFree({:#x}) returned {rc}", self.ptr);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::super::ffi::{CUresult, CUDA_ERROR_OUT_OF_MEMORY, CUDA_SUCCESS};
    use super::super::test_support::FakeSource;
    use super::*;

    // The counting stubs below are process-wide, so tests touching them
    // serialize on this lock.
    static COUNTER_LOCK: Mutex<()> = Mutex::new(());

    static ALLOC_CALLS: AtomicUsize = AtomicUsize::new(0);
    static FREE_CALLS: AtomicUsize = AtomicUsize::new(0);
    static LAST_ALLOC_SIZE: AtomicUsize = AtomicUsize::new(0);
    static LAST_FREED: AtomicU64 = AtomicU64::new(0);
    static NEXT_PTR: AtomicU64 = AtomicU64::new(0xA000_0000);

    unsafe extern "system" fn counted_alloc(dptr: *mut CUdeviceptr, bytesize: usize) -> CUresult {
        ALLOC_CALLS.fetch_add(1, Ordering::SeqCst);
        LAST_ALLOC_SIZE.store(bytesize, Ordering::SeqCst);
        unsafe { *dptr = NEXT_PTR.fetch_add(0x1000, Ordering::SeqCst) };
        CUDA_SUCCESS
    }

    unsafe extern "system" fn counted_free(dptr: CUdeviceptr) -> CUresult {
        FREE_CALLS.fetch_add(1, Ordering::SeqCst);
        LAST_FREED.store(dptr, Ordering::SeqCst);
        CUDA_SUCCESS
    }

    unsafe extern "system" fn failing_alloc(_dptr: *mut CUdeviceptr, _bytesize: usize) -> CUresult {
        CUDA_ERROR_OUT_OF_MEMORY
    }

    fn counted_driver() -> Arc<CudaDriver> {
        let mut source = FakeSource::full();
        source.insert("cuMemAlloc_v2", counted_alloc as usize);
        source.insert("cuMemFree_v2", counted_free as usize);
        Arc::new(CudaDriver::from_source(Box::new(source)).unwrap())
    }

    fn reset_counters() {
        ALLOC_CALLS.store(0, Ordering::SeqCst);
        FREE_CALLS.store(0, Ordering::SeqCst);
        LAST_ALLOC_SIZE.store(0, Ordering::SeqCst);
        LAST_FREED.store(0, Ordering::SeqCst);
    }

    #[test]
    fn allocation_pairs_one_alloc_with_one_free() {
        let _guard = COUNTER_LOCK.lock();
        let driver = counted_driver();

        for size in [0usize, 16 << 20] {
            reset_counters();

            let buffer = DeviceBuffer::with_driver(Arc::clone(&driver), size).unwrap();
            assert_eq!(ALLOC_CALLS.load(Ordering::SeqCst), 1);
            assert_eq!(LAST_ALLOC_SIZE.load(Ordering::SeqCst), size);
            assert_eq!(buffer.len(), size);
            assert_eq!(buffer.is_empty(), size == 0);

            let ptr = buffer.device_ptr();
            drop(buffer);
            assert_eq!(FREE_CALLS.load(Ordering::SeqCst), 1);
            assert_eq!(LAST_FREED.load(Ordering::SeqCst), ptr);
        }
    }

    #[test]
    fn failed_allocation_is_fatal_and_frees_nothing() {
        let _guard = COUNTER_LOCK.lock();
        reset_counters();

        let mut source = FakeSource::full();
        source.insert("cuMemAlloc_v2", failing_alloc as usize);
        source.insert("cuMemFree_v2", counted_free as usize);
        let driver = Arc::new(CudaDriver::from_source(Box::new(source)).unwrap());

        let err = DeviceBuffer::with_driver(driver, 4096).unwrap_err();
        match err {
            CudaError::Call { call, code } => {
                assert_eq!(call, "cuMemAlloc");
                assert_eq!(code, CUDA_ERROR_OUT_OF_MEMORY);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(FREE_CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn buffer_holds_a_driver_reference() {
        let _guard = COUNTER_LOCK.lock();
        let driver = counted_driver();
        assert_eq!(Arc::strong_count(&driver), 1);

        let buffer = DeviceBuffer::with_driver(Arc::clone(&driver), 64).unwrap();
        assert_eq!(Arc::strong_count(&driver), 2);

        drop(buffer);
        assert_eq!(Arc::strong_count(&driver), 1);
    }
}
