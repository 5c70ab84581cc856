#![expect(
    unsafe_code,
    reason = "calls through resolved driver entry points"
)]

//! Resolved CUDA driver entry-point table and its process-wide lifecycle.
//!
//! [`CudaDriver`] opens the driver library, resolves every entry point the
//! encode paths use, runs `cuInit`, and is handed out behind an `Arc`.
//! [`DriverSlot`] tracks the live instance weakly: acquiring through the
//! slot reuses the running driver, and once the last `Arc` drops the library
//! unloads, so a later acquire starts over from a clean load.

use std::os::raw::c_int;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::ffi;
use super::loader::{self, Resolver, SymbolSource, SymbolSpec};
use super::{driver_version_parts, CudaError};

/// Resolved CUDA driver entry points.
///
/// Required entry points are bare function pointers; entry points missing
/// from older drivers are `Option` and callers check for presence. Field
/// docs give the exported name each pointer was resolved from.
pub struct CudaDriver {
    // Keeps the library mapped for as long as any resolved pointer may be
    // called.
    _source: Box<dyn SymbolSource + Send + Sync>,

    // Initialization
    /// `cuInit`
    pub init: ffi::CuInitFn,
    /// `cuDriverGetVersion`
    pub driver_get_version: ffi::CuDriverGetVersionFn,

    // Primary context
    /// `cuDevicePrimaryCtxRetain`
    pub device_primary_ctx_retain: ffi::CuDevicePrimaryCtxRetainFn,
    /// `cuDevicePrimaryCtxRelease_v2`
    pub device_primary_ctx_release: ffi::CuDevicePrimaryCtxReleaseFn,
    /// `cuDevicePrimaryCtxSetFlags_v2`
    pub device_primary_ctx_set_flags: Option<ffi::CuDevicePrimaryCtxSetFlagsFn>,

    // Context management
    /// `cuCtxCreate_v2`
    pub ctx_create: ffi::CuCtxCreateFn,
    /// `cuCtxDestroy_v2`
    pub ctx_destroy: ffi::CuCtxDestroyFn,
    /// `cuCtxPushCurrent_v2`
    pub ctx_push_current: ffi::CuCtxPushCurrentFn,
    /// `cuCtxPopCurrent_v2`
    pub ctx_pop_current: ffi::CuCtxPopCurrentFn,
    /// `cuCtxGetCurrent`
    pub ctx_get_current: Option<ffi::CuCtxGetCurrentFn>,
    /// `cuCtxSetCurrent`
    pub ctx_set_current: Option<ffi::CuCtxSetCurrentFn>,
    /// `cuCtxGetStreamPriorityRange`
    pub ctx_get_stream_priority_range: ffi::CuCtxGetStreamPriorityRangeFn,
    /// `cuCtxSynchronize`
    pub ctx_synchronize: ffi::CuCtxSynchronizeFn,

    // Memory management
    /// `cuMemAlloc_v2`
    pub mem_alloc: ffi::CuMemAllocFn,
    /// `cuMemAllocPitch_v2`
    pub mem_alloc_pitch: ffi::CuMemAllocPitchFn,
    /// `cuMemFree_v2`
    pub mem_free: ffi::CuMemFreeFn,
    /// `cuMemcpy`
    pub memcpy: ffi::CuMemcpyFn,
    /// `cuMemcpy2D_v2`
    pub memcpy_2d: ffi::CuMemcpy2DFn,
    /// `cuMemcpy2DAsync_v2`
    pub memcpy_2d_async: ffi::CuMemcpy2DAsyncFn,
    /// `cuArrayGetDescriptor_v2`
    pub array_get_descriptor: Option<ffi::CuArrayGetDescriptorFn>,
    /// `cuMemcpyAtoA_v2`
    pub memcpy_atoa: Option<ffi::CuMemcpyAtoAFn>,
    /// `cuMemcpyAtoD_v2`
    pub memcpy_atod: Option<ffi::CuMemcpyAtoDFn>,
    /// `cuMemcpyAtoH_v2`
    pub memcpy_atoh: Option<ffi::CuMemcpyAtoHFn>,
    /// `cuMemcpyAtoHAsync_v2`
    pub memcpy_atoh_async: Option<ffi::CuMemcpyAtoHAsyncFn>,
    /// `cuMemcpyDtoA_v2`
    pub memcpy_dtoa: Option<ffi::CuMemcpyDtoAFn>,
    /// `cuMemcpyDtoD_v2`
    pub memcpy_dtod: Option<ffi::CuMemcpyDtoDFn>,
    /// `cuMemcpyDtoH_v2`
    pub memcpy_dtoh: Option<ffi::CuMemcpyDtoHFn>,
    /// `cuMemcpyDtoHAsync_v2`
    pub memcpy_dtoh_async: Option<ffi::CuMemcpyDtoHAsyncFn>,
    /// `cuMemcpyHtoA_v2`
    pub memcpy_htoa: Option<ffi::CuMemcpyHtoAFn>,
    /// `cuMemcpyHtoAAsync_v2`
    pub memcpy_htoa_async: Option<ffi::CuMemcpyHtoAAsyncFn>,
    /// `cuMemcpyHtoD_v2`
    pub memcpy_htod: Option<ffi::CuMemcpyHtoDFn>,
    /// `cuMemcpyHtoDAsync_v2`
    pub memcpy_htod_async: Option<ffi::CuMemcpyHtoDAsyncFn>,
    /// `cuMemHostGetDevicePointer_v2`
    pub mem_host_get_device_pointer: Option<ffi::CuMemHostGetDevicePointerFn>,

    // Stream management
    /// `cuStreamCreate`
    pub stream_create: ffi::CuStreamCreateFn,
    /// `cuStreamCreateWithPriority`
    pub stream_create_with_priority: Option<ffi::CuStreamCreateWithPriorityFn>,
    /// `cuStreamDestroy_v2`
    pub stream_destroy: ffi::CuStreamDestroyFn,
    /// `cuStreamSynchronize`
    pub stream_synchronize: ffi::CuStreamSynchronizeFn,
    /// `cuStreamGetPriority`
    pub stream_get_priority: Option<ffi::CuStreamGetPriorityFn>,

    // Graphics interop
    /// `cuGraphicsMapResources`
    pub graphics_map_resources: ffi::CuGraphicsMapResourcesFn,
    /// `cuGraphicsSubResourceGetMappedArray`
    pub graphics_sub_resource_get_mapped_array: ffi::CuGraphicsSubResourceGetMappedArrayFn,
    /// `cuGraphicsUnmapResources`
    pub graphics_unmap_resources: ffi::CuGraphicsUnmapResourcesFn,
    /// `cuGraphicsUnregisterResource`
    pub graphics_unregister_resource: ffi::CuGraphicsUnregisterResourceFn,

    // Direct3D interop
    /// `cuD3D10GetDevice`
    #[cfg(windows)]
    pub d3d10_get_device: ffi::CuD3D10GetDeviceFn,
    /// `cuGraphicsD3D10RegisterResource`
    #[cfg(windows)]
    pub graphics_d3d10_register_resource: Option<ffi::CuGraphicsD3D10RegisterResourceFn>,
    /// `cuD3D11GetDevice`
    #[cfg(windows)]
    pub d3d11_get_device: ffi::CuD3D11GetDeviceFn,
    /// `cuGraphicsD3D11RegisterResource`
    #[cfg(windows)]
    pub graphics_d3d11_register_resource: Option<ffi::CuGraphicsD3D11RegisterResourceFn>,
}

impl std::fmt::Debug for CudaDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CudaDriver")
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}

impl CudaDriver {
    /// Open the platform driver library and resolve the full table.
    pub fn load() -> Result<Self, CudaError> {
        let library = loader::open_driver_library()?;
        Self::from_source(Box::new(library))
    }

    /// Shared process-wide driver, constructing it if no instance is live.
    pub fn get() -> Result<Arc<Self>, CudaError> {
        DRIVER_SLOT.acquire_with(Self::load)
    }

    /// Resolve the table against an already-opened symbol source.
    pub(crate) fn from_source(
        source: Box<dyn SymbolSource + Send + Sync>,
    ) -> Result<Self, CudaError> {
        let r = Resolver::new(source.as_ref());

        // Initialization
        let init: ffi::CuInitFn = r.required(SymbolSpec::plain("cuInit"))?;
        let driver_get_version: ffi::CuDriverGetVersionFn =
            r.required(SymbolSpec::plain("cuDriverGetVersion"))?;

        // Primary context
        let device_primary_ctx_retain: ffi::CuDevicePrimaryCtxRetainFn =
            r.required(SymbolSpec::plain("cuDevicePrimaryCtxRetain"))?;
        let device_primary_ctx_release: ffi::CuDevicePrimaryCtxReleaseFn =
            r.required(SymbolSpec::v2("cuDevicePrimaryCtxRelease"))?;
        let device_primary_ctx_set_flags: Option<ffi::CuDevicePrimaryCtxSetFlagsFn> =
            r.optional(SymbolSpec::v2("cuDevicePrimaryCtxSetFlags"));

        // Context management
        let ctx_create: ffi::CuCtxCreateFn = r.required(SymbolSpec::v2("cuCtxCreate"))?;
        let ctx_destroy: ffi::CuCtxDestroyFn = r.required(SymbolSpec::v2("cuCtxDestroy"))?;
        let ctx_push_current: ffi::CuCtxPushCurrentFn =
            r.required(SymbolSpec::v2("cuCtxPushCurrent"))?;
        let ctx_pop_current: ffi::CuCtxPopCurrentFn =
            r.required(SymbolSpec::v2("cuCtxPopCurrent"))?;
        let ctx_get_current: Option<ffi::CuCtxGetCurrentFn> =
            r.optional(SymbolSpec::plain("cuCtxGetCurrent"));
        let ctx_set_current: Option<ffi::CuCtxSetCurrentFn> =
            r.optional(SymbolSpec::plain("cuCtxSetCurrent"));
        let ctx_get_stream_priority_range: ffi::CuCtxGetStreamPriorityRangeFn =
            r.required(SymbolSpec::plain("cuCtxGetStreamPriorityRange"))?;
        let ctx_synchronize: ffi::CuCtxSynchronizeFn =
            r.required(SymbolSpec::plain("cuCtxSynchronize"))?;

        // Memory management
        let mem_alloc: ffi::CuMemAllocFn = r.required(SymbolSpec::v2("cuMemAlloc"))?;
        let mem_alloc_pitch: ffi::CuMemAllocPitchFn =
            r.required(SymbolSpec::v2("cuMemAllocPitch"))?;
        let mem_free: ffi::CuMemFreeFn = r.required(SymbolSpec::v2("cuMemFree"))?;
        let memcpy: ffi::CuMemcpyFn = r.required(SymbolSpec::plain("cuMemcpy"))?;
        let memcpy_2d: ffi::CuMemcpy2DFn = r.required(SymbolSpec::v2("cuMemcpy2D"))?;
        let memcpy_2d_async: ffi::CuMemcpy2DAsyncFn =
            r.required(SymbolSpec::v2("cuMemcpy2DAsync"))?;
        let array_get_descriptor: Option<ffi::CuArrayGetDescriptorFn> =
            r.optional(SymbolSpec::v2("cuArrayGetDescriptor"));
        let memcpy_atoa: Option<ffi::CuMemcpyAtoAFn> = r.optional(SymbolSpec::v2("cuMemcpyAtoA"));
        let memcpy_atod: Option<ffi::CuMemcpyAtoDFn> = r.optional(SymbolSpec::v2("cuMemcpyAtoD"));
        let memcpy_atoh: Option<ffi::CuMemcpyAtoHFn> = r.optional(SymbolSpec::v2("cuMemcpyAtoH"));
        let memcpy_atoh_async: Option<ffi::CuMemcpyAtoHAsyncFn> =
            r.optional(SymbolSpec::v2("cuMemcpyAtoHAsync"));
        let memcpy_dtoa: Option<ffi::CuMemcpyDtoAFn> = r.optional(SymbolSpec::v2("cuMemcpyDtoA"));
        let memcpy_dtod: Option<ffi::CuMemcpyDtoDFn> = r.optional(SymbolSpec::v2("cuMemcpyDtoD"));
        let memcpy_dtoh: Option<ffi::CuMemcpyDtoHFn> = r.optional(SymbolSpec::v2("cuMemcpyDtoH"));
        let memcpy_dtoh_async: Option<ffi::CuMemcpyDtoHAsyncFn> =
            r.optional(SymbolSpec::v2("cuMemcpyDtoHAsync"));
        let memcpy_htoa: Option<ffi::CuMemcpyHtoAFn> = r.optional(SymbolSpec::v2("cuMemcpyHtoA"));
        let memcpy_htoa_async: Option<ffi::CuMemcpyHtoAAsyncFn> =
            r.optional(SymbolSpec::v2("cuMemcpyHtoAAsync"));
        let memcpy_htod: Option<ffi::CuMemcpyHtoDFn> = r.optional(SymbolSpec::v2("cuMemcpyHtoD"));
        let memcpy_htod_async: Option<ffi::CuMemcpyHtoDAsyncFn> =
            r.optional(SymbolSpec::v2("cuMemcpyHtoDAsync"));
        let mem_host_get_device_pointer: Option<ffi::CuMemHostGetDevicePointerFn> =
            r.optional(SymbolSpec::v2("cuMemHostGetDevicePointer"));

        // Stream management
        let stream_create: ffi::CuStreamCreateFn = r.required(SymbolSpec::plain("cuStreamCreate"))?;
        let stream_create_with_priority: Option<ffi::CuStreamCreateWithPriorityFn> =
            r.optional(SymbolSpec::plain("cuStreamCreateWithPriority"));
        let stream_destroy: ffi::CuStreamDestroyFn =
            r.required(SymbolSpec::v2("cuStreamDestroy"))?;
        let stream_synchronize: ffi::CuStreamSynchronizeFn =
            r.required(SymbolSpec::plain("cuStreamSynchronize"))?;
        let stream_get_priority: Option<ffi::CuStreamGetPriorityFn> =
            r.optional(SymbolSpec::plain("cuStreamGetPriority"));

        // Graphics interop
        let graphics_map_resources: ffi::CuGraphicsMapResourcesFn =
            r.required(SymbolSpec::plain("cuGraphicsMapResources"))?;
        let graphics_sub_resource_get_mapped_array: ffi::CuGraphicsSubResourceGetMappedArrayFn =
            r.required(SymbolSpec::plain("cuGraphicsSubResourceGetMappedArray"))?;
        let graphics_unmap_resources: ffi::CuGraphicsUnmapResourcesFn =
            r.required(SymbolSpec::plain("cuGraphicsUnmapResources"))?;
        let graphics_unregister_resource: ffi::CuGraphicsUnregisterResourceFn =
            r.required(SymbolSpec::plain("cuGraphicsUnregisterResource"))?;

        // Direct3D interop
        #[cfg(windows)]
        let d3d10_get_device: ffi::CuD3D10GetDeviceFn =
            r.required(SymbolSpec::plain("cuD3D10GetDevice"))?;
        #[cfg(windows)]
        let graphics_d3d10_register_resource: Option<ffi::CuGraphicsD3D10RegisterResourceFn> =
            r.optional(SymbolSpec::plain("cuGraphicsD3D10RegisterResource"));
        #[cfg(windows)]
        let d3d11_get_device: ffi::CuD3D11GetDeviceFn =
            r.required(SymbolSpec::plain("cuD3D11GetDevice"))?;
        #[cfg(windows)]
        let graphics_d3d11_register_resource: Option<ffi::CuGraphicsD3D11RegisterResourceFn> =
            r.optional(SymbolSpec::plain("cuGraphicsD3D11RegisterResource"));

        // The table is useful before any context exists (version queries,
        // capability probes), so an init failure only warns; the affected
        // calls report their own errors later.
        let rc = unsafe { init(0) };
        if rc != ffi::CUDA_SUCCESS {
            warn!("cuInit(0) returned {rc}");
        }

        let driver = Self {
            _source: source,
            init,
            driver_get_version,
            device_primary_ctx_retain,
            device_primary_ctx_release,
            device_primary_ctx_set_flags,
            ctx_create,
            ctx_destroy,
            ctx_push_current,
            ctx_pop_current,
            ctx_get_current,
            ctx_set_current,
            ctx_get_stream_priority_range,
            ctx_synchronize,
            mem_alloc,
            mem_alloc_pitch,
            mem_free,
            memcpy,
            memcpy_2d,
            memcpy_2d_async,
            array_get_descriptor,
            memcpy_atoa,
            memcpy_atod,
            memcpy_atoh,
            memcpy_atoh_async,
            memcpy_dtoa,
            memcpy_dtod,
            memcpy_dtoh,
            memcpy_dtoh_async,
            memcpy_htoa,
            memcpy_htoa_async,
            memcpy_htod,
            memcpy_htod_async,
            mem_host_get_device_pointer,
            stream_create,
            stream_create_with_priority,
            stream_destroy,
            stream_synchronize,
            stream_get_priority,
            graphics_map_resources,
            graphics_sub_resource_get_mapped_array,
            graphics_unmap_resources,
            graphics_unregister_resource,
            #[cfg(windows)]
            d3d10_get_device,
            #[cfg(windows)]
            graphics_d3d10_register_resource,
            #[cfg(windows)]
            d3d11_get_device,
            #[cfg(windows)]
            graphics_d3d11_register_resource,
        };

        let version = driver.version();
        if version > 0 {
            let (major, minor, patch) = driver_version_parts(version);
            info!("CUDA driver initialized (driver version {major}.{minor}.{patch})");
        } else {
            warn!("CUDA driver loaded but the version query failed");
        }

        Ok(driver)
    }

    /// Installed driver version as reported by `cuDriverGetVersion`.
    ///
    /// Best effort: returns 0 when the query fails.
    pub fn version(&self) -> i32 {
        let mut version: c_int = 0;
        // Safety: required symbol resolved at construction; out pointer is
        // local.
        let rc = unsafe { (self.driver_get_version)(&mut version) };
        if rc != ffi::CUDA_SUCCESS {
            return 0;
        }
        version
    }
}

impl Drop for CudaDriver {
    fn drop(&mut self) {
        debug!("CUDA driver table released");
    }
}

/// Weak slot a process (or test) acquires its driver through.
///
/// The mutex is held across the liveness check and the construction, so
/// exactly one instance exists per window in which any user holds the
/// driver. A failed construction leaves the slot empty and the next
/// acquire retries.
pub struct DriverSlot {
    live: Mutex<Weak<CudaDriver>>,
}

impl DriverSlot {
    /// An empty slot.
    pub const fn new() -> Self {
        Self {
            live: Mutex::new(Weak::new()),
        }
    }

    /// Return the live driver, or construct one with `construct`.
    pub fn acquire_with<F>(&self, construct: F) -> Result<Arc<CudaDriver>, CudaError>
    where
        F: FnOnce() -> Result<CudaDriver, CudaError>,
    {
        let mut live = self.live.lock();
        if let Some(driver) = live.upgrade() {
            return Ok(driver);
        }
        let driver = Arc::new(construct()?);
        *live = Arc::downgrade(&driver);
        Ok(driver)
    }
}

impl Default for DriverSlot {
    fn default() -> Self {
        Self::new()
    }
}

static DRIVER_SLOT: DriverSlot = DriverSlot::new();
