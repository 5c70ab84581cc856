#![expect(
    unsafe_code,
    reason = "stub extern fns standing in for driver exports"
)]

//! Canned symbol sources for exercising the loader and driver table without
//! a real driver on the machine.

use std::collections::HashMap;
use std::os::raw::{c_int, c_uint, c_void};

use super::ffi::*;
use super::loader::SymbolSource;

/// Driver version the canned `cuDriverGetVersion` reports (12.4.0).
pub(crate) const FAKE_DRIVER_VERSION: c_int = 12040;

/// Symbol table backed by a plain map of export name to address.
pub(crate) struct FakeSource {
    exports: HashMap<String, usize>,
}

impl FakeSource {
    pub(crate) fn empty() -> Self {
        Self {
            exports: HashMap::new(),
        }
    }

    /// Every export a current driver provides, required and optional alike.
    pub(crate) fn full() -> Self {
        let mut source = Self::empty();
        let exports: &[(&str, usize)] = &[
            ("cuInit", init as usize),
            ("cuDriverGetVersion", driver_get_version as usize),
            ("cuDevicePrimaryCtxRetain", primary_ctx_retain as usize),
            ("cuDevicePrimaryCtxRelease_v2", device_only as usize),
            ("cuDevicePrimaryCtxSetFlags_v2", device_flags as usize),
            ("cuCtxCreate_v2", ctx_create as usize),
            ("cuCtxDestroy_v2", ctx_in as usize),
            ("cuCtxPushCurrent_v2", ctx_in as usize),
            ("cuCtxPopCurrent_v2", ctx_out as usize),
            ("cuCtxGetCurrent", ctx_out as usize),
            ("cuCtxSetCurrent", ctx_in as usize),
            ("cuCtxGetStreamPriorityRange", priority_range as usize),
            ("cuCtxSynchronize", no_args as usize),
            ("cuMemAlloc_v2", mem_alloc as usize),
            ("cuMemAllocPitch_v2", mem_alloc_pitch as usize),
            ("cuMemFree_v2", mem_free as usize),
            ("cuMemcpy", copy_linear as usize),
            ("cuMemcpy2D_v2", copy_2d as usize),
            ("cuMemcpy2DAsync_v2", copy_2d_async as usize),
            ("cuArrayGetDescriptor_v2", array_descriptor as usize),
            ("cuMemcpyAtoA_v2", copy_atoa as usize),
            ("cuMemcpyAtoD_v2", copy_atod as usize),
            ("cuMemcpyAtoH_v2", copy_atoh as usize),
            ("cuMemcpyAtoHAsync_v2", copy_atoh_async as usize),
            ("cuMemcpyDtoA_v2", copy_dtoa as usize),
            ("cuMemcpyDtoD_v2", copy_linear as usize),
            ("cuMemcpyDtoH_v2", copy_dtoh as usize),
            ("cuMemcpyDtoHAsync_v2", copy_dtoh_async as usize),
            ("cuMemcpyHtoA_v2", copy_htoa as usize),
            ("cuMemcpyHtoAAsync_v2", copy_htoa_async as usize),
            ("cuMemcpyHtoD_v2", copy_htod as usize),
            ("cuMemcpyHtoDAsync_v2", copy_htod_async as usize),
            ("cuMemHostGetDevicePointer_v2", host_get_device_pointer as usize),
            ("cuStreamCreate", stream_out as usize),
            ("cuStreamCreateWithPriority", stream_with_priority as usize),
            ("cuStreamDestroy_v2", stream_in as usize),
            ("cuStreamSynchronize", stream_in as usize),
            ("cuStreamGetPriority", stream_get_priority as usize),
            ("cuGraphicsMapResources", graphics_map as usize),
            (
                "cuGraphicsSubResourceGetMappedArray",
                subresource_array as usize,
            ),
            ("cuGraphicsUnmapResources", graphics_map as usize),
            ("cuGraphicsUnregisterResource", graphics_unregister as usize),
        ];
        for (name, address) in exports {
            source.insert(name, *address);
        }
        #[cfg(windows)]
        for (name, address) in [
            ("cuD3D10GetDevice", d3d_get_device as usize),
            ("cuGraphicsD3D10RegisterResource", d3d_register as usize),
            ("cuD3D11GetDevice", d3d_get_device as usize),
            ("cuGraphicsD3D11RegisterResource", d3d_register as usize),
        ] {
            source.insert(name, address);
        }
        source
    }

    pub(crate) fn insert(&mut self, export: &str, address: usize) {
        self.exports.insert(export.to_string(), address);
    }

    pub(crate) fn remove(&mut self, export: &str) {
        self.exports.remove(export);
    }
}

impl SymbolSource for FakeSource {
    fn address(&self, export: &str) -> Option<*const c_void> {
        self.exports.get(export).map(|&address| address as *const c_void)
    }
}

// Stub bodies. Out-pointer writes keep callers off the zero path.

unsafe extern "system" fn init(_flags: c_uint) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn driver_get_version(version: *mut c_int) -> CUresult {
    unsafe { *version = FAKE_DRIVER_VERSION };
    CUDA_SUCCESS
}

unsafe extern "system" fn primary_ctx_retain(pctx: *mut CUcontext, _dev: CUdevice) -> CUresult {
    unsafe { *pctx = std::ptr::null_mut() };
    CUDA_SUCCESS
}

unsafe extern "system" fn device_only(_dev: CUdevice) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn device_flags(_dev: CUdevice, _flags: c_uint) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn ctx_create(
    pctx: *mut CUcontext,
    _flags: c_uint,
    _dev: CUdevice,
) -> CUresult {
    unsafe { *pctx = std::ptr::null_mut() };
    CUDA_SUCCESS
}

unsafe extern "system" fn ctx_in(_ctx: CUcontext) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn ctx_out(pctx: *mut CUcontext) -> CUresult {
    unsafe { *pctx = std::ptr::null_mut() };
    CUDA_SUCCESS
}

unsafe extern "system" fn priority_range(least: *mut c_int, greatest: *mut c_int) -> CUresult {
    unsafe {
        *least = 0;
        *greatest = -1;
    }
    CUDA_SUCCESS
}

unsafe extern "system" fn no_args() -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn mem_alloc(dptr: *mut CUdeviceptr, _bytesize: usize) -> CUresult {
    unsafe { *dptr = 0xD000_0000 };
    CUDA_SUCCESS
}

unsafe extern "system" fn mem_alloc_pitch(
    dptr: *mut CUdeviceptr,
    pitch: *mut usize,
    _width_in_bytes: usize,
    _height: usize,
    _element_size_bytes: c_uint,
) -> CUresult {
    unsafe {
        *dptr = 0xD100_0000;
        *pitch = 256;
    }
    CUDA_SUCCESS
}

unsafe extern "system" fn mem_free(_dptr: CUdeviceptr) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_linear(
    _dst: CUdeviceptr,
    _src: CUdeviceptr,
    _byte_count: usize,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_2d(_p_copy: *const CUDA_MEMCPY2D) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_2d_async(
    _p_copy: *const CUDA_MEMCPY2D,
    _h_stream: CUstream,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn array_descriptor(
    descriptor: *mut CUDA_ARRAY_DESCRIPTOR,
    _array: CUarray,
) -> CUresult {
    unsafe { *descriptor = CUDA_ARRAY_DESCRIPTOR::default() };
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_atoa(
    _dst_array: CUarray,
    _dst_offset: usize,
    _src_array: CUarray,
    _src_offset: usize,
    _byte_count: usize,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_atod(
    _dst: CUdeviceptr,
    _src_array: CUarray,
    _src_offset: usize,
    _byte_count: usize,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_atoh(
    _dst_host: *mut c_void,
    _src_array: CUarray,
    _src_offset: usize,
    _byte_count: usize,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_atoh_async(
    _dst_host: *mut c_void,
    _src_array: CUarray,
    _src_offset: usize,
    _byte_count: usize,
    _h_stream: CUstream,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_dtoa(
    _dst_array: CUarray,
    _dst_offset: usize,
    _src: CUdeviceptr,
    _byte_count: usize,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_dtoh(
    _dst_host: *mut c_void,
    _src: CUdeviceptr,
    _byte_count: usize,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_dtoh_async(
    _dst_host: *mut c_void,
    _src: CUdeviceptr,
    _byte_count: usize,
    _h_stream: CUstream,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_htoa(
    _dst_array: CUarray,
    _dst_offset: usize,
    _src_host: *const c_void,
    _byte_count: usize,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_htoa_async(
    _dst_array: CUarray,
    _dst_offset: usize,
    _src_host: *const c_void,
    _byte_count: usize,
    _h_stream: CUstream,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_htod(
    _dst: CUdeviceptr,
    _src_host: *const c_void,
    _byte_count: usize,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn copy_htod_async(
    _dst: CUdeviceptr,
    _src_host: *const c_void,
    _byte_count: usize,
    _h_stream: CUstream,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn host_get_device_pointer(
    pdptr: *mut CUdeviceptr,
    _p: *mut c_void,
    _flags: c_uint,
) -> CUresult {
    unsafe { *pdptr = 0xD200_0000 };
    CUDA_SUCCESS
}

unsafe extern "system" fn stream_out(ph_stream: *mut CUstream, _flags: c_uint) -> CUresult {
    unsafe { *ph_stream = std::ptr::null_mut() };
    CUDA_SUCCESS
}

unsafe extern "system" fn stream_with_priority(
    ph_stream: *mut CUstream,
    _flags: c_uint,
    _priority: c_int,
) -> CUresult {
    unsafe { *ph_stream = std::ptr::null_mut() };
    CUDA_SUCCESS
}

unsafe extern "system" fn stream_in(_h_stream: CUstream) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn stream_get_priority(
    _h_stream: CUstream,
    priority: *mut c_int,
) -> CUresult {
    unsafe { *priority = 0 };
    CUDA_SUCCESS
}

unsafe extern "system" fn graphics_map(
    _count: c_uint,
    _resources: *mut CUgraphicsResource,
    _h_stream: CUstream,
) -> CUresult {
    CUDA_SUCCESS
}

unsafe extern "system" fn subresource_array(
    p_array: *mut CUarray,
    _resource: CUgraphicsResource,
    _array_index: c_uint,
    _mip_level: c_uint,
) -> CUresult {
    unsafe { *p_array = std::ptr::null_mut() };
    CUDA_SUCCESS
}

unsafe extern "system" fn graphics_unregister(_resource: CUgraphicsResource) -> CUresult {
    CUDA_SUCCESS
}

#[cfg(windows)]
unsafe extern "system" fn d3d_get_device(device: *mut CUdevice, _adapter: *mut c_void) -> CUresult {
    unsafe { *device = 0 };
    CUDA_SUCCESS
}

#[cfg(windows)]
unsafe extern "system" fn d3d_register(
    resource: *mut CUgraphicsResource,
    _d3d_resource: *mut c_void,
    _flags: c_uint,
) -> CUresult {
    unsafe { *resource = std::ptr::null_mut() };
    CUDA_SUCCESS
}
