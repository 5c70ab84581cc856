#![expect(
    unsafe_code,
    reason = "FFI struct defaults via mem::zeroed"
)]
// Type and field names match the CUDA driver C API exactly — renaming would
// obscure which export a pointer binds to.
// Dead code allowed: complete ABI surface — constants/variants used on demand.
#![allow(non_snake_case, non_camel_case_types, dead_code, missing_docs)]

//! CUDA driver ABI: scalar types, result codes, descriptor structs and typed
//! function-pointer aliases for every entry point the loader resolves.
//!
//! Everything here mirrors `cuda.h` for the `_v2` era of the API (the era in
//! which allocation, context and 2D-copy entry points grew a `_v2` suffix on
//! their exported names while headers kept the unsuffixed spelling). The
//! loader applies the suffix when computing physical export names; the types
//! here always describe the `_v2` ABI.

use std::os::raw::{c_int, c_uint, c_void};

// ============================================================================
// Scalar and opaque handle types
// ============================================================================

/// Result code returned by every driver entry point.
pub type CUresult = c_int;
/// Ordinal of a CUDA device, as used by the primary-context entry points.
pub type CUdevice = c_int;
/// Device memory address. 64-bit on every platform this crate targets.
pub type CUdeviceptr = u64;

pub type CUmemorytype = c_uint;
pub type CUarray_format = c_uint;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CUctx_st {
    _unused: [u8; 0],
}
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CUstream_st {
    _unused: [u8; 0],
}
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CUarray_st {
    _unused: [u8; 0],
}
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CUgraphicsResource_st {
    _unused: [u8; 0],
}

pub type CUcontext = *mut CUctx_st;
pub type CUstream = *mut CUstream_st;
pub type CUarray = *mut CUarray_st;
pub type CUgraphicsResource = *mut CUgraphicsResource_st;

// ============================================================================
// Result codes
// ============================================================================

pub const CUDA_SUCCESS: CUresult = 0;
pub const CUDA_ERROR_INVALID_VALUE: CUresult = 1;
pub const CUDA_ERROR_OUT_OF_MEMORY: CUresult = 2;
pub const CUDA_ERROR_NOT_INITIALIZED: CUresult = 3;
pub const CUDA_ERROR_DEINITIALIZED: CUresult = 4;
pub const CUDA_ERROR_NO_DEVICE: CUresult = 100;
pub const CUDA_ERROR_INVALID_DEVICE: CUresult = 101;
pub const CUDA_ERROR_INVALID_CONTEXT: CUresult = 201;
pub const CUDA_ERROR_MAP_FAILED: CUresult = 205;
pub const CUDA_ERROR_UNMAP_FAILED: CUresult = 206;
pub const CUDA_ERROR_ARRAY_IS_MAPPED: CUresult = 207;
pub const CUDA_ERROR_ALREADY_MAPPED: CUresult = 208;
pub const CUDA_ERROR_NOT_MAPPED: CUresult = 211;
pub const CUDA_ERROR_INVALID_GRAPHICS_CONTEXT: CUresult = 219;

// ============================================================================
// Memory and array constants
// ============================================================================

pub const CU_MEMORYTYPE_HOST: CUmemorytype = 0x01;
pub const CU_MEMORYTYPE_DEVICE: CUmemorytype = 0x02;
pub const CU_MEMORYTYPE_ARRAY: CUmemorytype = 0x03;
pub const CU_MEMORYTYPE_UNIFIED: CUmemorytype = 0x04;

pub const CU_AD_FORMAT_UNSIGNED_INT8: CUarray_format = 0x01;
pub const CU_AD_FORMAT_UNSIGNED_INT16: CUarray_format = 0x02;
pub const CU_AD_FORMAT_UNSIGNED_INT32: CUarray_format = 0x03;
pub const CU_AD_FORMAT_SIGNED_INT8: CUarray_format = 0x08;
pub const CU_AD_FORMAT_SIGNED_INT16: CUarray_format = 0x09;
pub const CU_AD_FORMAT_SIGNED_INT32: CUarray_format = 0x0a;
pub const CU_AD_FORMAT_HALF: CUarray_format = 0x10;
pub const CU_AD_FORMAT_FLOAT: CUarray_format = 0x20;

// ============================================================================
// Creation flags
// ============================================================================

bitflags::bitflags! {
    /// Flags accepted by `cuCtxCreate` and `cuDevicePrimaryCtxSetFlags`.
    pub struct CUctx_flags: c_uint {
        const SCHED_AUTO = 0x00;
        const SCHED_SPIN = 0x01;
        const SCHED_YIELD = 0x02;
        const SCHED_BLOCKING_SYNC = 0x04;
        const MAP_HOST = 0x08;
        const LMEM_RESIZE_TO_MAX = 0x10;
    }
}

bitflags::bitflags! {
    /// Flags accepted by the stream creation entry points.
    pub struct CUstream_flags: c_uint {
        const DEFAULT = 0x0;
        const NON_BLOCKING = 0x1;
    }
}

// ============================================================================
// Descriptor structs
// ============================================================================

/// Parameter block for `cuMemcpy2D` / `cuMemcpy2DAsync`.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CUDA_MEMCPY2D {
    pub srcXInBytes: usize,
    pub srcY: usize,
    pub srcMemoryType: CUmemorytype,
    pub srcHost: *const c_void,
    pub srcDevice: CUdeviceptr,
    pub srcArray: CUarray,
    pub srcPitch: usize,
    pub dstXInBytes: usize,
    pub dstY: usize,
    pub dstMemoryType: CUmemorytype,
    pub dstHost: *mut c_void,
    pub dstDevice: CUdeviceptr,
    pub dstArray: CUarray,
    pub dstPitch: usize,
    pub WidthInBytes: usize,
    pub Height: usize,
}

impl Default for CUDA_MEMCPY2D {
    fn default() -> Self {
        unsafe { std::mem::zeroed() }
    }
}

/// Shape and format of a CUDA array, as reported by `cuArrayGetDescriptor`.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CUDA_ARRAY_DESCRIPTOR {
    pub Width: usize,
    pub Height: usize,
    pub Format: CUarray_format,
    pub NumChannels: c_uint,
}

impl Default for CUDA_ARRAY_DESCRIPTOR {
    fn default() -> Self {
        unsafe { std::mem::zeroed() }
    }
}

// ============================================================================
// Entry-point signatures
// ============================================================================
// `extern "system"` gives stdcall on 32-bit Windows and the C convention
// everywhere else, matching CUDAAPI in the vendor headers.

pub type CuInitFn = unsafe extern "system" fn(flags: c_uint) -> CUresult;
pub type CuDriverGetVersionFn = unsafe extern "system" fn(version: *mut c_int) -> CUresult;

// Primary context
pub type CuDevicePrimaryCtxRetainFn =
    unsafe extern "system" fn(pctx: *mut CUcontext, dev: CUdevice) -> CUresult;
pub type CuDevicePrimaryCtxReleaseFn = unsafe extern "system" fn(dev: CUdevice) -> CUresult;
pub type CuDevicePrimaryCtxSetFlagsFn =
    unsafe extern "system" fn(dev: CUdevice, flags: c_uint) -> CUresult;

// Context management
pub type CuCtxCreateFn =
    unsafe extern "system" fn(pctx: *mut CUcontext, flags: c_uint, dev: CUdevice) -> CUresult;
pub type CuCtxDestroyFn = unsafe extern "system" fn(ctx: CUcontext) -> CUresult;
pub type CuCtxPushCurrentFn = unsafe extern "system" fn(ctx: CUcontext) -> CUresult;
pub type CuCtxPopCurrentFn = unsafe extern "system" fn(pctx: *mut CUcontext) -> CUresult;
pub type CuCtxGetCurrentFn = unsafe extern "system" fn(pctx: *mut CUcontext) -> CUresult;
pub type CuCtxSetCurrentFn = unsafe extern "system" fn(ctx: CUcontext) -> CUresult;
pub type CuCtxGetStreamPriorityRangeFn =
    unsafe extern "system" fn(least: *mut c_int, greatest: *mut c_int) -> CUresult;
pub type CuCtxSynchronizeFn = unsafe extern "system" fn() -> CUresult;

// Memory management
pub type CuMemAllocFn =
    unsafe extern "system" fn(dptr: *mut CUdeviceptr, bytesize: usize) -> CUresult;
pub type CuMemAllocPitchFn = unsafe extern "system" fn(
    dptr: *mut CUdeviceptr,
    pitch: *mut usize,
    width_in_bytes: usize,
    height: usize,
    element_size_bytes: c_uint,
) -> CUresult;
pub type CuMemFreeFn = unsafe extern "system" fn(dptr: CUdeviceptr) -> CUresult;
pub type CuMemcpyFn =
    unsafe extern "system" fn(dst: CUdeviceptr, src: CUdeviceptr, byte_count: usize) -> CUresult;
pub type CuMemcpy2DFn = unsafe extern "system" fn(p_copy: *const CUDA_MEMCPY2D) -> CUresult;
pub type CuMemcpy2DAsyncFn =
    unsafe extern "system" fn(p_copy: *const CUDA_MEMCPY2D, h_stream: CUstream) -> CUresult;
pub type CuArrayGetDescriptorFn = unsafe extern "system" fn(
    descriptor: *mut CUDA_ARRAY_DESCRIPTOR,
    array: CUarray,
) -> CUresult;

// Directional copies (host/device/array). All optional in the loader.
pub type CuMemcpyAtoAFn = unsafe extern "system" fn(
    dst_array: CUarray,
    dst_offset: usize,
    src_array: CUarray,
    src_offset: usize,
    byte_count: usize,
) -> CUresult;
pub type CuMemcpyAtoDFn = unsafe extern "system" fn(
    dst: CUdeviceptr,
    src_array: CUarray,
    src_offset: usize,
    byte_count: usize,
) -> CUresult;
pub type CuMemcpyAtoHFn = unsafe extern "system" fn(
    dst_host: *mut c_void,
    src_array: CUarray,
    src_offset: usize,
    byte_count: usize,
) -> CUresult;
pub type CuMemcpyAtoHAsyncFn = unsafe extern "system" fn(
    dst_host: *mut c_void,
    src_array: CUarray,
    src_offset: usize,
    byte_count: usize,
    h_stream: CUstream,
) -> CUresult;
pub type CuMemcpyDtoAFn = unsafe extern "system" fn(
    dst_array: CUarray,
    dst_offset: usize,
    src: CUdeviceptr,
    byte_count: usize,
) -> CUresult;
pub type CuMemcpyDtoDFn =
    unsafe extern "system" fn(dst: CUdeviceptr, src: CUdeviceptr, byte_count: usize) -> CUresult;
pub type CuMemcpyDtoHFn = unsafe extern "system" fn(
    dst_host: *mut c_void,
    src: CUdeviceptr,
    byte_count: usize,
) -> CUresult;
pub type CuMemcpyDtoHAsyncFn = unsafe extern "system" fn(
    dst_host: *mut c_void,
    src: CUdeviceptr,
    byte_count: usize,
    h_stream: CUstream,
) -> CUresult;
pub type CuMemcpyHtoAFn = unsafe extern "system" fn(
    dst_array: CUarray,
    dst_offset: usize,
    src_host: *const c_void,
    byte_count: usize,
) -> CUresult;
pub type CuMemcpyHtoAAsyncFn = unsafe extern "system" fn(
    dst_array: CUarray,
    dst_offset: usize,
    src_host: *const c_void,
    byte_count: usize,
    h_stream: CUstream,
) -> CUresult;
pub type CuMemcpyHtoDFn = unsafe extern "system" fn(
    dst: CUdeviceptr,
    src_host: *const c_void,
    byte_count: usize,
) -> CUresult;
pub type CuMemcpyHtoDAsyncFn = unsafe extern "system" fn(
    dst: CUdeviceptr,
    src_host: *const c_void,
    byte_count: usize,
    h_stream: CUstream,
) -> CUresult;
pub type CuMemHostGetDevicePointerFn = unsafe extern "system" fn(
    pdptr: *mut CUdeviceptr,
    p: *mut c_void,
    flags: c_uint,
) -> CUresult;

// Stream management
pub type CuStreamCreateFn =
    unsafe extern "system" fn(ph_stream: *mut CUstream, flags: c_uint) -> CUresult;
pub type CuStreamCreateWithPriorityFn = unsafe extern "system" fn(
    ph_stream: *mut CUstream,
    flags: c_uint,
    priority: c_int,
) -> CUresult;
pub type CuStreamDestroyFn = unsafe extern "system" fn(h_stream: CUstream) -> CUresult;
pub type CuStreamSynchronizeFn = unsafe extern "system" fn(h_stream: CUstream) -> CUresult;
pub type CuStreamGetPriorityFn =
    unsafe extern "system" fn(h_stream: CUstream, priority: *mut c_int) -> CUresult;

// Graphics interop
pub type CuGraphicsMapResourcesFn = unsafe extern "system" fn(
    count: c_uint,
    resources: *mut CUgraphicsResource,
    h_stream: CUstream,
) -> CUresult;
pub type CuGraphicsSubResourceGetMappedArrayFn = unsafe extern "system" fn(
    p_array: *mut CUarray,
    resource: CUgraphicsResource,
    array_index: c_uint,
    mip_level: c_uint,
) -> CUresult;
pub type CuGraphicsUnmapResourcesFn = unsafe extern "system" fn(
    count: c_uint,
    resources: *mut CUgraphicsResource,
    h_stream: CUstream,
) -> CUresult;
pub type CuGraphicsUnregisterResourceFn =
    unsafe extern "system" fn(resource: CUgraphicsResource) -> CUresult;

// Direct3D interop (exports only exist in the Windows driver)
#[cfg(windows)]
pub type CuD3D10GetDeviceFn =
    unsafe extern "system" fn(device: *mut CUdevice, adapter: *mut c_void) -> CUresult;
#[cfg(windows)]
pub type CuGraphicsD3D10RegisterResourceFn = unsafe extern "system" fn(
    resource: *mut CUgraphicsResource,
    d3d_resource: *mut c_void,
    flags: c_uint,
) -> CUresult;
#[cfg(windows)]
pub type CuD3D11GetDeviceFn =
    unsafe extern "system" fn(device: *mut CUdevice, adapter: *mut c_void) -> CUresult;
#[cfg(windows)]
pub type CuGraphicsD3D11RegisterResourceFn = unsafe extern "system" fn(
    resource: *mut CUgraphicsResource,
    d3d_resource: *mut c_void,
    flags: c_uint,
) -> CUresult;
