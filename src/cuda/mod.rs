//! NVIDIA CUDA driver integration.
//!
//! The driver ships as a closed system library; everything here exists to
//! reach it safely at runtime: [`ffi`] mirrors the C ABI, [`loader`] opens
//! the library and resolves exports (required, optional, `_v2`-suffixed,
//! renamed), [`driver`] holds the resolved entry-point table behind a
//! process-wide weak slot, and [`memory`] scopes device allocations to the
//! lifetime of that table.
//!
//! Thread safety ends at the accessor: [`CudaDriver::get`] is serialized,
//! but calls through the resolved pointers follow the driver's own rules
//! (context binding per thread is the caller's job).

pub mod driver;
pub mod ffi;
pub(crate) mod loader;
pub mod memory;
#[cfg(test)]
pub(crate) mod test_support;

pub use driver::{CudaDriver, DriverSlot};
pub use loader::LIBRARY_ENV;
pub use memory::DeviceBuffer;

use thiserror::Error;

/// Failures surfaced by driver loading and driver calls.
///
/// Only construction-time failures reach callers as errors; degraded
/// optional symbols and diagnostic misses are absorbed with a log line.
#[derive(Debug, Error)]
pub enum CudaError {
    /// The driver library could not be opened.
    #[error("CUDA driver library not found: {0}")]
    LibraryNotFound(String),

    /// A required export is absent from the opened library. Named by the
    /// logical (header) symbol, not the physical export.
    #[error("CUDA driver is missing required symbol {0}")]
    MissingSymbol(&'static str),

    /// A driver entry point returned a non-success code.
    #[error("{call} failed with CUDA error {code}")]
    Call {
        /// Logical name of the entry point that failed.
        call: &'static str,
        /// The raw result code the driver returned.
        code: ffi::CUresult,
    },
}

/// Split a packed driver version into (major, minor, patch).
///
/// `cuDriverGetVersion` packs 12.4.0 as 12040.
pub fn driver_version_parts(version: i32) -> (i32, i32, i32) {
    (version / 1000, (version % 1000) / 10, version % 10)
}
