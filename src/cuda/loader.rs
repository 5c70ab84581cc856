#![expect(
    unsafe_code,
    reason = "dlopen, dlsym, and fn-pointer extraction from resolved addresses"
)]

//! CUDA driver library loading and symbol resolution.
//!
//! The driver exports its entry points under three naming schemes: the plain
//! header name, the header name with a `_v2` suffix (the post-CUDA-3.2 ABI),
//! and a handful of renamed exports. [`SymbolSpec`] describes one entry point
//! and its scheme; [`Resolver`] turns specs into typed function pointers
//! through a single lookup path. [`SymbolSource`] is the seam between the
//! resolver and `libloading`, so resolution policy is testable without a
//! real driver on the machine.

use std::borrow::Cow;
use std::os::raw::c_void;

use tracing::{debug, info, trace, warn};

use super::CudaError;

/// Environment variable that overrides the driver library search.
pub const LIBRARY_ENV: &str = "HWENC_CUDA_LIBRARY";

/// Library names the vendor driver installs, in load order.
const DRIVER_LIBRARY_NAMES: &[&str] = if cfg!(windows) {
    &["nvcuda.dll"]
} else {
    &["libcuda.so.1", "libcuda.so"]
};

/// Open the CUDA driver library.
///
/// Search order:
/// 1. `HWENC_CUDA_LIBRARY` environment variable
/// 2. The platform's driver-installed name (`nvcuda.dll` / `libcuda.so.1`)
pub(crate) fn open_driver_library() -> Result<libloading::Library, CudaError> {
    // Allow explicit path override
    if let Ok(explicit_path) = std::env::var(LIBRARY_ENV) {
        // Safety: loading the operator-designated driver binary.
        match unsafe { libloading::Library::new(&explicit_path) } {
            Ok(library) => {
                info!("Loaded CUDA driver from {explicit_path}");
                return Ok(library);
            }
            Err(e) => {
                warn!("{LIBRARY_ENV}={explicit_path} set but failed: {e}");
            }
        }
    }

    for name in DRIVER_LIBRARY_NAMES {
        // Safety: loading the vendor-managed driver library by its
        // well-known name, not an arbitrary blob.
        match unsafe { libloading::Library::new(name) } {
            Ok(library) => {
                info!("Loaded CUDA driver library {name}");
                return Ok(library);
            }
            Err(e) => {
                debug!("CUDA driver candidate {name} not loadable: {e}");
            }
        }
    }

    Err(CudaError::LibraryNotFound(format!(
        "tried {DRIVER_LIBRARY_NAMES:?}; the library ships with the NVIDIA \
         driver package (set {LIBRARY_ENV} to point at a specific binary)"
    )))
}

/// Where symbol addresses come from.
///
/// Production code hands the resolver a [`libloading::Library`]; tests hand
/// it a canned table.
pub(crate) trait SymbolSource {
    /// Address of `export`, or `None` if the library does not provide it.
    fn address(&self, export: &str) -> Option<*const c_void>;
}

impl SymbolSource for libloading::Library {
    fn address(&self, export: &str) -> Option<*const c_void> {
        let mut name = Vec::with_capacity(export.len() + 1);
        name.extend_from_slice(export.as_bytes());
        name.push(0);
        // Safety: `name` is NUL-terminated; only the address is extracted
        // here, no call is made through the symbol.
        let symbol = unsafe { self.get::<*const c_void>(&name) }.ok()?;
        Some(*symbol)
    }
}

/// Which exported name an entry point resolves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Export {
    /// Exported under the header name unchanged.
    Plain,
    /// Exported with a `_v2` suffix appended to the header name.
    V2,
    /// Exported under an unrelated name.
    Named(&'static str),
}

/// One driver entry point: its header (logical) name plus export scheme.
///
/// Diagnostics always speak in logical names; only the lookup itself uses
/// the computed physical name.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SymbolSpec {
    pub logical: &'static str,
    pub export: Export,
}

impl SymbolSpec {
    pub(crate) const fn plain(logical: &'static str) -> Self {
        Self {
            logical,
            export: Export::Plain,
        }
    }

    pub(crate) const fn v2(logical: &'static str) -> Self {
        Self {
            logical,
            export: Export::V2,
        }
    }

    pub(crate) const fn named(logical: &'static str, export: &'static str) -> Self {
        Self {
            logical,
            export: Export::Named(export),
        }
    }

    /// The exported name to look up.
    fn physical(&self) -> Cow<'static, str> {
        match self.export {
            Export::Plain => Cow::Borrowed(self.logical),
            Export::V2 => Cow::Owned(format!("{}_v2", self.logical)),
            Export::Named(name) => Cow::Borrowed(name),
        }
    }
}

/// Resolves [`SymbolSpec`]s against a [`SymbolSource`].
pub(crate) struct Resolver<'a> {
    source: &'a dyn SymbolSource,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(source: &'a dyn SymbolSource) -> Self {
        Self { source }
    }

    /// Resolve an entry point the driver table cannot exist without.
    pub(crate) fn required<T: Copy>(&self, spec: SymbolSpec) -> Result<T, CudaError> {
        match self.lookup(spec) {
            Some(address) => Ok(cast_symbol(address)),
            None => Err(CudaError::MissingSymbol(spec.logical)),
        }
    }

    /// Resolve an entry point newer than some drivers in the field.
    ///
    /// A miss degrades the capability instead of failing construction.
    pub(crate) fn optional<T: Copy>(&self, spec: SymbolSpec) -> Option<T> {
        match self.lookup(spec) {
            Some(address) => Some(cast_symbol(address)),
            None => {
                warn!(
                    "optional driver symbol {} is unavailable; dependent \
                     functionality is disabled",
                    spec.logical
                );
                None
            }
        }
    }

    fn lookup(&self, spec: SymbolSpec) -> Option<*const c_void> {
        let physical = spec.physical();
        let address = self.source.address(&physical);
        if address.is_some() {
            trace!("resolved {} (export {physical})", spec.logical);
        }
        address
    }
}

/// Reinterpret a resolved address as a function pointer of type `T`.
fn cast_symbol<T: Copy>(address: *const c_void) -> T {
    const {
        assert!(std::mem::size_of::<T>() == std::mem::size_of::<*const c_void>());
    }
    // Safety: size equality is checked above; callers only instantiate T
    // with `extern "system"` function pointer types, and the address comes
    // from a symbol source that vouches for the export.
    unsafe { std::mem::transmute_copy(&address) }
}
