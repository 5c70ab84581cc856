#![expect(
    unsafe_code,
    reason = "AMFQueryVersion call through the dynamically opened runtime"
)]

//! AMD AMF vendor-family layer.
//!
//! Availability and version probing for the AMF runtime, plus the
//! family-wide delegation points codec handlers call around their own
//! logic. Family-wide options would slot into these functions once; today
//! they carry diagnostics only.

use tracing::debug;

pub mod h264;

use super::{CodecOptions, PropertyList, Settings};

/// Environment variable that overrides the AMF runtime library search.
pub const RUNTIME_ENV: &str = "HWENC_AMF_RUNTIME";

/// Runtime library name the AMD driver package installs.
const RUNTIME_LIBRARY: &str = if cfg!(windows) {
    "amfrt64.dll"
} else {
    "libamfrt64.so.1"
};

/// `AMFQueryVersion(amf_uint64* version) -> AMF_RESULT`, the one versioned
/// export the runtime guarantees.
type AmfQueryVersionFn = unsafe extern "system" fn(version: *mut u64) -> i32;

const AMF_OK: i32 = 0;

fn open_runtime() -> Option<libloading::Library> {
    if let Ok(explicit_path) = std::env::var(RUNTIME_ENV) {
        // Safety: loading the operator-designated runtime binary.
        match unsafe { libloading::Library::new(&explicit_path) } {
            Ok(library) => return Some(library),
            Err(e) => debug!("{RUNTIME_ENV}={explicit_path} set but failed: {e}"),
        }
    }
    // Safety: loading the vendor-managed runtime by its well-known name.
    match unsafe { libloading::Library::new(RUNTIME_LIBRARY) } {
        Ok(library) => Some(library),
        Err(e) => {
            debug!("AMF runtime {RUNTIME_LIBRARY} not loadable: {e}");
            None
        }
    }
}

/// Whether the AMF runtime is present on this system. Best effort, never
/// errors; absence degrades encoder visibility, it does not block use.
pub fn is_available() -> bool {
    open_runtime().is_some()
}

/// Packed AMF runtime version, or `None` on any failure.
///
/// Diagnostic only, same policy as the CUDA driver version query.
pub fn runtime_version() -> Option<u64> {
    let library = open_runtime()?;
    // Safety: name is NUL-terminated; the export has the documented
    // signature on every AMF runtime release.
    let query: libloading::Symbol<'_, AmfQueryVersionFn> =
        unsafe { library.get(b"AMFQueryVersion\0") }.ok()?;
    let mut version: u64 = 0;
    // Safety: out pointer is local; the call has no other effects.
    let rc = unsafe { query(&mut version) };
    if rc != AMF_OK {
        debug!("AMFQueryVersion returned {rc}");
        return None;
    }
    Some(version)
}

/// Render a packed AMF version (four 16-bit fields) as dotted text.
pub fn format_version(version: u64) -> String {
    format!(
        "{}.{}.{}.{}",
        version >> 48,
        (version >> 32) & 0xffff,
        (version >> 16) & 0xffff,
        version & 0xffff
    )
}

// Family-wide delegation points. Codec handlers call these in a fixed
// order around their own logic so family-wide behavior has one insertion
// point per lifecycle call.

pub(crate) fn defaults(settings: &mut Settings) {
    let _ = settings;
}

pub(crate) fn update(settings: &Settings, opts: &mut dyn CodecOptions) {
    let _ = (settings, opts);
}

pub(crate) fn override_update(settings: &Settings, opts: &mut dyn CodecOptions) {
    let _ = (settings, opts);
}

pub(crate) fn log_options(settings: &Settings, opts: &dyn CodecOptions) {
    let _ = (settings, opts);
    match runtime_version() {
        Some(version) => debug!("AMF runtime version {}", format_version(version)),
        None => debug!("AMF runtime not detected"),
    }
}

pub(crate) fn properties_pre(props: &mut PropertyList) {
    let _ = props;
}

pub(crate) fn properties_post(props: &mut PropertyList) {
    let _ = props;
}

pub(crate) fn runtime_properties(props: &mut PropertyList) {
    let _ = props;
}

pub(crate) fn migrate(settings: &mut Settings, version: u64) {
    let _ = (settings, version);
}
