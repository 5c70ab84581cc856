//! # hwenc-bridge
//!
//! Hardware video-encoding SDK integration for an FFmpeg-based encoder
//! abstraction: codec option mapping for AMD AMF, runtime loading of the
//! NVIDIA CUDA driver, and device-resource lifetime on top of it.
//!
//! # Architecture
//!
//! ```text
//! hwenc-bridge
//!   ├─> Encoder Handlers (settings → FFmpeg private options)
//!   │     └─> AMF H.264/AVC (profile/level mapping, NV12 override)
//!   ├─> CUDA Driver Loader (dlopen + symbol table + cuInit)
//!   │     └─> DeviceBuffer (RAII device memory)
//!   └─> Hardware Probe (availability/version reports)
//! ```
//!
//! The actual encoding, memory transfer, and device management live inside
//! the vendor libraries. This crate's job is reaching them: dynamic symbol
//! resolution with versioned fallbacks, a shared reference-counted driver
//! handle, and mapping a small set of user-facing settings onto vendor
//! option strings.
//!
//! Host integration happens through narrow seams: [`encoders::CodecOptions`]
//! for the codec context, [`encoders::Settings`] for persisted values, and
//! [`encoders::PropertyList`] for UI schema.

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all)]

/// Configuration (TOML)
pub mod config;

/// NVIDIA CUDA driver loading and device memory
pub mod cuda;

/// FFmpeg-facing encoder handlers (AMD AMF)
pub mod encoders;

/// Hardware API probing and reports
pub mod probe;
