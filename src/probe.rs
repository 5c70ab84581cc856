//! Hardware API probing.
//!
//! Exercises each vendor API independently and aggregates the outcomes
//! into a serializable report: what is present, which version, and what
//! failed. Probing is diagnostic only; a failure here never blocks a
//! caller that goes on to use the same API directly.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cuda::{driver_version_parts, CudaDriver};
use crate::encoders::amf;

/// How much of the hardware encoding stack this machine offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLevel {
    /// Every probed API is live.
    Full,
    /// Some probed APIs are live.
    Partial,
    /// No hardware API is usable.
    Unavailable,
}

impl std::fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Partial => write!(f, "partial"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Outcome of probing one vendor API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiReport {
    /// Whether the API is usable.
    pub available: bool,
    /// Formatted version, when the API reported one.
    pub version: Option<String>,
    /// Failure description, when the probe failed.
    pub error: Option<String>,
    /// How long the probe attempt took.
    pub probe_ms: u64,
}

/// Aggregated hardware probe report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareReport {
    /// AMD AMF runtime probe.
    pub amf: ApiReport,
    /// NVIDIA CUDA driver probe.
    pub cuda: ApiReport,
    /// Overall summary.
    pub service_level: ServiceLevel,
}

/// Probe every supported hardware API.
pub fn probe() -> HardwareReport {
    info!("Probing hardware encoding APIs...");
    let amf = probe_amf();
    let cuda = probe_cuda();
    let service_level = summarize(amf.available, cuda.available);
    info!("Hardware probe complete: service level {service_level}");
    HardwareReport {
        amf,
        cuda,
        service_level,
    }
}

fn summarize(amf_available: bool, cuda_available: bool) -> ServiceLevel {
    match (amf_available, cuda_available) {
        (true, true) => ServiceLevel::Full,
        (false, false) => ServiceLevel::Unavailable,
        _ => ServiceLevel::Partial,
    }
}

fn probe_amf() -> ApiReport {
    let start = Instant::now();
    let available = amf::is_available();
    let version = amf::runtime_version().map(amf::format_version);
    let probe_ms = start.elapsed().as_millis() as u64;

    if available {
        debug!(
            "AMF runtime present (version {})",
            version.as_deref().unwrap_or("unknown")
        );
        ApiReport {
            available: true,
            version,
            error: None,
            probe_ms,
        }
    } else {
        debug!("AMF runtime not found");
        ApiReport {
            available: false,
            version: None,
            error: Some("AMF runtime library not found".to_string()),
            probe_ms,
        }
    }
}

fn probe_cuda() -> ApiReport {
    let start = Instant::now();
    match CudaDriver::get() {
        Ok(driver) => {
            let raw = driver.version();
            let version = if raw > 0 {
                let (major, minor, patch) = driver_version_parts(raw);
                Some(format!("{major}.{minor}.{patch}"))
            } else {
                None
            };
            ApiReport {
                available: true,
                version,
                error: None,
                probe_ms: start.elapsed().as_millis() as u64,
            }
        }
        Err(e) => {
            debug!("CUDA driver probe failed: {e}");
            ApiReport {
                available: false,
                version: None,
                error: Some(e.to_string()),
                probe_ms: start.elapsed().as_millis() as u64,
            }
        }
    }
}
