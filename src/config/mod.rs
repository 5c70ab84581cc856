//! Configuration management
//!
//! TOML configuration for the probe binary and library consumers: logging
//! level and destination, plus optional path overrides for the vendor
//! libraries the loaders open.
#![expect(
    unsafe_code,
    reason = "libc::getuid() for default config path detection"
)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Default configuration directory.
///
/// Root uses the system directory, everyone else the XDG config dir.
pub fn config_dir() -> PathBuf {
    let uid = unsafe { libc::getuid() };
    if uid == 0 {
        PathBuf::from("/etc/hwenc")
    } else {
        dirs::config_dir().map_or_else(|| PathBuf::from("/etc/hwenc"), |d| d.join("hwenc"))
    }
}

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Resolve the log directory, falling back to the XDG data dir.
pub fn resolve_log_dir(configured: &Option<PathBuf>) -> PathBuf {
    configured.clone().unwrap_or_else(|| {
        dirs::data_dir().map_or_else(
            || PathBuf::from("/tmp/hwenc"),
            |d| d.join("hwenc/logs"),
        )
    })
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// CUDA driver configuration
    #[serde(default)]
    pub cuda: CudaConfig,
    /// AMF runtime configuration
    #[serde(default)]
    pub amf: AmfConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace|debug|info|warn|error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files; stdout-only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}

/// CUDA driver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CudaConfig {
    /// Explicit driver library path, overriding the fixed platform name
    #[serde(default)]
    pub library: Option<PathBuf>,
}

/// AMF runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmfConfig {
    /// Explicit runtime library path, overriding the fixed platform name
    #[serde(default)]
    pub runtime: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read config file: {path}"))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, or built-in defaults when absent
    pub fn load_default() -> Result<Self> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path.display().to_string())
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => bail!("Invalid logging.level: {other}"),
        }
        Ok(())
    }

    /// Export configured library paths into the environment the loaders
    /// read, so the override reaches them regardless of call path.
    pub fn apply_overrides(&self) {
        if let Some(library) = &self.cuda.library {
            std::env::set_var(crate::cuda::LIBRARY_ENV, library);
        }
        if let Some(runtime) = &self.amf.runtime {
            std::env::set_var(crate::encoders::amf::RUNTIME_ENV, runtime);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gets_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.log_dir.is_none());
        assert!(config.cuda.library.is_none());
        assert!(config.amf.runtime.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn full_config_parses() {
        let config: Config = toml::from_str(
            r#"
            [logging]
            level = "debug"
            log_dir = "/var/log/hwenc"

            [cuda]
            library = "/usr/lib64/libcuda.so.1"

            [amf]
            runtime = "/opt/amdgpu-pro/lib64/libamfrt64.so.1"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.cuda.library.as_deref(),
            Some(std::path::Path::new("/usr/lib64/libcuda.so.1"))
        );
        assert_eq!(
            config.amf.runtime.as_deref(),
            Some(std::path::Path::new("/opt/amdgpu-pro/lib64/libamfrt64.so.1"))
        );
        config.validate().unwrap();
    }

    #[test]
    fn bad_log_level_fails_validation() {
        let config: Config = toml::from_str("[logging]\nlevel = \"verbose\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn log_dir_resolution_prefers_configured_path() {
        let configured = Some(PathBuf::from("/var/log/hwenc"));
        assert_eq!(
            resolve_log_dir(&configured),
            PathBuf::from("/var/log/hwenc")
        );
        assert!(!resolve_log_dir(&None).as_os_str().is_empty());
    }
}
