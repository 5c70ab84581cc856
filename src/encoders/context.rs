//! Seams between handlers and the externally-owned codec context.
//!
//! The FFmpeg codec context stays outside this crate; handlers only read
//! and write named string options on it. [`CodecOptions`] is that seam, and
//! [`OptionMap`] is the buffering implementation hosts use to stage options
//! before applying them (and tests use to observe writes).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Raw frame formats an encoder can be fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// Planar Y plane + interleaved UV, the format AMF hardware consumes.
    Nv12,
    /// Fully planar 4:2:0.
    Yuv420p,
    /// Packed 8-bit BGRA.
    Bgra,
    /// 10-bit NV12 layout.
    P010,
}

/// Named string options on one encoder instance.
///
/// The underlying context is owned by the host; implementations translate
/// these calls onto it. Reads exist for diagnostics only.
pub trait CodecOptions {
    /// Write a named option.
    fn set_str(&mut self, name: &str, value: &str);

    /// Read back a previously written option, if any.
    fn get_str(&self, name: &str) -> Option<&str>;
}

/// [`CodecOptions`] backed by a plain map.
#[derive(Debug, Clone, Default)]
pub struct OptionMap {
    options: HashMap<String, String>,
}

impl OptionMap {
    /// An empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of options currently set.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether no option has been set.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterate over `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl CodecOptions for OptionMap {
    fn set_str(&mut self, name: &str, value: &str) {
        self.options.insert(name.to_string(), value.to_string());
    }

    fn get_str(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}
