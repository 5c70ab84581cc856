//! FFmpeg-facing encoder handlers.
//!
//! A [`Handler`] adapts generic encoder lifecycle calls (defaults, UI
//! schema, option application, diagnostics) onto one hardware codec
//! family's option protocol. Handlers are stateless singletons registered
//! per FFmpeg encoder name; the host drives them through [`handler_for`].

pub mod amf;
pub mod context;
pub mod properties;
pub mod settings;

pub use context::{CodecOptions, OptionMap, PixelFormat};
pub use properties::{Property, PropertyList};
pub use settings::Settings;

use serde::Serialize;
use tracing::debug;

/// Factory descriptor for one encoder, as shown to the host.
#[derive(Debug, Clone, Serialize)]
pub struct EncoderInfo {
    /// Stable identifier the host registers the encoder under.
    pub id: String,
    /// FFmpeg encoder name.
    pub codec: String,
    /// Human-readable display name.
    pub name: String,
    /// Hidden from new configurations; existing ones keep working.
    pub deprecated: bool,
}

impl EncoderInfo {
    /// Descriptor with host defaults, before `adjust_info` runs.
    pub fn new(codec: &str) -> Self {
        Self {
            id: format!("ffmpeg_{codec}"),
            codec: codec.to_string(),
            name: codec.to_string(),
            deprecated: false,
        }
    }
}

/// Adapter between the generic encoder lifecycle and one codec family.
///
/// Default bodies are no-ops so handlers override only the calls they
/// participate in.
pub trait Handler: Send + Sync {
    /// Fix up the factory descriptor (display name, deprecation).
    fn adjust_info(&self, info: &mut EncoderInfo) {
        let _ = info;
    }

    /// Seed default values into the settings bag. Must be idempotent.
    fn defaults(&self, settings: &mut Settings) {
        let _ = settings;
    }

    /// Emit the UI schema. `runtime` means a live encoder instance exists,
    /// restricting the schema to runtime-adjustable options.
    fn properties(&self, props: &mut PropertyList, runtime: bool) {
        let _ = (props, runtime);
    }

    /// Translate settings into named options on the codec context.
    fn update(&self, settings: &Settings, opts: &mut dyn CodecOptions) {
        let _ = (settings, opts);
    }

    /// Apply forced overrides after `update`.
    fn override_update(&self, settings: &Settings, opts: &mut dyn CodecOptions) {
        let _ = (settings, opts);
    }

    /// Echo the resolved options for diagnostics. Read-only.
    fn log_options(&self, settings: &Settings, opts: &dyn CodecOptions) {
        let _ = (settings, opts);
    }

    /// Migrate persisted settings from an older layout version.
    fn migrate(&self, settings: &mut Settings, version: u64) {
        let _ = (settings, version);
    }

    /// Force the pixel format the hardware requires, overriding whatever
    /// was negotiated elsewhere.
    fn override_colorformat(&self, target: &mut PixelFormat) {
        let _ = target;
    }

    /// Whether the encoder honors forced keyframe requests.
    fn has_keyframe_support(&self) -> bool {
        true
    }

    /// Whether encoding happens on dedicated hardware.
    fn is_hardware_encoder(&self) -> bool {
        false
    }

    /// Whether the codec context may be driven by multiple threads.
    fn has_threading_support(&self) -> bool {
        true
    }

    /// Whether the encoder negotiates pixel formats (as opposed to
    /// requiring a fixed one).
    fn has_pixel_format_support(&self) -> bool {
        true
    }
}

static HANDLERS: [(&str, &dyn Handler); 1] = [("h264_amf", &amf::h264::H264Handler)];

/// The registered handlers, keyed by FFmpeg encoder name.
pub fn registered_handlers() -> &'static [(&'static str, &'static dyn Handler)] {
    &HANDLERS
}

/// Handler for an FFmpeg encoder name, if one is registered.
pub fn handler_for(codec: &str) -> Option<&'static dyn Handler> {
    match registered_handlers()
        .iter()
        .find(|(name, _)| *name == codec)
    {
        Some((_, handler)) => Some(*handler),
        None => {
            debug!("no handler registered for encoder {codec}");
            None
        }
    }
}
