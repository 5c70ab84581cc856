//! AMD AMF H.264/AVC handler.
//!
//! Maps the two persisted settings (`H264.Profile`, `H264.Level`) onto the
//! FFmpeg `h264_amf` private options `"profile"` and `"level"`. The
//! `Unknown` sentinel of each enumeration is deliberately absent from the
//! forward tables, so a lookup for it fails closed and routes to the
//! per-key fallback instead of handing the vendor a sentinel string.

use tracing::info;

use super::super::{
    CodecOptions, EncoderInfo, Handler, PixelFormat, PropertyList, Settings,
};

/// Settings key for the stored profile integer.
pub const SETTING_PROFILE: &str = "H264.Profile";
/// Settings key for the stored level integer.
pub const SETTING_LEVEL: &str = "H264.Level";

/// H.264 profile as persisted in host settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i64)]
pub enum H264Profile {
    /// Sentinel: let the vendor pick. Not present in the token table.
    Unknown = -1,
    /// Constrained Baseline.
    ConstrainedBaseline = 0,
    /// Main.
    Main = 1,
    /// High (the default).
    High = 2,
}

/// H.264 level as persisted in host settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i64)]
#[allow(missing_docs)]
pub enum H264Level {
    /// Sentinel: automatic. Not present in the token table.
    Unknown = 0,
    L1_0 = 1,
    L1_0b = 2,
    L1_1 = 3,
    L1_2 = 4,
    L1_3 = 5,
    L2_0 = 6,
    L2_1 = 7,
    L2_2 = 8,
    L3_0 = 9,
    L3_1 = 10,
    L3_2 = 11,
    L4_0 = 12,
    L4_1 = 13,
    L4_2 = 14,
    L5_0 = 15,
    L5_1 = 16,
    L5_2 = 17,
    L6_0 = 18,
    L6_1 = 19,
    L6_2 = 20,
}

// Forward tables, built once. Sentinels are omitted so lookups for them
// miss and take the documented fallback.
const PROFILE_TOKENS: &[(i64, &str)] = &[
    (H264Profile::ConstrainedBaseline as i64, "constrained_baseline"),
    (H264Profile::Main as i64, "main"),
    (H264Profile::High as i64, "high"),
];

const LEVEL_TOKENS: &[(i64, &str)] = &[
    (H264Level::L1_0 as i64, "1.0"),
    (H264Level::L1_0b as i64, "1.0b"),
    (H264Level::L1_1 as i64, "1.1"),
    (H264Level::L1_2 as i64, "1.2"),
    (H264Level::L1_3 as i64, "1.3"),
    (H264Level::L2_0 as i64, "2.0"),
    (H264Level::L2_1 as i64, "2.1"),
    (H264Level::L2_2 as i64, "2.2"),
    (H264Level::L3_0 as i64, "3.0"),
    (H264Level::L3_1 as i64, "3.1"),
    (H264Level::L3_2 as i64, "3.2"),
    (H264Level::L4_0 as i64, "4.0"),
    (H264Level::L4_1 as i64, "4.1"),
    (H264Level::L4_2 as i64, "4.2"),
    (H264Level::L5_0 as i64, "5.0"),
    (H264Level::L5_1 as i64, "5.1"),
    (H264Level::L5_2 as i64, "5.2"),
    (H264Level::L6_0 as i64, "6.0"),
    (H264Level::L6_1 as i64, "6.1"),
    (H264Level::L6_2 as i64, "6.2"),
];

fn profile_token(value: i64) -> Option<&'static str> {
    PROFILE_TOKENS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, token)| *token)
}

fn level_token(value: i64) -> Option<&'static str> {
    LEVEL_TOKENS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, token)| *token)
}

/// Handler for the FFmpeg `h264_amf` encoder.
pub struct H264Handler;

impl Handler for H264Handler {
    fn adjust_info(&self, info: &mut EncoderInfo) {
        info.name = "AMD AMF H.264/AVC (via FFmpeg)".to_string();
        // Without the runtime the encoder cannot run; mark it deprecated so
        // it drops out of new configurations but existing ones still load.
        if !super::is_available() {
            info.deprecated = true;
        }
    }

    fn defaults(&self, settings: &mut Settings) {
        super::defaults(settings);
        settings.set_default_int(SETTING_PROFILE, H264Profile::High as i64);
        settings.set_default_int(SETTING_LEVEL, H264Level::Unknown as i64);
    }

    fn properties(&self, props: &mut PropertyList, runtime: bool) {
        if runtime {
            // No codec-specific runtime options; the family subset is all
            // there is.
            super::runtime_properties(props);
            return;
        }

        super::properties_pre(props);

        let mut group = PropertyList::new();

        let mut profile_entries: Vec<(String, i64)> =
            vec![("Default".to_string(), H264Profile::Unknown as i64)];
        profile_entries.extend(
            PROFILE_TOKENS
                .iter()
                .map(|(value, token)| (token.to_string(), *value)),
        );
        group.add_int_list(SETTING_PROFILE, "Profile", profile_entries);

        let mut level_entries: Vec<(String, i64)> =
            vec![("Automatic".to_string(), H264Level::Unknown as i64)];
        level_entries.extend(
            LEVEL_TOKENS
                .iter()
                .map(|(value, token)| (token.to_string(), *value)),
        );
        group.add_int_list(SETTING_LEVEL, "Level", level_entries);

        props.add_group("H264", "H.264/AVC", group);

        super::properties_post(props);
    }

    fn update(&self, settings: &Settings, opts: &mut dyn CodecOptions) {
        super::update(settings, opts);

        // Profile strictly before level. A profile miss (sentinel or
        // out-of-range value) writes nothing; a level miss writes "auto".
        if let Some(token) = profile_token(settings.int(SETTING_PROFILE)) {
            opts.set_str("profile", token);
        }
        match level_token(settings.int(SETTING_LEVEL)) {
            Some(token) => opts.set_str("level", token),
            None => opts.set_str("level", "auto"),
        }
    }

    fn override_update(&self, settings: &Settings, opts: &mut dyn CodecOptions) {
        super::override_update(settings, opts);
    }

    fn log_options(&self, settings: &Settings, opts: &dyn CodecOptions) {
        super::log_options(settings, opts);
        info!(
            "[H264/AVC encoder: 'profile' => {}]",
            opts.get_str("profile").unwrap_or("<default>")
        );
        info!(
            "[H264/AVC encoder: 'level' => {}]",
            opts.get_str("level").unwrap_or("<default>")
        );
    }

    fn migrate(&self, settings: &mut Settings, version: u64) {
        super::migrate(settings, version);
    }

    fn override_colorformat(&self, target: &mut PixelFormat) {
        // Hardware constraint, not a preference: AMF consumes NV12.
        *target = PixelFormat::Nv12;
    }

    fn has_keyframe_support(&self) -> bool {
        true
    }

    fn is_hardware_encoder(&self) -> bool {
        true
    }

    fn has_threading_support(&self) -> bool {
        false
    }

    fn has_pixel_format_support(&self) -> bool {
        false
    }
}
