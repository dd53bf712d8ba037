use std::ffi::OsStr;
use std::path::Path;
use std::sync::OnceLock;

use log::{debug, warn};
use regex::Regex;
use serde::Deserialize;

use super::external::ExternalTool;
use super::{DoviProfile, FelDataError, Level1, Level6, MasteringPrimaries, SceneRecord};

#[derive(Debug, Deserialize)]
struct MediaInfoOutput {
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    #[serde(default)]
    track: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    #[serde(rename = "@type")]
    kind: String,

    #[serde(rename = "HDR_Format_Profile")]
    hdr_format_profile: Option<String>,
    #[serde(rename = "HDR_Format_Settings")]
    hdr_format_settings: Option<String>,

    #[serde(rename = "MasteringDisplay_ColorPrimaries")]
    mastering_display_color_primaries: Option<String>,
    #[serde(rename = "MasteringDisplay_Luminance")]
    mastering_display_luminance: Option<String>,

    #[serde(rename = "MaxCLL")]
    max_cll: Option<String>,
    #[serde(rename = "MaxFALL")]
    max_fall: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContainerInfo {
    pub primaries: Option<MasteringPrimaries>,
    /// (min, max) in nits
    pub mastering_luminance: Option<(f64, f64)>,
    pub light_level: Option<Level6>,
    pub profile: Option<DoviProfile>,
    /// `EL` in `HDR_Format_Settings`. mediainfo doesn't tell FEL from MEL.
    pub enhancement_layer: bool,
}

fn luminance_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"min:\s*(\S+?)\s*cd/m2,\s*max:\s*(\S+?)\s*cd/m2").expect("valid regex")
    })
}

fn codec_profile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"d(?:vhe|vh1|av1|va1|avc)\.(\d{2})").expect("valid regex"))
}

impl ContainerInfo {
    pub fn inspect(mediainfo: &ExternalTool, input: &Path) -> Result<Self, FelDataError> {
        let raw = mediainfo.run([OsStr::new("--Output=JSON"), input.as_os_str()])?;

        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, FelDataError> {
        let output: MediaInfoOutput = serde_json::from_str(raw)
            .map_err(|e| FelDataError::malformed(format!("mediainfo: invalid JSON: {e}")))?;

        let video = output
            .media
            .into_iter()
            .flat_map(|media| media.track)
            .find(|track| track.kind == "Video")
            .ok_or_else(|| FelDataError::malformed("mediainfo: input file is lacking a video track"))?;

        let primaries = video
            .mastering_display_color_primaries
            .as_deref()
            .and_then(|value| {
                let primaries = MasteringPrimaries::from_mediainfo(value);
                if primaries.is_none() {
                    warn!("Unknown mastering display primaries `{value}`, using the fallback");
                }

                primaries
            });

        let mastering_luminance = video
            .mastering_display_luminance
            .as_deref()
            .map(parse_luminance)
            .transpose()?;

        let light_level = match (video.max_cll.as_deref(), video.max_fall.as_deref()) {
            (Some(cll), Some(fall)) => Some(Level6 {
                max_cll: parse_light_level(cll)?,
                max_fall: parse_light_level(fall)?,
            }),
            _ => None,
        };

        let profile = video
            .hdr_format_profile
            .as_deref()
            .and_then(|value| codec_profile_regex().captures(value))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u8>().ok())
            .map(|major| DoviProfile::new(major, None));

        let enhancement_layer = video.hdr_format_settings.as_deref().is_some_and(|settings| {
            settings
                .split(|c| c == '+' || c == '/')
                .any(|layer| layer.trim() == "EL")
        });

        let info = Self {
            primaries,
            mastering_luminance,
            light_level,
            profile,
            enhancement_layer,
        };
        debug!("Container info: {info:?}");

        Ok(info)
    }

    /// Single scene built from the container, used when no RPU is available
    pub fn to_scene_record(&self) -> Option<SceneRecord> {
        let profile = self.profile?;

        if self.enhancement_layer {
            warn!("mediainfo can't tell FEL from MEL, pass the RPU to detect FEL");
        }

        Some(SceneRecord {
            profile,
            fel_present: false,
            l1: self.mastering_luminance.map(|(min, max)| Level1 {
                min,
                max,
                avg: None,
            }),
            l6: self.light_level,
            content_light_level: None,
        })
    }
}

fn parse_luminance(value: &str) -> Result<(f64, f64), FelDataError> {
    let invalid = || FelDataError::malformed(format!("mediainfo: invalid luminance `{value}`"));

    let caps = luminance_regex().captures(value).ok_or_else(invalid)?;
    let min = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
    let max = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());

    min.zip(max).ok_or_else(invalid)
}

fn parse_light_level(value: &str) -> Result<u16, FelDataError> {
    value
        .split_whitespace()
        .next()
        .and_then(|v| v.parse::<u16>().ok())
        .ok_or_else(|| FelDataError::malformed(format!("mediainfo: invalid light level `{value}`")))
}
