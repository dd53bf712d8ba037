use std::fmt;
use std::str::FromStr;

use super::{FelDataError, Level1, Level6, MetadataSummary};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Encoder {
    X264,
    X265,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MasteringPrimaries {
    DisplayP3,
    DciP3,
    Bt2020,
}

#[derive(Debug, Copy, Clone)]
pub struct SynthesisConfig {
    pub primaries: MasteringPrimaries,
    /// MaxCLL/MaxFALL reported by the container, used when the RPU has no L6
    pub container_light_level: Option<Level6>,
}

impl Encoder {
    pub const fn luminance_scale(&self) -> f64 {
        match self {
            Encoder::X264 | Encoder::X265 => 10_000.0,
        }
    }

    pub const fn light_level_scale(&self) -> u32 {
        match self {
            Encoder::X264 | Encoder::X265 => 1,
        }
    }

    pub const fn master_display_flag(&self) -> &'static str {
        match self {
            Encoder::X264 => "--mastering-display",
            Encoder::X265 => "--master-display",
        }
    }

    pub const fn light_level_flag(&self) -> &'static str {
        match self {
            Encoder::X264 => "--cll",
            Encoder::X265 => "--max-cll",
        }
    }

    /// `G(..)B(..)R(..)WP(..)L(max,min)` value, when L1 is known
    pub fn master_display(&self, l1: Option<&Level1>, config: &SynthesisConfig) -> Option<String> {
        let scale = self.luminance_scale();

        l1.map(|l1| {
            format!(
                "{}L({},{})",
                config.primaries.chromaticity(),
                scaled_luminance(l1.max, scale),
                scaled_luminance(l1.min, scale)
            )
        })
    }

    pub fn light_level(&self, cll: &Level6) -> String {
        let scale = self.light_level_scale();

        format!(
            "{},{}",
            u32::from(cll.max_cll) * scale,
            u32::from(cll.max_fall) * scale
        )
    }

    pub fn synthesize(&self, summary: &MetadataSummary, config: &SynthesisConfig) -> String {
        let master_display = self
            .master_display(summary.l1.as_ref(), config)
            .map(|v| format!("{} \"{v}\"", self.master_display_flag()));
        let light_level = summary
            .light_level(config.container_light_level)
            .map(|(cll, _)| {
                format!("{} \"{}\"", self.light_level_flag(), self.light_level(&cll))
            });

        [master_display, light_level]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for Encoder {
    type Err = FelDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x264" => Ok(Encoder::X264),
            "x265" => Ok(Encoder::X265),
            _ => Err(FelDataError::UnsupportedEncoder(s.to_owned())),
        }
    }
}

impl fmt::Display for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoder::X264 => "x264",
            Encoder::X265 => "x265",
        })
    }
}

impl MasteringPrimaries {
    pub const fn chromaticity(&self) -> &'static str {
        match self {
            Self::DisplayP3 => "G(13250,34500)B(7500,3000)R(34000,16000)WP(15635,16450)",
            Self::DciP3 => "G(13250,34500)B(7500,3000)R(34000,16000)WP(15700,17550)",
            Self::Bt2020 => "G(8500,39850)B(6550,2300)R(35400,14600)WP(15635,16450)",
        }
    }

    pub fn from_mediainfo(value: &str) -> Option<Self> {
        let value = value.to_lowercase();

        if value.contains("display p3") {
            Some(MasteringPrimaries::DisplayP3)
        } else if value.contains("dci p3") {
            Some(MasteringPrimaries::DciP3)
        } else if value.contains("bt.2020") {
            Some(MasteringPrimaries::Bt2020)
        } else {
            None
        }
    }
}

impl fmt::Display for MasteringPrimaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MasteringPrimaries::DisplayP3 => "Display P3",
            MasteringPrimaries::DciP3 => "DCI P3",
            MasteringPrimaries::Bt2020 => "BT.2020",
        })
    }
}

/// Rounded down, ignoring float noise below 1e-6 units
pub fn scaled_luminance(nits: f64, scale: f64) -> u64 {
    let value = (nits * scale * 1e6).round() / 1e6;
    value.floor().max(0.0) as u64
}
