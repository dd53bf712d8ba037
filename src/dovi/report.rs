use std::sync::OnceLock;

use dolby_vision::utils::pq_to_nits;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::{DoviProfile, FelDataError, Level1, Level6, SceneRecord};

const PQ_12BIT_MAX: f64 = 4095.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReportFormat {
    Summary,
    Json,
}

impl ReportFormat {
    pub fn detect(raw: &str) -> Self {
        match json_offset(raw) {
            Some(_) => Self::Json,
            None => Self::Summary,
        }
    }
}

/// Byte offset of the first line opening a JSON value.
/// `dovi_tool info` prints `Parsing RPU file...` before the frame.
fn json_offset(raw: &str) -> Option<usize> {
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        if let Some('[' | '{') = line.trim_start().chars().next() {
            return Some(offset);
        }

        offset += line.len();
    }

    None
}

pub fn parse_report(raw: &str) -> Result<Vec<SceneRecord>, FelDataError> {
    match json_offset(raw) {
        Some(offset) => {
            debug!("Parsing extractor report as JSON from byte {offset}");
            parse_json(&raw[offset..])
        }
        None => {
            debug!("Parsing extractor report as a text summary");
            parse_summary(raw)
        }
    }
}

fn light_level_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"MaxCLL:\s*(\S+?)\s*nits,\s*MaxFALL:\s*(\S+?)\s*nits").expect("valid regex")
    })
}

#[derive(Debug, Default)]
struct SummaryBlock {
    header: String,
    line: usize,
    indent: Option<usize>,

    profile: Option<DoviProfile>,
    fel_present: bool,
    mastering: Option<(f64, f64)>,
    content_light_level: Option<Level6>,
    l6: Option<Level6>,
    in_l6_list: bool,
}

impl SummaryBlock {
    fn new(header: &str, line: usize) -> Self {
        Self {
            header: header.to_owned(),
            line,
            ..Default::default()
        }
    }

    fn parse_line(&mut self, line: &str, line_no: usize) -> Result<(), FelDataError> {
        let indent = line.len() - line.trim_start().len();
        let base_indent = *self.indent.get_or_insert(indent);
        let trimmed = line.trim();

        // Nested entries of a multi-line L6 list
        if indent > base_indent {
            if self.in_l6_list {
                let l6 = parse_light_levels(trimmed, line_no)?;
                self.l6 = Some(self.l6.map_or(l6, |prev| prev.max(l6)));
            }

            return Ok(());
        }

        self.in_l6_list = false;

        let Some((key, value)) = trimmed.split_once(':') else {
            return Ok(());
        };
        let value = value.trim();

        match key.trim() {
            "Profile" => {
                let (number, layer) = value.split_once(' ').unwrap_or((value, ""));
                self.profile = Some(number.parse().map_err(|_| {
                    FelDataError::malformed(format!("line {line_no}: invalid profile `{value}`"))
                })?);
                self.fel_present = layer.contains("FEL");
            }
            "RPU mastering display" => {
                let (min, max) = value
                    .trim_end_matches("nits")
                    .trim()
                    .split_once('/')
                    .ok_or_else(|| {
                        FelDataError::malformed(format!(
                            "line {line_no}: expected `min/max nits`, got `{value}`"
                        ))
                    })?;

                self.mastering = Some((
                    parse_number::<f64>(min, line_no)?,
                    parse_number::<f64>(max, line_no)?,
                ));
            }
            "RPU content light level (L1)" => {
                let (max_cll, max_fall) = light_level_values(value, line_no)?;
                self.content_light_level = Some(Level6::from_nits(
                    parse_number::<f64>(max_cll, line_no)?,
                    parse_number::<f64>(max_fall, line_no)?,
                ));
            }
            "L6 metadata" if value.is_empty() => {
                self.in_l6_list = true;
            }
            "L6 metadata" => {
                self.l6 = Some(parse_light_levels(value, line_no)?);
            }
            _ => (),
        }

        Ok(())
    }

    fn finish(self) -> Result<SceneRecord, FelDataError> {
        let profile = self.profile.ok_or_else(|| {
            FelDataError::malformed(format!(
                "line {}: block `{}` is missing the Profile field",
                self.line, self.header
            ))
        })?;

        let l1 = self
            .mastering
            .map(|(min, max)| Level1 { min, max, avg: None });

        Ok(SceneRecord {
            profile,
            fel_present: self.fel_present,
            l1,
            l6: self.l6,
            content_light_level: self.content_light_level,
        })
    }
}

fn parse_summary(raw: &str) -> Result<Vec<SceneRecord>, FelDataError> {
    let mut records = Vec::new();
    let mut current: Option<SummaryBlock> = None;

    for (i, line) in raw.lines().enumerate() {
        let line_no = i + 1;

        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            if let Some(block) = current.as_mut() {
                block.parse_line(line, line_no)?;
            }

            continue;
        }

        if let Some(block) = current.take() {
            records.push(block.finish()?);
        }

        let trimmed = line.trim_end();
        if let Some(header) = trimmed.strip_suffix(':') {
            if !header.contains(':') {
                current = Some(SummaryBlock::new(header, line_no));
            }
        }
    }

    if let Some(block) = current {
        records.push(block.finish()?);
    }

    debug!("Parsed {} summary block(s)", records.len());

    Ok(records)
}

fn light_level_values(value: &str, line_no: usize) -> Result<(&str, &str), FelDataError> {
    let caps = light_level_regex().captures(value).ok_or_else(|| {
        FelDataError::malformed(format!(
            "line {line_no}: expected `MaxCLL: N nits, MaxFALL: N nits`, got `{value}`"
        ))
    })?;

    match (caps.get(1), caps.get(2)) {
        (Some(cll), Some(fall)) => Ok((cll.as_str(), fall.as_str())),
        _ => Err(FelDataError::malformed(format!(
            "line {line_no}: incomplete light level values"
        ))),
    }
}

fn parse_light_levels(value: &str, line_no: usize) -> Result<Level6, FelDataError> {
    let (max_cll, max_fall) = light_level_values(value, line_no)?;

    Ok(Level6 {
        max_cll: parse_number(max_cll, line_no)?,
        max_fall: parse_number(max_fall, line_no)?,
    })
}

fn parse_number<T: std::str::FromStr>(value: &str, line_no: usize) -> Result<T, FelDataError> {
    value.trim().parse::<T>().map_err(|_| {
        FelDataError::malformed(format!("line {line_no}: `{value}` is not a valid number"))
    })
}

#[derive(Debug, Deserialize)]
struct JsonRpu {
    dovi_profile: u8,
    #[serde(default)]
    subprofile: Option<String>,
    #[serde(default)]
    vdr_dm_data: Option<JsonVdrDmData>,
}

#[derive(Debug, Deserialize)]
struct JsonVdrDmData {
    #[serde(default)]
    source_min_pq: u16,
    #[serde(default)]
    source_max_pq: u16,
    #[serde(default)]
    cmv29_metadata: Option<JsonDmData>,
    #[serde(default)]
    cmv40_metadata: Option<JsonDmData>,
}

#[derive(Debug, Deserialize)]
struct JsonDmData {
    #[serde(default)]
    ext_metadata_blocks: Vec<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct JsonLevel1 {
    max_pq: u16,
    avg_pq: u16,
}

#[derive(Debug, Deserialize)]
struct JsonLevel6 {
    max_content_light_level: u16,
    max_frame_average_light_level: u16,
}

impl JsonVdrDmData {
    fn blocks(&self) -> impl Iterator<Item = &serde_json::Map<String, Value>> {
        self.cmv29_metadata
            .iter()
            .chain(self.cmv40_metadata.iter())
            .flat_map(|dm| dm.ext_metadata_blocks.iter())
    }

    fn block<T: for<'de> Deserialize<'de>>(&self, level: &str) -> Result<Option<T>, FelDataError> {
        self.blocks()
            .find_map(|block| block.get(level))
            .map(|value| {
                T::deserialize(value).map_err(|e| {
                    FelDataError::malformed(format!("invalid {level} block: {e}"))
                })
            })
            .transpose()
    }
}

impl JsonRpu {
    fn into_record(self) -> Result<SceneRecord, FelDataError> {
        let (l1, l6, content_light_level) = match &self.vdr_dm_data {
            Some(vdr) => {
                let level1 = vdr.block::<JsonLevel1>("Level1")?;
                let avg = level1
                    .as_ref()
                    .map(|l1| round_to(pq12_to_nits(l1.avg_pq), 2));
                let content_light_level = level1.as_ref().map(|l1| {
                    Level6::from_nits(pq12_to_nits(l1.max_pq), pq12_to_nits(l1.avg_pq))
                });

                let l1 = (vdr.source_max_pq > 0).then(|| Level1 {
                    min: round_significant(pq12_to_nits(vdr.source_min_pq), 3),
                    max: round_significant(pq12_to_nits(vdr.source_max_pq), 3),
                    avg,
                });

                let l6 = vdr.block::<JsonLevel6>("Level6")?.map(|l6| Level6 {
                    max_cll: l6.max_content_light_level,
                    max_fall: l6.max_frame_average_light_level,
                });

                (l1, l6, content_light_level)
            }
            None => (None, None, None),
        };

        Ok(SceneRecord {
            profile: DoviProfile::new(self.dovi_profile, None),
            fel_present: self.subprofile.as_deref() == Some("FEL"),
            l1,
            l6,
            content_light_level,
        })
    }
}

fn parse_json(raw: &str) -> Result<Vec<SceneRecord>, FelDataError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| FelDataError::malformed(format!("invalid JSON: {e}")))?;

    let rpus = match value {
        Value::Array(list) => list,
        obj @ Value::Object(_) => vec![obj],
        _ => return Err(FelDataError::malformed("expected a JSON object or array")),
    };

    rpus.into_iter()
        .enumerate()
        .map(|(i, rpu)| {
            serde_json::from_value::<JsonRpu>(rpu)
                .map_err(|e| FelDataError::malformed(format!("RPU {i}: {e}")))
                .and_then(JsonRpu::into_record)
        })
        .collect()
}

pub fn pq12_to_nits(code: u16) -> f64 {
    pq_to_nits(code as f64 / PQ_12BIT_MAX)
}

/// 12 bit PQ codes only approximate the mastering display values,
/// e.g. 3079 is 1000.6 nits for a 1000 nits display
fn round_significant(value: f64, digits: i32) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }

    let exp = digits - 1 - value.log10().floor() as i32;
    if exp >= 0 {
        let factor = 10_f64.powi(exp);
        (value * factor).round() / factor
    } else {
        let factor = 10_f64.powi(-exp);
        (value / factor).round() * factor
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
