use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info, warn};

use super::external::ExternalTool;
use super::media_info::ContainerInfo;
use super::output::{OutputMode, OutputSink, Report};
use super::report::parse_report;
use super::{
    Encoder, FelDataError, MasteringPrimaries, MetadataSummary, NormalizerConfig, ProfilePolicy,
    SceneRecord, SynthesisConfig,
};
use crate::commands::FelDataArgs;

const SAVE_SUFFIX: &str = "_fel_data.txt";

#[derive(Debug)]
enum ReportSource {
    Rpu(PathBuf),
    Saved(PathBuf),
}

pub struct FelInfo {
    source: Option<ReportSource>,
    input: Option<PathBuf>,

    dovi_tool: ExternalTool,
    mediainfo: ExternalTool,

    normalizer: NormalizerConfig,
    fallback_primaries: MasteringPrimaries,
    encoder: Encoder,
    mode: OutputMode,
    sink: OutputSink,
}

impl FelInfo {
    pub fn run(args: FelDataArgs) -> Result<()> {
        let fel_info = Self::from_args(args)?;
        fel_info.execute()
    }

    fn from_args(args: FelDataArgs) -> Result<Self, FelDataError> {
        let FelDataArgs {
            rpu_input,
            report,
            input,
            dovi_tool,
            mediainfo,
            txt_output,
            save,
            encoder_command_only,
            encoder,
            primaries,
            l1_policy,
            strict_profile,
        } = args;

        let source = match (rpu_input, report) {
            (Some(_), Some(_)) => {
                return Err(FelDataError::InvalidArguments(String::from(
                    "'-r/--rpu-input' and '--report' cannot be used together",
                )))
            }
            (Some(rpu), None) => Some(ReportSource::Rpu(rpu)),
            (None, Some(report)) => Some(ReportSource::Saved(report)),
            (None, None) => None,
        };

        if source.is_none() && input.is_none() {
            return Err(FelDataError::InvalidArguments(String::from(
                "'-r/--rpu-input' (RPU.bin), '--report' or '-i/--input' (video.ext) is required",
            )));
        }

        let source_path = source.as_ref().map(|s| match s {
            ReportSource::Rpu(path) | ReportSource::Saved(path) => path.as_path(),
        });
        for path in source_path.into_iter().chain(input.as_deref()) {
            ensure_exists(path)?;
        }

        let destination = if save {
            if txt_output.is_some() {
                warn!("'-s/--save' overrides '-o/--txt-output'");
            }

            let base = input.as_deref().or(source_path).ok_or_else(|| {
                FelDataError::InvalidArguments(String::from("no input to save the output beside"))
            })?;

            Some(save_path(base)?)
        } else {
            txt_output
        };

        let profile_policy = if strict_profile {
            ProfilePolicy::Consensus
        } else {
            ProfilePolicy::First
        };

        let mode = if encoder_command_only {
            OutputMode::CommandOnly
        } else {
            OutputMode::Full
        };

        Ok(Self {
            source,
            input,
            dovi_tool: ExternalTool::new("dovi_tool", dovi_tool),
            mediainfo: ExternalTool::new("mediainfo", mediainfo),
            normalizer: NormalizerConfig {
                profile_policy,
                l1_policy: l1_policy.into(),
            },
            fallback_primaries: primaries.into(),
            encoder,
            mode,
            sink: OutputSink::new(destination),
        })
    }

    fn execute(&self) -> Result<()> {
        let records = self.report_records()?;

        let container = self
            .input
            .as_deref()
            .map(|input| {
                info!("Inspecting {} with mediainfo", input.display());
                ContainerInfo::inspect(&self.mediainfo, input)
            })
            .transpose()?;

        let records = match (records, &container) {
            (Some(records), _) => records,
            (None, Some(container)) => container.to_scene_record().into_iter().collect(),
            (None, None) => Vec::new(),
        };

        if records.is_empty() && self.source.is_none() {
            return Err(FelDataError::EmptyReport(String::from(
                "the input file doesn't carry any Dolby Vision metadata",
            ))
            .into());
        }

        let summary = MetadataSummary::from_records(&records, &self.normalizer)?;

        let synthesis = SynthesisConfig {
            primaries: container
                .as_ref()
                .and_then(|c| c.primaries)
                .unwrap_or(self.fallback_primaries),
            container_light_level: container.as_ref().and_then(|c| c.light_level),
        };

        let report = Report {
            summary: &summary,
            encoder: self.encoder,
            synthesis,
            container: container.as_ref(),
        };
        let content = report.render(self.mode);

        self.sink.write(&content)?;

        if let Some(path) = self.sink.destination() {
            info!("Saved output to {}", path.display());
        }

        Ok(())
    }

    fn report_records(&self) -> Result<Option<Vec<SceneRecord>>, FelDataError> {
        let raw = match &self.source {
            Some(ReportSource::Rpu(rpu)) => {
                info!("Parsing {} with dovi_tool", rpu.display());

                let args = [
                    OsStr::new("info"),
                    OsStr::new("-i"),
                    rpu.as_os_str(),
                    OsStr::new("--summary"),
                ];
                self.dovi_tool.run(args)?
            }
            Some(ReportSource::Saved(path)) => fs::read_to_string(path).map_err(|e| {
                FelDataError::InvalidArguments(format!(
                    "failed reading report `{}`: {e}",
                    path.display()
                ))
            })?,
            None => return Ok(None),
        };

        let records = parse_report(&raw)?;
        debug!("Report contains {} scene(s)", records.len());

        Ok(Some(records))
    }
}

fn ensure_exists(path: &Path) -> Result<(), FelDataError> {
    if path.exists() {
        Ok(())
    } else {
        Err(FelDataError::InvalidArguments(format!(
            "input file `{}` doesn't exist",
            path.display()
        )))
    }
}

/// `<dir>/<stem>_fel_data.txt` beside the input
pub fn save_path(base: &Path) -> Result<PathBuf, FelDataError> {
    let stem = base.file_stem().ok_or_else(|| {
        FelDataError::InvalidArguments(format!("invalid file name `{}`", base.display()))
    })?;

    let mut name = stem.to_os_string();
    name.push(SAVE_SUFFIX);

    Ok(base.with_file_name(name))
}
