use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use super::encoder::scaled_luminance;
use super::media_info::ContainerInfo;
use super::{
    Encoder, FelDataError, Level1, Level6, LightLevelSource, MetadataSummary, SynthesisConfig,
};

const NOT_PRESENT: &str = "Not present";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputMode {
    Full,
    CommandOnly,
}

pub struct Report<'a> {
    pub summary: &'a MetadataSummary,
    pub encoder: Encoder,
    pub synthesis: SynthesisConfig,
    pub container: Option<&'a ContainerInfo>,
}

impl Report<'_> {
    pub fn render(&self, mode: OutputMode) -> String {
        let command = self.encoder.synthesize(self.summary, &self.synthesis);

        match mode {
            OutputMode::CommandOnly => format!("{command}\n"),
            OutputMode::Full => self.render_full(&command),
        }
    }

    fn render_full(&self, command: &str) -> String {
        let summary = self.summary;
        let encoder = self.encoder;

        let mut lines = vec![
            String::from("Dolby Vision Summary:"),
            format!("  Profile: {}", summary.profile),
            format!("  FEL: {}", if summary.fel_present { "Yes" } else { "No" }),
            format!("  Scenes: {}", summary.scene_count),
            format!("  L1: {}", format_l1(summary.l1.as_ref())),
            format!("  L6: {}", format_l6(summary.l6.as_ref())),
            format!(
                "  L1 content light level: {}",
                format_l6(summary.content_light_level.as_ref())
            ),
        ];

        if let Some(diff) = self.luminance_comparison() {
            lines.push(String::from("\nMediaInfo/RPU Luminance:"));
            lines.extend(diff);
        }

        let primaries_source = if self.container.and_then(|c| c.primaries).is_some() {
            "input file"
        } else {
            "fallback"
        };
        let master_display = encoder.master_display(summary.l1.as_ref(), &self.synthesis);
        let light_level = summary.light_level(self.synthesis.container_light_level);

        lines.extend([
            format!("\nGenerated Values ({encoder}):"),
            format!("  Primaries: {} ({primaries_source})", self.synthesis.primaries),
            format!(
                "  Maximum CLL: {}",
                light_level.map_or(NOT_PRESENT.to_owned(), |(cll, source)| {
                    format!("{} ({})", cll.max_cll, source_name(source))
                })
            ),
            format!(
                "  Maximum FALL: {}",
                light_level.map_or(NOT_PRESENT.to_owned(), |(cll, source)| {
                    format!("{} ({})", cll.max_fall, source_name(source))
                })
            ),
            format!(
                "  Master Display: {}",
                master_display.as_deref().unwrap_or(NOT_PRESENT)
            ),
            format!("\n{encoder} arguments:"),
        ]);

        if command.is_empty() {
            lines.push(String::from("(no HDR metadata available)"));
        } else {
            lines.push(command.to_owned());
        }

        let mut out = lines.join("\n");
        out.push('\n');

        out
    }

    /// Mastering luminance from the container vs the RPU, in 0.0001 nits
    fn luminance_comparison(&self) -> Option<Vec<String>> {
        let (mi_min, mi_max) = self.container?.mastering_luminance?;
        let l1 = self.summary.l1?;
        let scale = self.encoder.luminance_scale();

        let mi = (scaled_luminance(mi_min, scale), scaled_luminance(mi_max, scale));
        let rpu = (scaled_luminance(l1.min, scale), scaled_luminance(l1.max, scale));

        let mut lines = vec![
            format!("  MediaInfo: {}/{}", mi.0, mi.1),
            format!("  RPU: {}/{}", rpu.0, rpu.1),
        ];
        if mi != rpu {
            lines.push(String::from(
                "  (detected a difference, be sure to use the generated values below)",
            ));
        }

        Some(lines)
    }
}

fn format_l1(l1: Option<&Level1>) -> String {
    match l1 {
        Some(l1) => {
            let avg = l1
                .avg
                .map_or_else(|| String::from("n/a"), |avg| format!("{avg:.2} nits"));

            format!("min {:.4} nits, max {:.2} nits, avg {avg}", l1.min, l1.max)
        }
        None => NOT_PRESENT.to_owned(),
    }
}

fn source_name(source: LightLevelSource) -> &'static str {
    match source {
        LightLevelSource::L6 => "L6 metadata",
        LightLevelSource::Container => "input file",
        LightLevelSource::L1 => "L1 content light level",
    }
}

fn format_l6(l6: Option<&Level6>) -> String {
    match l6 {
        Some(l6) => format!("MaxCLL {} nits, MaxFALL {} nits", l6.max_cll, l6.max_fall),
        None => NOT_PRESENT.to_owned(),
    }
}

pub struct OutputSink {
    destination: Option<PathBuf>,
}

impl OutputSink {
    pub fn new(destination: Option<PathBuf>) -> Self {
        Self { destination }
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    pub fn write(&self, content: &str) -> Result<(), FelDataError> {
        if let Some(path) = &self.destination {
            debug!("Writing output to {}", path.display());
            write_file(path, content)?;
        }

        let mut out = stdout().lock();
        out.write_all(content.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|source| FelDataError::OutputWrite {
                path: PathBuf::from("<stdout>"),
                source,
            })
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), FelDataError> {
    let to_error = |source: std::io::Error| FelDataError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(to_error)?);
    writer.write_all(content.as_bytes()).map_err(to_error)?;
    writer.flush().map_err(to_error)
}
