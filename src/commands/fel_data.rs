use clap::{Args, ValueHint};
use std::path::PathBuf;

use super::{L1PolicyCli, PrimariesCli};
use crate::dovi::Encoder;

#[derive(Args, Debug)]
pub struct FelDataArgs {
    #[clap(
        id = "rpu_input",
        long = "rpu-input",
        short = 'r',
        help = "Sets the input RPU file to use (RPU.bin)",
        value_hint = ValueHint::FilePath
    )]
    pub rpu_input: Option<PathBuf>,

    #[clap(
        id = "report",
        long,
        help = "Reads a saved dovi_tool summary or JSON export instead of running dovi_tool",
        conflicts_with = "rpu_input",
        value_hint = ValueHint::FilePath
    )]
    pub report: Option<PathBuf>,

    #[clap(
        id = "input",
        long,
        short = 'i',
        help = "Sets the source video file to inspect with mediainfo (video.ext)",
        value_hint = ValueHint::FilePath
    )]
    pub input: Option<PathBuf>,

    #[clap(
        id = "dovi_tool",
        long = "dovi-tool",
        short = 'd',
        env = "DOVI_TOOL",
        default_value = "dovi_tool",
        help = "Path to the dovi_tool executable",
        value_hint = ValueHint::ExecutablePath
    )]
    pub dovi_tool: PathBuf,

    #[clap(
        id = "mediainfo",
        long,
        short = 'm',
        env = "MEDIAINFO",
        default_value = "mediainfo",
        help = "Path to the mediainfo executable",
        value_hint = ValueHint::ExecutablePath
    )]
    pub mediainfo: PathBuf,

    #[clap(
        id = "txt_output",
        long = "txt-output",
        short = 'o',
        help = "Writes the output to this text file",
        value_hint = ValueHint::FilePath
    )]
    pub txt_output: Option<PathBuf>,

    #[clap(
        long,
        short = 's',
        help = "Saves the output beside the input as `<name>_fel_data.txt`, overrides --txt-output"
    )]
    pub save: bool,

    #[clap(
        long = "encoder-command-only",
        short = 'x',
        help = "Only prints the generated encoder arguments"
    )]
    pub encoder_command_only: bool,

    #[clap(
        long,
        short = 'e',
        default_value = "x265",
        help = "Target encoder for the generated arguments (x264, x265)"
    )]
    pub encoder: Encoder,

    #[clap(
        value_enum,
        long,
        short = 'p',
        default_value = "display-p3",
        help = "Mastering display primaries used when the input file doesn't provide them"
    )]
    pub primaries: PrimariesCli,

    #[clap(
        value_enum,
        long = "l1-policy",
        default_value = "max",
        help = "How L1 luminance values are combined across scenes"
    )]
    pub l1_policy: L1PolicyCli,

    #[clap(
        long = "strict-profile",
        help = "Fails when scenes report different Dolby Vision profiles"
    )]
    pub strict_profile: bool,
}
