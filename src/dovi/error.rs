use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::DoviProfile;

#[derive(Error, Debug)]
pub enum FelDataError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{tool}: executable not found at `{}`", .path.display())]
    ExternalToolNotFound { tool: &'static str, path: PathBuf },

    #[error("{tool}: execution failed ({reason})")]
    ExternalToolExecution { tool: &'static str, reason: String },

    #[error("report parser: malformed report: {0}")]
    MalformedReport(String),

    #[error("normalizer: {0}")]
    EmptyReport(String),

    #[error("command synthesizer: unsupported encoder `{0}`, expected x264 or x265")]
    UnsupportedEncoder(String),

    #[error("normalizer: inconsistent profiles, scene 0 is {first} but scene {index} is {found}")]
    InconsistentProfile {
        first: DoviProfile,
        found: DoviProfile,
        index: usize,
    },

    #[error("output: failed writing `{}`", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FelDataError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidArguments(_) | Self::UnsupportedEncoder(_) => 2,
            Self::ExternalToolNotFound { .. } | Self::ExternalToolExecution { .. } => 3,
            Self::MalformedReport(_) | Self::EmptyReport(_) | Self::InconsistentProfile { .. } => 4,
            Self::OutputWrite { .. } => 5,
        }
    }

    pub(crate) fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedReport(msg.into())
    }
}
