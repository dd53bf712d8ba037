use std::ffi::OsStr;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use super::FelDataError;

pub struct ExternalTool {
    name: &'static str,
    program: PathBuf,
}

impl ExternalTool {
    pub fn new<P: Into<PathBuf>>(name: &'static str, program: P) -> Self {
        Self {
            name,
            program: program.into(),
        }
    }

    pub fn run<I, S>(&self, args: I) -> Result<String, FelDataError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);

        debug!("Running {:?}", cmd);

        let pb = spinner(format!("Running {}...", self.name));
        let output = cmd.output();
        pb.finish_and_clear();

        let output = output.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FelDataError::ExternalToolNotFound {
                tool: self.name,
                path: self.program.clone(),
            },
            _ => FelDataError::ExternalToolExecution {
                tool: self.name,
                reason: e.to_string(),
            },
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map_or_else(|| String::from("terminated by signal"), |c| format!("exit code {c}"));

            let reason = match stderr.trim() {
                "" => code,
                msg => format!("{code}: {msg}"),
            };

            return Err(FelDataError::ExternalToolExecution {
                tool: self.name,
                reason,
            });
        }

        String::from_utf8(output.stdout).map_err(|_| FelDataError::ExternalToolExecution {
            tool: self.name,
            reason: String::from("output is not valid UTF-8"),
        })
    }
}

fn spinner(msg: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}
