use std::process::ExitCode;

use clap::{ArgAction, Parser};
use env_logger::Env;

mod commands;
use commands::FelDataArgs;

mod dovi;
use dovi::{fel_info::FelInfo, FelDataError};

#[derive(Parser, Debug)]
#[clap(
    name = env!("CARGO_PKG_NAME"),
    about = "Parses Dolby Vision FEL/MEL metadata into x264/x265 arguments",
    author = "quietvoid",
    version = env!("CARGO_PKG_VERSION"),
    disable_version_flag = true
)]
struct Opt {
    #[clap(short = 'v', long, action = ArgAction::Version, help = "Print version")]
    version: Option<bool>,

    #[clap(long, help = "Enables debug logging")]
    verbose: bool,

    #[clap(flatten)]
    args: FelDataArgs,
}

fn main() -> ExitCode {
    let opt = Opt::parse();

    let default_level = if opt.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match FelInfo::run(opt.args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");

            let code = e
                .downcast_ref::<FelDataError>()
                .map_or(1, FelDataError::exit_code);

            ExitCode::from(code)
        }
    }
}
