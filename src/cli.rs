use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Version shown by `--version`.
pub const VERSION_NUMBER: &str = "2.0";

/// MPM install wizard - guided installation of MATLAB products
#[derive(Parser, Debug)]
#[command(name = "mpm-wizard")]
#[command(about = "Interactive wizard that downloads MPM and installs MATLAB products with it")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print the version number and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub version: bool,

    /// JSON file with wizard defaults (release, directories, mirror URL)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Close immediately instead of waiting for Enter at the end
    #[arg(long)]
    pub no_pause: bool,

    /// Print diagnostic logging to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse the process arguments, accepting the single-dash `-version`.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn version_line() -> String {
        format!("Version number: {}", VERSION_NUMBER)
    }
}

/// Rewrite `-version` to `--version`; clap would read it as clustered short flags.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            if arg == "-version" {
                OsString::from("--version")
            } else {
                arg
            }
        })
        .collect()
}
