//! CLI argument parsing module
//!
//! Handles the command-line interface using clap. The only option is the
//! path to the JSON configuration file.

use clap::{Arg, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::constants::{DEFAULT_CONFIG_PATH, LOG_FILE_NAME};
use crate::daemon::DaemonOptions;

/// Build the clap command definition
pub fn build_command() -> Command {
    Command::new("devguard")
        .version(env!("DEVGUARD_VERSION"))
        .about("Watch for camera and microphone use")
        .long_about(
            "Periodically checks whether the camera or microphone is in use, \
             records detections in device_usage.log and optionally sends an alert email.",
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to the JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value(DEFAULT_CONFIG_PATH),
        )
}

/// Parse command line arguments and return daemon options
pub fn parse_args() -> DaemonOptions {
    options_from_matches(&build_command().get_matches())
}

/// Parse an explicit argument list (first item is the binary name)
pub fn parse_from<I, T>(args: I) -> Result<DaemonOptions, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command().try_get_matches_from(args)?;
    Ok(options_from_matches(&matches))
}

fn options_from_matches(matches: &ArgMatches) -> DaemonOptions {
    let config_path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    DaemonOptions {
        config_path,
        log_path: PathBuf::from(LOG_FILE_NAME),
    }
}
