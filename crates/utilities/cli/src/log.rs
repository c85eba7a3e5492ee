//! Logging flags and the configuration derived from them.

use crate::LogFormat;
use clap::{ArgAction, Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Logging flags.
#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogArgs {
    /// Verbosity (0-5): 0 silences logs, 1 error, 2 warn, 3 info, 4 debug, 5 trace.
    ///
    /// Applies to both stdout and file logs.
    #[arg(
        short = 'v',
        global = true,
        default_value = "3",
        env = "ARB_LOG_LEVEL",
        action = ArgAction::Count,
    )]
    pub level: u8,
    /// Disables stdout logs.
    #[arg(long = "log.stdout.quiet", short = 'q', global = true, env = "ARB_LOG_STDOUT_QUIET")]
    pub stdout_quiet: bool,
    /// Format of stdout logs.
    #[arg(long = "log.stdout.format", default_value = "full", env = "ARB_LOG_STDOUT_FORMAT")]
    pub stdout_format: LogFormat,
    /// Directory for log files. File logging is off when unset.
    #[arg(long = "log.file.directory", env = "ARB_LOG_FILE_DIRECTORY")]
    pub file_directory: Option<PathBuf>,
    /// Format of file logs.
    #[arg(long = "log.file.format", default_value = "full", env = "ARB_LOG_FILE_FORMAT")]
    pub file_format: LogFormat,
    /// How often a new log file is started.
    #[arg(long = "log.file.rotation", default_value = "never", env = "ARB_LOG_FILE_ROTATION")]
    pub file_rotation: LogRotation,
}

impl Default for LogArgs {
    fn default() -> Self {
        Self {
            level: 3,
            stdout_quiet: false,
            stdout_format: LogFormat::Full,
            file_directory: None,
            file_format: LogFormat::Full,
            file_rotation: LogRotation::Never,
        }
    }
}

/// Rotation interval of log files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// A new file every minute.
    Minutely,
    /// A new file every hour.
    Hourly,
    /// A new file every day.
    Daily,
    /// A single file.
    #[default]
    Never,
}

/// File log settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogConfig {
    /// Directory the log files are written to.
    pub directory_path: PathBuf,
    /// Line format.
    pub format: LogFormat,
    /// Rotation interval.
    pub rotation: LogRotation,
}

/// Stdout log settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdoutLogConfig {
    /// Line format.
    pub format: LogFormat,
}

/// Resolved logging configuration.
///
/// The default logs to stdout at debug level, which is what tests want.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Level applied to every target unless `RUST_LOG` says otherwise.
    pub global_level: LevelFilter,
    /// Stdout logs, if enabled.
    pub stdout_logs: Option<StdoutLogConfig>,
    /// File logs, if enabled.
    pub file_logs: Option<FileLogConfig>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global_level: LevelFilter::DEBUG,
            stdout_logs: Some(StdoutLogConfig { format: LogFormat::Full }),
            file_logs: None,
        }
    }
}

impl From<LogArgs> for LogConfig {
    fn from(args: LogArgs) -> Self {
        let global_level = match args.level {
            0 => LevelFilter::OFF,
            1 => LevelFilter::ERROR,
            2 => LevelFilter::WARN,
            3 => LevelFilter::INFO,
            4 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };

        let stdout_logs =
            (!args.stdout_quiet).then_some(StdoutLogConfig { format: args.stdout_format });
        let file_logs = args.file_directory.map(|directory_path| FileLogConfig {
            directory_path,
            format: args.file_format,
            rotation: args.file_rotation,
        });

        Self { global_level, stdout_logs, file_logs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        log: LogArgs,
    }

    #[rstest]
    #[case(&["test"], LevelFilter::INFO)]
    #[case(&["test", "-v"], LevelFilter::ERROR)]
    #[case(&["test", "-vv"], LevelFilter::WARN)]
    #[case(&["test", "-vvvv"], LevelFilter::DEBUG)]
    #[case(&["test", "-vvvvvvv"], LevelFilter::TRACE)]
    fn test_verbosity(#[case] argv: &[&str], #[case] expected: LevelFilter) {
        let cli = TestCli::try_parse_from(argv).unwrap();
        assert_eq!(LogConfig::from(cli.log).global_level, expected);
    }

    #[test]
    fn test_file_logging_flags() {
        let cli = TestCli::try_parse_from([
            "test",
            "--log.file.directory",
            "/tmp/arb-logs",
            "--log.file.format",
            "json",
            "--log.file.rotation",
            "daily",
            "-q",
        ])
        .unwrap();
        let config = LogConfig::from(cli.log);

        assert_eq!(config.stdout_logs, None);
        assert_eq!(
            config.file_logs,
            Some(FileLogConfig {
                directory_path: PathBuf::from("/tmp/arb-logs"),
                format: LogFormat::Json,
                rotation: LogRotation::Daily,
            })
        );
    }

    #[test]
    fn test_default_args_match_parsed_defaults() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        assert_eq!(cli.log, LogArgs::default());
    }

    #[test]
    fn test_rotation_serde() {
        assert_eq!(serde_json::to_string(&LogRotation::Hourly).unwrap(), "\"hourly\"");
    }
}
