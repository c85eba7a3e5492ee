//! [tracing_subscriber] setup.

use crate::{LogConfig, LogRotation};
use serde::{Deserialize, Serialize};
use std::io;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::MakeWriter,
    prelude::__tracing_subscriber_SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Prefix of log file names.
const LOG_FILE_PREFIX: &str = "arb-node.log";

/// Line format of emitted logs.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[clap(rename_all = "lowercase")]
pub enum LogFormat {
    /// The default `tracing-subscriber` format.
    #[default]
    Full,
    /// One JSON object per line.
    Json,
    /// Multi-line, human oriented.
    Pretty,
    /// Single-line, abbreviated.
    Compact,
}

impl LogFormat {
    fn layer<W>(self, writer: W) -> Box<dyn Layer<Registry> + Send + Sync>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let layer = tracing_subscriber::fmt::layer().with_writer(writer);
        match self {
            Self::Full => layer.boxed(),
            Self::Json => layer.json().boxed(),
            Self::Pretty => layer.pretty().boxed(),
            Self::Compact => layer.compact().boxed(),
        }
    }
}

impl LogConfig {
    /// Installs the global subscriber.
    ///
    /// `env_filter` defaults to `RUST_LOG`; the configured global level is added on top of it.
    /// Fails if a global subscriber is already set.
    pub fn init_tracing_subscriber(&self, env_filter: Option<EnvFilter>) -> Result<(), TryInitError> {
        let mut layers = Vec::new();

        if let Some(stdout_logs) = &self.stdout_logs {
            layers.push(stdout_logs.format.layer(io::stdout));
        }

        if let Some(file_logs) = &self.file_logs {
            let directory = file_logs.directory_path.clone();
            let appender = match file_logs.rotation {
                LogRotation::Minutely => tracing_appender::rolling::minutely(directory, LOG_FILE_PREFIX),
                LogRotation::Hourly => tracing_appender::rolling::hourly(directory, LOG_FILE_PREFIX),
                LogRotation::Daily => tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX),
                LogRotation::Never => tracing_appender::rolling::never(directory, LOG_FILE_PREFIX),
            };
            layers.push(file_logs.format.layer(appender));
        }

        let env_filter = env_filter
            .unwrap_or_else(EnvFilter::from_default_env)
            .add_directive(self.global_level.into());

        tracing_subscriber::registry().with(layers).with(env_filter).try_init()
    }
}

/// Installs a debug-level stdout subscriber, ignoring the error if one is already installed.
pub fn init_test_tracing() {
    let _ = LogConfig::default().init_tracing_subscriber(None);
}
