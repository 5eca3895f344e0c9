//! Initializes `tracing` from the `logger` configuration section.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config;

// Module targets that receive the configured level by default.
const MODULE_WHITELIST: &[&str] = &["tower_http", "vocpub"];

static NONBLOCKING_WORK_GUARD_KEEP: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
pub enum LogLevel {
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self {
            Self::Off => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(level)
    }
}

#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
pub enum Format {
    #[serde(rename = "compact")]
    #[default]
    Compact,
    #[serde(rename = "pretty")]
    Pretty,
    #[serde(rename = "json")]
    Json,
}

#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
pub enum Rotation {
    #[serde(rename = "minutely")]
    Minutely,
    #[serde(rename = "hourly")]
    #[default]
    Hourly,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "never")]
    Never,
}

impl From<Rotation> for tracing_appender::rolling::Rotation {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::Minutely => Self::MINUTELY,
            Rotation::Hourly => Self::HOURLY,
            Rotation::Daily => Self::DAILY,
            Rotation::Never => Self::NEVER,
        }
    }
}

/// Builds the env-filter directive for `level`.
///
/// `RUST_LOG` wins, then the configured override, then the configured level
/// applied to the whitelisted targets.
fn filter_directive(level: LogLevel, override_filter: Option<&str>) -> String {
    if let Ok(from_env) = std::env::var("RUST_LOG") {
        return from_env;
    }
    if let Some(filter) = override_filter {
        return filter.to_string();
    }
    MODULE_WHITELIST
        .iter()
        .map(|m| format!("{m}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|err| {
        eprintln!("logger filter `{directive}` is invalid ({err}), falling back to `info`");
        EnvFilter::new("info")
    })
}

/// The file output has its own level and ignores `override_filter`.
fn file_directive(file_appender: &config::LoggerFileAppender) -> String {
    filter_directive(file_appender.level, None)
}

fn init_layer<W>(make_writer: W, format: Format, ansi: bool) -> Box<dyn Layer<Registry> + Sync + Send>
where
    W: for<'writer> MakeWriter<'writer> + Sync + Send + 'static,
{
    match format {
        Format::Compact => fmt::Layer::default()
            .with_ansi(ansi)
            .with_writer(make_writer)
            .compact()
            .boxed(),
        Format::Pretty => fmt::Layer::default()
            .with_ansi(ansi)
            .with_writer(make_writer)
            .pretty()
            .boxed(),
        Format::Json => fmt::Layer::default()
            .with_ansi(ansi)
            .with_writer(make_writer)
            .json()
            .boxed(),
    }
}

/// Installs the global subscriber. Each output is filtered on its own level.
/// Calling it again is a no-op.
pub fn init(config: &config::Logger) {
    if !config.enable {
        return;
    }

    let mut layers: Vec<Box<dyn Layer<Registry> + Sync + Send>> = Vec::new();

    if let Some(file_appender) = config.file_appender.as_ref().filter(|f| f.enable) {
        let dir = file_appender.dir.as_deref().unwrap_or("./logs");
        let prefix = file_appender.filename_prefix.as_deref().unwrap_or("vocpub");
        let appender = tracing_appender::rolling::RollingFileAppender::new(
            file_appender.rotation.into(),
            dir,
            prefix,
        );
        let layer = if file_appender.non_blocking {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let _ = NONBLOCKING_WORK_GUARD_KEEP.set(guard);
            init_layer(non_blocking, file_appender.format, false)
        } else {
            init_layer(appender, file_appender.format, false)
        };
        let filter = env_filter(&file_directive(file_appender));
        layers.push(layer.with_filter(filter).boxed());
    }

    let stdout_filter = env_filter(&filter_directive(
        config.level,
        config.override_filter.as_deref(),
    ));
    layers.push(
        init_layer(std::io::stdout, config.format, true)
            .with_filter(stdout_filter)
            .boxed(),
    );

    if let Err(err) = tracing_subscriber::registry().with(layers).try_init()
    {
        eprintln!("logger already initialized: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_filter_wins_over_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert_eq!(
            filter_directive(LogLevel::Debug, Some("vocpub=trace")),
            "vocpub=trace"
        );
        assert_eq!(
            filter_directive(LogLevel::Warn, None),
            "tower_http=warn,vocpub=warn"
        );
    }

    #[test]
    fn file_output_uses_its_own_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let file_appender = config::LoggerFileAppender {
            enable: true,
            non_blocking: false,
            level: LogLevel::Error,
            format: Format::Json,
            rotation: Rotation::Never,
            dir: None,
            filename_prefix: None,
        };
        assert_eq!(
            file_directive(&file_appender),
            "tower_http=error,vocpub=error"
        );
    }
}
