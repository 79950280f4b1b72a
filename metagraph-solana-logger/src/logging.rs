use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs::File, str::FromStr};
use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, writer::MakeWriterExt},
    prelude::*,
    Registry,
};

/// Output format for log lines.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Plain,
}

/// Destination for log output.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    File,
}

/// Logging configuration, typically deserialized from a service's config file.
#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Log level, e.g. "info", "debug", "trace".
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub output: LogOutput,
    /// Path to the log file, required if output is "file".
    pub file_path: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
        }
    }
}

/// Installs the global tracing subscriber described by `config`.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    let level = Level::from_str(&config.level).unwrap_or(Level::INFO);
    let registry = Registry::default().with(LevelFilter::from_level(level));

    match config.output {
        LogOutput::File => {
            let path = config
                .file_path
                .as_deref()
                .context("log output is 'file' but 'file_path' is not specified")?;
            let writer = File::create(path)?.with_max_level(level);
            match config.format {
                LogFormat::Json => registry.with(fmt::layer().with_writer(writer).json()).try_init()?,
                LogFormat::Plain => registry
                    .with(fmt::layer().with_writer(writer).pretty())
                    .try_init()?,
            }
        }
        LogOutput::Stdout => {
            let writer = std::io::stdout.with_max_level(level);
            match config.format {
                LogFormat::Json => registry.with(fmt::layer().with_writer(writer).json()).try_init()?,
                LogFormat::Plain => registry
                    .with(fmt::layer().with_writer(writer).pretty())
                    .try_init()?,
            }
        }
    }

    Ok(())
}
