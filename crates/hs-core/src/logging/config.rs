//! Logging configuration: `-v`/`-q`/`--log-format` over `HALLSCOPE_LOG`,
//! `HALLSCOPE_LOG_FORMAT` and `RUST_LOG`.

use clap::ValueEnum;
use std::fmt;

/// Environment variable holding the log level.
pub const ENV_LOG: &str = "HALLSCOPE_LOG";
/// Environment variable holding the log format.
pub const ENV_LOG_FORMAT: &str = "HALLSCOPE_LOG_FORMAT";

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event.
    Jsonl,
}

/// Levels reachable from `-q`, the default, and `-v` through `-vvv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Warn,
        }
    }
}

impl LogConfig {
    /// CLI values win over `HALLSCOPE_LOG` / `HALLSCOPE_LOG_FORMAT`, which win
    /// over `RUST_LOG`. Unparseable env values are ignored.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(cli_level, cli_format, |key| std::env::var(key).ok())
    }

    fn from_lookup(
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = LogConfig::default();

        if let Some(val) = lookup(ENV_LOG) {
            if let Ok(level) = LogLevel::from_str(val.trim(), true) {
                config.level = level;
            }
        } else if let Some(val) = lookup("RUST_LOG") {
            // The most verbose level mentioned anywhere wins.
            if let Some(level) = LogLevel::value_variants()
                .iter()
                .rev()
                .find(|level| val.contains(&level.to_string()))
            {
                config.level = *level;
            }
        }

        if let Some(val) = lookup(ENV_LOG_FORMAT) {
            if let Ok(format) = LogFormat::from_str(val.trim(), true) {
                config.format = format;
            }
        }

        config.level = cli_level.unwrap_or(config.level);
        config.format = cli_format.unwrap_or(config.format);
        config
    }
}
