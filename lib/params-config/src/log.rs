use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// The minimum level of the printed logs.
    #[serde(default)]
    pub level: LogLevel,

    /// `text` prints an indented tree of spans and events, `json` prints one JSON object per line.
    #[serde(default)]
    pub format: LogFormat,

    /// A `tracing` filter directive (e.g. `hive_router_operation_params=trace`).
    /// When set, it takes precedence over `level`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn env_filter_directive(&self) -> &str {
        self.filter.as_deref().unwrap_or(self.level.as_str())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Default for LogLevel {
    #[cfg(debug_assertions)]
    fn default() -> Self {
        LogLevel::Debug
    }

    #[cfg(not(debug_assertions))]
    fn default() -> Self {
        LogLevel::Info
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub enum LogFormat {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "json")]
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LogLevel, LoggingConfig};

    #[test]
    fn filter_takes_precedence_over_level() {
        let config = LoggingConfig {
            level: LogLevel::Warn,
            filter: Some("hive_router_operation_params=trace".into()),
            ..Default::default()
        };
        assert_eq!(
            config.env_filter_directive(),
            "hive_router_operation_params=trace"
        );

        let config = LoggingConfig {
            level: LogLevel::Warn,
            ..Default::default()
        };
        assert_eq!(config.env_filter_directive(), "warn");
    }

    #[test]
    fn parses_levels_case_insensitively() {
        assert!(matches!("TRACE".parse::<LogLevel>(), Ok(LogLevel::Trace)));
        assert_eq!(
            "verbose".parse::<LogLevel>().unwrap_err(),
            "Invalid log level: verbose"
        );
    }
}
