use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// The encoding of the raw request parameters.
    #[serde(default)]
    pub format: InputFormat,

    /// Whether the operation comes from a read-only transport.
    ///
    /// When not set, query strings are treated as read-only (like a GET request)
    /// and JSON bodies are not (like a POST request).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// JSON when the input starts with `{` or `[`, a query string otherwise.
    #[default]
    Auto,
    /// A JSON object, as sent in the body of a POST request.
    Json,
    /// Url-encoded parameters, as sent in the query string of a GET request.
    Query,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Auto => "auto",
            InputFormat::Json => "json",
            InputFormat::Query => "query",
        }
    }

    /// Resolves `Auto` by looking at the input.
    pub fn detect(self, input: &str) -> InputFormat {
        match self {
            InputFormat::Auto => {
                let trimmed = input.trim_start();
                if trimmed.starts_with('{') || trimmed.starts_with('[') {
                    InputFormat::Json
                } else {
                    InputFormat::Query
                }
            }
            other => other,
        }
    }

    /// Read-only default of the transport that usually carries this format.
    pub fn default_read_only(&self) -> bool {
        matches!(self, InputFormat::Query)
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(InputFormat::Auto),
            "json" => Ok(InputFormat::Json),
            "query" => Ok(InputFormat::Query),
            _ => Err(format!("Invalid input format: {}", s)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Pretty-print the JSON output.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}
