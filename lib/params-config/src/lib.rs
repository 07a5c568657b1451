mod env_overrides;
pub mod input;
pub mod log;

use config::{Config, File, FileFormat, FileSourceFile};
use envconfig::Envconfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{
    env_overrides::{EnvVarOverrides, EnvVarOverridesError},
    input::{InputConfig, OutputConfig},
    log::LoggingConfig,
};

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ParamsCliConfig {
    /// The logger configuration.
    ///
    /// Logs are written to stderr, so they never mix with the printed operation params.
    #[serde(default)]
    pub log: LoggingConfig,

    /// How the raw request parameters are read.
    #[serde(default)]
    pub input: InputConfig,

    /// How the normalized operation params are printed.
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ParamsConfigError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
    #[error("Failed to apply configuration overrides: {0}")]
    EnvVarOverridesError(#[from] EnvVarOverridesError),
    #[error("Failed to load the environment variables: {0}")]
    EnvVarLoadError(#[from] envconfig::Error),
    #[error("Failed to serialize the configuration schema: {0}")]
    SchemaSerializationError(#[from] serde_json::Error),
}

static DEFAULT_FILE_NAMES: &[&str] = &[
    "params.config.yaml",
    "params.config.yml",
    "params.config.json",
    "params.config.json5",
];

pub fn load_config(
    override_config_path: Option<PathBuf>,
) -> Result<ParamsCliConfig, ParamsConfigError> {
    let env_overrides = EnvVarOverrides::init_from_env()?;
    let mut config = Config::builder();

    if let Some(path_buf) = override_config_path {
        let as_file: File<FileSourceFile, _> = path_buf.into();
        config = config.add_source(as_file.required(true));
    } else {
        for name in DEFAULT_FILE_NAMES {
            config = config.add_source(File::with_name(name).required(false));
        }
    }

    config = env_overrides.apply_overrides(config)?;

    Ok(config.build()?.try_deserialize::<ParamsCliConfig>()?)
}

pub fn parse_yaml_config(config_raw: &str) -> Result<ParamsCliConfig, ParamsConfigError> {
    Config::builder()
        .add_source(File::from_str(config_raw, FileFormat::Yaml))
        .build()?
        .try_deserialize::<ParamsCliConfig>()
        .map_err(ParamsConfigError::ConfigLoadError)
}

/// JSON schema of the configuration file.
pub fn config_json_schema() -> Result<String, ParamsConfigError> {
    let schema = schemars::schema_for!(ParamsCliConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[cfg(test)]
mod tests {
    use crate::{
        input::InputFormat,
        log::{LogFormat, LogLevel},
        parse_yaml_config, ParamsCliConfig,
    };

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_yaml_config("").unwrap();

        assert!(matches!(config.input.format, InputFormat::Auto));
        assert_eq!(config.input.read_only, None);
        assert!(config.output.pretty);
        assert_eq!(config.log.filter, None);
    }

    #[test]
    fn parses_all_sections() {
        let config = parse_yaml_config(
            r#"
log:
  level: trace
  format: json
  filter: "hive_router_operation_params=trace"
input:
  format: query
  read_only: false
output:
  pretty: false
"#,
        )
        .unwrap();

        assert!(matches!(config.log.level, LogLevel::Trace));
        assert!(matches!(config.log.format, LogFormat::Json));
        assert_eq!(
            config.log.filter.as_deref(),
            Some("hive_router_operation_params=trace")
        );
        assert!(matches!(config.input.format, InputFormat::Query));
        assert_eq!(config.input.read_only, Some(false));
        assert!(!config.output.pretty);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = parse_yaml_config("inputs:\n  format: json\n").unwrap_err();
        assert!(err.to_string().contains("inputs"));
    }

    #[test]
    fn default_config_serializes() {
        let config = ParamsCliConfig::default();
        let serialized = serde_json::to_value(&config).unwrap();

        assert_eq!(serialized["input"]["format"], "auto");
        assert_eq!(serialized["output"]["pretty"], true);
    }

    #[test]
    fn schema_describes_sections() {
        let schema = super::config_json_schema().unwrap();

        assert!(schema.contains("\"log\""));
        assert!(schema.contains("\"input\""));
        assert!(schema.contains("\"output\""));
    }
}
