use config::{builder::BuilderState, ConfigBuilder, ConfigError};
use envconfig::Envconfig;
use tracing::debug;

use crate::{
    input::InputFormat,
    log::{LogFormat, LogLevel},
};

#[derive(Envconfig)]
pub struct EnvVarOverrides {
    // Logger overrides
    #[envconfig(from = "LOG_LEVEL")]
    pub log_level: Option<LogLevel>,
    #[envconfig(from = "LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
    #[envconfig(from = "LOG_FILTER")]
    pub log_filter: Option<String>,

    // Input overrides
    #[envconfig(from = "PARAMS_INPUT_FORMAT")]
    pub input_format: Option<InputFormat>,
    #[envconfig(from = "PARAMS_READ_ONLY")]
    pub read_only: Option<bool>,

    // Output overrides
    #[envconfig(from = "PARAMS_OUTPUT_PRETTY")]
    pub output_pretty: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnvVarOverridesError {
    #[error("Failed to override configuration: {0}")]
    FailedToOverrideConfig(#[from] ConfigError),
}

impl EnvVarOverrides {
    pub fn apply_overrides<T: BuilderState>(
        mut self,
        mut config: ConfigBuilder<T>,
    ) -> Result<ConfigBuilder<T>, EnvVarOverridesError> {
        if let Some(log_level) = self.log_level.take() {
            debug!("[config-override] 'log.level' = {:?}", log_level);
            config = config.set_override("log.level", log_level.as_str())?;
        }
        if let Some(log_format) = self.log_format.take() {
            debug!("[config-override] 'log.format' = {:?}", log_format);
            config = config.set_override("log.format", log_format.as_str())?;
        }
        if let Some(log_filter) = self.log_filter.take() {
            debug!("[config-override] 'log.filter' = {:?}", log_filter);
            config = config.set_override("log.filter", log_filter)?;
        }

        if let Some(input_format) = self.input_format.take() {
            debug!("[config-override] 'input.format' = {:?}", input_format);
            config = config.set_override("input.format", input_format.as_str())?;
        }
        if let Some(read_only) = self.read_only.take() {
            debug!("[config-override] 'input.read_only' = {}", read_only);
            config = config.set_override("input.read_only", read_only)?;
        }

        if let Some(pretty) = self.output_pretty.take() {
            debug!("[config-override] 'output.pretty' = {}", pretty);
            config = config.set_override("output.pretty", pretty)?;
        }

        Ok(config)
    }
}
