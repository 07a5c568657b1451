use std::path::PathBuf;

use clap::Parser;
use hive_router_params_config::input::InputFormat;
use http::Method;

/// Normalizes raw GraphQL request parameters and prints the resulting operation params.
#[derive(Debug, Parser)]
#[command(name = "params-cli", version)]
pub struct Args {
    /// Path to the configuration file.
    /// Defaults to `params.config.{yaml,yml,json,json5}` in the current directory.
    #[arg(long, env = "PARAMS_CONFIG_FILE_PATH")]
    pub config: Option<PathBuf>,

    /// Encoding of the input: `auto`, `json` or `query`.
    #[arg(long)]
    pub format: Option<InputFormat>,

    /// HTTP method the parameters were received with. Safe methods (GET, HEAD, ...) are read-only.
    #[arg(long)]
    pub method: Option<Method>,

    /// Explicitly marks the operation as read-only or not, takes precedence over `--method`.
    #[arg(long)]
    pub read_only: Option<bool>,

    /// Print the output on a single line.
    #[arg(long)]
    pub compact: bool,

    /// Print the JSON schema of the configuration file and exit.
    #[arg(long)]
    pub print_config_schema: bool,

    /// File containing the raw parameters. Reads stdin when omitted or `-`.
    pub input: Option<PathBuf>,
}
