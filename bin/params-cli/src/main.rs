mod args;
mod logger;

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use clap::Parser;
use hive_router_operation_params::{
    is_read_only_method, InputError, JsonObject, ObjectOrRaw, OperationParams, RawParams,
};
use hive_router_params_config::{config_json_schema, input::InputFormat, load_config};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{args::Args, logger::configure_logging};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read input from '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read input from stdin: {0}")]
    ReadStdin(std::io::Error),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("Failed to serialize operation params: {0}")]
    Serialize(#[from] sonic_rs::Error),
}

/// What gets printed: the normalized params, plus what helps to understand how they were built.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Inspection<'a> {
    #[serde(flatten)]
    params: &'a OperationParams,
    persisted_query_hash: Option<&'a str>,
    original_input: &'a JsonObject,
}

impl<'a> From<&'a OperationParams> for Inspection<'a> {
    fn from(params: &'a OperationParams) -> Self {
        Inspection {
            params,
            persisted_query_hash: params.persisted_query_hash(),
            original_input: params.original_input(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_config_schema {
        println!("{}", config_json_schema()?);
        return Ok(());
    }

    let config = load_config(args.config.clone())?;
    configure_logging(&config.log);

    let input = read_input(args.input.as_deref())?;
    let format = args.format.unwrap_or(config.input.format).detect(&input);
    let read_only = resolve_read_only(&args, config.input.read_only, format);
    debug!(format = format.as_str(), read_only, "normalizing request parameters");

    let params = parse_params(&input, format, read_only)?;
    report_suspicious_params(&params);

    let inspection = Inspection::from(&params);
    let pretty = config.output.pretty && !args.compact;
    let rendered = if pretty {
        sonic_rs::to_string_pretty(&inspection)
    } else {
        sonic_rs::to_string(&inspection)
    }
    .map_err(CliError::Serialize)?;

    println!("{rendered}");

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(CliError::ReadStdin)?;
            Ok(input)
        }
    }
}

/// `--read-only` wins over `--method`, which wins over the configuration,
/// which wins over what the input format usually implies.
fn resolve_read_only(args: &Args, configured: Option<bool>, format: InputFormat) -> bool {
    args.read_only
        .or_else(|| args.method.as_ref().map(is_read_only_method))
        .or(configured)
        .unwrap_or_else(|| format.default_read_only())
}

fn parse_params(
    input: &str,
    format: InputFormat,
    read_only: bool,
) -> Result<OperationParams, CliError> {
    let raw = match format {
        InputFormat::Json => RawParams::from_json_slice(input.as_bytes())?,
        InputFormat::Query | InputFormat::Auto => RawParams::from_query_string(input.trim())?,
    };

    Ok(raw.into_operation_params(read_only))
}

/// Points at what an executor would most likely reject. Nothing is rejected here.
fn report_suspicious_params(params: &OperationParams) {
    if params.query().is_none() && params.query_id().is_none() {
        warn!("neither a query nor a persisted document id was found");
    }

    for (name, field) in [
        ("variables", params.variables()),
        ("extensions", params.extensions()),
    ] {
        match field {
            ObjectOrRaw::Absent | ObjectOrRaw::Object(_) => {}
            ObjectOrRaw::Raw(_) => warn!("{name} is not valid JSON, kept as a string"),
            other => warn!("{name} must be an object, got {}", other.kind()),
        }
    }

    if let (Some(query_id), Some(hash)) = (params.query_id(), params.persisted_query_hash()) {
        if query_id != hash {
            info!(
                query_id,
                hash, "explicit document id differs from the persisted query hash, using the id"
            );
        }
    }
}
