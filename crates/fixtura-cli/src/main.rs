mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use fixtura_core::{
    Error as CoreError, ShapeRegistry, registry_json_schema, validate_registry,
    validate_registry_json,
};
use fixtura_generate::{FixtureEngine, GenerationError, OverrideRule};
use thiserror::Error;

use config::{load_document, load_options, parse_override};
use logging::init_logging;

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("registry document has {0} structural issue(s)")]
    InvalidDocument(usize),
}

#[derive(Parser, Debug)]
#[command(name = "fixtura", version, about = "Fixtura CLI")]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a test object for a registry type and print it as JSON.
    Generate(GenerateArgs),
    /// Print the JSON Schema of registry documents.
    Schema(SchemaArgs),
    /// Validate a registry document.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Registry document (JSON, or TOML by `.toml` extension).
    #[arg(long)]
    registry: PathBuf,
    /// Record or enum name to generate.
    #[arg(long = "type", value_name = "NAME")]
    type_name: String,
    /// TOML file with generation options; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Path prefix for the top-level fields.
    #[arg(long)]
    prefix: Option<String>,
    /// Override as PATTERN=VALUE (VALUE is JSON or plain text). Repeatable.
    #[arg(long = "override", value_name = "PATTERN=VALUE", value_parser = parse_override)]
    overrides: Vec<OverrideRule>,
    /// Instant used for every date/time field (RFC 3339).
    #[arg(long)]
    reference_instant: Option<DateTime<Utc>>,
    /// Set optional fields to null.
    #[arg(long, default_value_t = false)]
    null_optionals: bool,
    /// Element count for lists, sets and maps; zero or negative uses 3.
    #[arg(long, allow_negative_numbers = true)]
    collection_size: Option<i64>,
    /// Maximum record nesting depth.
    #[arg(long)]
    max_depth: Option<usize>,
    /// Write the JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print compact JSON.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write the schema here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Registry document to check.
    #[arg(long)]
    registry: PathBuf,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Schema(args) => run_schema(args),
        Command::Validate(args) => run_validate(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        registry,
        type_name,
        config,
        prefix,
        overrides,
        reference_instant,
        null_optionals,
        collection_size,
        max_depth,
        out,
        compact,
    } = args;

    let timer = Instant::now();
    let mut options = load_options(config.as_deref())?;
    if let Some(prefix) = prefix {
        options.prefix = prefix;
    }
    if !overrides.is_empty() {
        options.overrides = overrides.into_iter().chain(options.overrides).collect();
    }
    if reference_instant.is_some() {
        options.reference_instant = reference_instant;
    }
    if null_optionals {
        options.use_null_for_optional_fields = true;
    }
    if let Some(size) = collection_size {
        options.collection_size = size;
    }
    if let Some(depth) = max_depth {
        options.max_depth = depth;
    }

    let shapes = ShapeRegistry::load(&registry)?;
    validate_registry(&shapes)?;
    tracing::info!(
        event = "registry_loaded",
        path = %registry.display(),
        records = shapes.records.len(),
        enums = shapes.enums.len()
    );

    let engine = FixtureEngine::new(options)?.with_resolver(Arc::new(shapes));
    let params = engine.parameters();
    tracing::info!(
        event = "engine_ready",
        prefix = %engine.prefix(),
        collection_size = params.collection_size,
        max_depth = params.max_depth,
        overrides = params.overrides.len(),
        null_optionals = params.use_null_for_optional_fields
    );
    let value = engine.generate_named(&type_name)?;

    let rendered = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    write_output(out.as_ref(), &rendered)?;

    tracing::info!(
        event = "object_generated",
        type_name = %type_name,
        duration_ms = timer.elapsed().as_millis()
    );
    Ok(())
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let schema = registry_json_schema();
    let rendered = serde_json::to_string_pretty(&schema)?;
    write_output(args.out.as_ref(), &rendered)
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let document = load_document(&args.registry)?;
    let schema = serde_json::to_value(registry_json_schema())?;
    let issues = validate_registry_json(&document, &schema)?;
    if !issues.is_empty() {
        for issue in &issues {
            tracing::error!(event = "schema_violation", path = %issue.path, message = %issue.message);
            eprintln!("{}: {}", issue.path, issue.message);
        }
        return Err(CliError::InvalidDocument(issues.len()));
    }

    let shapes: ShapeRegistry = serde_json::from_value(document)?;
    validate_registry(&shapes)?;
    println!(
        "registry ok: {} record(s), {} enum(s)",
        shapes.records.len(),
        shapes.enums.len()
    );
    Ok(())
}

fn write_output(out: Option<&PathBuf>, rendered: &str) -> Result<(), CliError> {
    match out {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))?;
            tracing::info!(event = "output_written", path = %path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
