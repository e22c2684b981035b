//! Runs one recipe flow on JSON input and prints the JSON result.
//!
//! ```text
//! recipe-cli generate-from-ingredients --input '{"ingredients": "tomato, rice"}'
//! RECIPE_PROVIDER=canned recipe-cli generate-image-url --input '{"recipeName": "Paella"}'
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use recipe_genie::backend::adapter_from_config;
use recipe_genie::config::{LogFormat, RecipeConfig};
use recipe_genie::flows::{FlowKind, RecipeService};
use recipe_genie::telemetry;
use serde_json::Value;
use tracing::debug;

/// Recipe generation backed by a structured-output LLM.
#[derive(Parser)]
#[command(name = "recipe-cli", version)]
struct Cli {
    /// Flow to run: generate-from-ingredients, generate-for-event,
    /// get-named-recipe, filter-by-restriction or generate-image-url.
    flow: FlowKind,

    /// JSON input inline.
    #[arg(long, conflicts_with = "file")]
    input: Option<String>,

    /// Read JSON input from a file, or `-` for stdin.
    #[arg(long)]
    file: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, overriding the configuration.
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (text, json).
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Print compact JSON.
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = RecipeConfig::resolve(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.telemetry.level = level;
    }
    if let Some(format) = cli.log_format {
        config.telemetry.format = format;
    }
    telemetry::init(&config.telemetry)?;
    debug!(?config, "configuration resolved");

    let input = read_input(cli.input, cli.file.as_deref())?;
    let adapter = adapter_from_config(&config.provider)?;
    let service = RecipeService::new(adapter);

    let output = service.dispatch(cli.flow, input).await?;
    let rendered = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{rendered}");
    Ok(())
}

fn read_input(inline: Option<String>, file: Option<&Path>) -> Result<Value> {
    let raw = match (inline, file) {
        (Some(text), _) => text,
        (None, Some(path)) if path.as_os_str() == "-" => {
            std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?
        }
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("provide the flow input with --input or --file"),
    };
    serde_json::from_str(&raw).context("input is not valid JSON")
}
