//! Command-line driver
//!
//! Reads a declaration set from a JSON file, runs the resolution pass and
//! prints the outcome. Exits non-zero when any error-severity diagnostic was
//! produced, so the binary slots into build scripts.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use mensura_diagnostics::Severity;
use mensura_models::DeclarationSet;
use mensura_population::{resolve, CancellationToken, Resolution};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mensura", version, about = "Resolves quantity type declarations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a declaration set into a population and its diagnostics.
    Resolve {
        /// Path to the declaration set, as JSON.
        declarations: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value = "json")]
        output: OutputFormat,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve { declarations, output } => {
            let json = fs::read_to_string(&declarations)
                .with_context(|| format!("failed to read {}", declarations.display()))?;
            let declarations = DeclarationSet::from_json(&json)
                .context("failed to parse the declaration set")?;

            let resolution = resolve(&declarations, &CancellationToken::new());
            let failed = resolution.has_errors();

            match output {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&resolution)?);
                }
                OutputFormat::Text => print_text(&resolution),
            }

            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
    }
}

fn print_text(resolution: &Resolution) {
    for diagnostic in &resolution.diagnostics {
        println!("{diagnostic}");
    }

    let errors = resolution
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity == Severity::Error)
        .count();
    let warnings = resolution
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity == Severity::Warning)
        .count();

    let population = &resolution.population;
    println!(
        "resolved {} units, {} scalars, {} vectors, {} groups, {} members; {errors} errors, {warnings} warnings",
        population.units.len(),
        population.scalars.len(),
        population.vectors.len(),
        population.groups.len(),
        population.group_members.len(),
    );
}
