//! Command-line checker for FPP sources.
//!
//! # Usage
//!
//! ```bash
//! # Report diagnostics for each file, with the offending line underlined
//! fpp-check Sensor.fpp Topology.fpp
//!
//! # Machine-readable output with classified tokens
//! fpp-check --format json --tokens Sensor.fpp
//!
//! # Surface unknown identifiers as warnings
//! echo '{"unknown_identifiers": "warning"}' > fpp.json
//! fpp-check --config fpp.json Sensor.fpp
//!
//! # Read from stdin
//! cat Sensor.fpp | fpp-check
//! ```
//!
//! Exits with status 1 when any file has an error diagnostic.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fpp_rs::core::analyzer::{AnalysisResult, Analyzer, AnalyzerOptions, Diagnostic, render};
use fpp_rs::core::scanner::Token;
use fpp_rs::core::semantic_tokens::{SemanticTokenLegend, encode};

#[derive(Parser)]
#[command(name = "fpp-check")]
#[command(version)]
#[command(about = "Scan and analyze FPP sources, reporting diagnostics")]
struct Cli {
    /// Source files to check (reads stdin if none are given)
    files: Vec<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_enum)]
    format: OutputFormat,

    /// Also print classified identifier tokens
    #[arg(long)]
    tokens: bool,

    /// JSON file with analyzer options
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    legend: SemanticTokenLegend,
    files: Vec<FileReport<'a>>,
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: String,
    diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    classified: Option<&'a [Token]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    semantic_tokens: Option<Vec<u32>>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fpp_rs=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(&Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("fpp-check: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Check every input. Returns `false` when any error diagnostic was found.
fn run(cli: &Cli) -> Result<bool> {
    let options = match &cli.config {
        Some(path) => load_options(path)?,
        None => AnalyzerOptions::default(),
    };
    let analyzer = Analyzer::new(options);

    let inputs = if cli.files.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        vec![("<stdin>".to_string(), text)]
    } else {
        cli.files
            .iter()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))
                    .map(|text| (path.display().to_string(), text))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let results: Vec<(String, String, AnalysisResult)> = inputs
        .into_iter()
        .map(|(path, text)| {
            tracing::debug!(%path, bytes = text.len(), "checking");
            let result = analyzer.analyze_source(&text);
            (path, text, result)
        })
        .collect();

    let mut clean = true;
    let mut reports = Vec::new();
    for (path, text, result) in &results {
        clean &= !result.has_errors();
        match cli.format {
            OutputFormat::Human => print_human(path, text, result, cli.tokens),
            OutputFormat::Json => reports.push(FileReport {
                path: path.clone(),
                diagnostics: &result.diagnostics,
                classified: cli.tokens.then_some(result.classified.as_slice()),
                semantic_tokens: cli.tokens.then(|| encode(&result.classified)),
            }),
        }
    }

    if cli.format == OutputFormat::Json {
        let output = Report {
            legend: SemanticTokenLegend::new(),
            files: reports,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("failed to serialize report")?
        );
    }
    Ok(clean)
}

fn load_options(path: &Path) -> Result<AnalyzerOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn print_human(path: &str, text: &str, result: &AnalysisResult, tokens: bool) {
    for diagnostic in &result.diagnostics {
        println!("{path}: {}", render(diagnostic, text));
    }
    if tokens {
        for token in &result.classified {
            println!(
                "{path}:{}:{}: {} {} {:?}",
                token.line() + 1,
                token.start_column() + 1,
                token.text(),
                token.kind(),
                token.modifiers()
            );
        }
    }
    let errors = result.errors().count();
    let warnings = result.warnings().count();
    if errors + warnings > 0 {
        println!("{path}: {errors} error(s), {warnings} warning(s)");
    }
}
