//! # linklens CLI Application
//!
//! This module implements the command-line interface for linklens, giving
//! access to the analysis pipeline and to the inference diagnostics.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands:
//!   - `analyze`: run the full pipeline on one URL
//!   - `check-env`: report whether the inference credential is configured
//!   - `probe-models`: check which configured models answer
//!
//! Both JSON and text output formats are supported. Logs go to stderr and
//! are controlled with `RUST_LOG`.

mod telemetry;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use linklens::inference::{
    API_KEY_ENV, BASE_URL_ENV, HuggingFaceClient, InferenceConfig, ProbeStatus, probe_models,
};
use linklens::pipeline::{AnalysisResult, AnalyzeRequest, Analyzer, AnalyzerConfig};
use serde::Serialize;
use telemetry::OtelGuard;
use tracing::instrument;

#[derive(Parser)]
#[command(author, version, about = "Analyze web pages into a title, a description and topical tags", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a web page
    Analyze(AnalyzeArgs),

    /// Report on the inference credential in the environment
    CheckEnv(FormatArgs),

    /// Send a small request to every configured model
    ProbeModels(FormatArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// URL to analyze
    #[arg(required_unless_present = "request", conflicts_with = "request")]
    url: Option<String>,

    /// Request document, e.g. '{"url": "https://example.com"}'
    #[arg(short, long)]
    request: Option<String>,

    /// Output format (text|json)
    #[arg(short, long, default_value = "json", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct FormatArgs {
    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let _otel: OtelGuard = telemetry::init_tracing_subscriber()?;

    // Execute the appropriate command
    match cli.command {
        Some(Commands::Analyze(args)) => {
            analyze_command(args).await?;
        }
        Some(Commands::CheckEnv(args)) => {
            check_env_command(args)?;
        }
        Some(Commands::ProbeModels(args)) => {
            probe_models_command(args).await?;
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["linklens", "--help"]);
        }
    }

    Ok(())
}

#[instrument]
async fn analyze_command(args: AnalyzeArgs) -> anyhow::Result<()> {
    let request = match (args.request, args.url) {
        (Some(document), _) => serde_json::from_str::<AnalyzeRequest>(&document)
            .map_err(|e| anyhow!("Invalid request document: {}", e))?,
        (None, Some(url)) => AnalyzeRequest { url },
        (None, None) => return Err(anyhow!("A URL or --request is required")),
    };

    let analyzer = Analyzer::from_config(AnalyzerConfig::from_env())?;

    match analyzer.analyze_request(&request).await {
        Ok(result) => {
            if args.format == "json" {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.to_body())?);
            Err(anyhow!(err))
        }
    }
}

fn print_result(result: &AnalysisResult) {
    println!("Title:       {}", result.title);
    println!("Description: {}", result.description);
    println!("Tags:        {}", result.tag_line);
    println!(
        "Method:      {} (classification {})",
        result.ai_generated.method.as_str(),
        if result.ai_generated.success {
            "succeeded"
        } else {
            "not used"
        }
    );
    println!();
    for tag in &result.ai_generated.tags_with_confidence {
        println!("  {:<24} {:>3}%  {}", tag.tag, tag.confidence, tag.source);
    }
    if let Some(err) = &result.debug.description_error {
        println!("\nDescription error: {}", err);
    }
    if let Some(err) = &result.debug.classification_error {
        println!("Classification error: {}", err);
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvReport {
    variable: &'static str,
    configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    starts_with_hf: Option<bool>,
    base_url: String,
    related_variables: Vec<String>,
}

fn check_env_command(args: FormatArgs) -> anyhow::Result<()> {
    let config = InferenceConfig::from_env();

    let mut related_variables: Vec<String> = std::env::vars()
        .map(|(name, _)| name)
        .filter(|name| {
            let upper = name.to_uppercase();
            upper.contains("HUGGING") || upper.contains("HF_")
        })
        .collect();
    related_variables.sort();

    let report = EnvReport {
        variable: API_KEY_ENV,
        configured: config.has_credential(),
        length: config.api_token.as_ref().map(|t| t.chars().count()),
        preview: config.token_preview(),
        starts_with_hf: config.token_has_hf_prefix(),
        base_url: config.base_url.clone(),
        related_variables,
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match (&report.preview, report.length) {
        (Some(preview), Some(length)) => {
            println!("{} is set ({} characters, {})", API_KEY_ENV, length, preview);
            if report.starts_with_hf == Some(false) {
                println!("Warning: the key does not start with \"hf_\"");
            }
        }
        _ => println!(
            "{} is not set; analysis will use rule-based tags only",
            API_KEY_ENV
        ),
    }
    println!("Inference endpoint: {} (override with {})", report.base_url, BASE_URL_ENV);
    if report.related_variables.is_empty() {
        println!("No related variables found");
    } else {
        println!("Related variables: {}", report.related_variables.join(", "));
    }

    Ok(())
}

#[instrument]
async fn probe_models_command(args: FormatArgs) -> anyhow::Result<()> {
    let config = InferenceConfig::from_env();
    let client = if config.has_credential() {
        Some(HuggingFaceClient::from_config(&config)?)
    } else {
        None
    };

    let report = probe_models(client.as_ref(), &config).await;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !report.configured {
        println!("Not configured: set {} to probe models", API_KEY_ENV);
        return Ok(());
    }

    println!(
        "Key {}; {} of {} models working",
        report.key_preview.as_deref().unwrap_or("?"),
        report.working,
        report.results.len()
    );
    for probe in &report.results {
        let status = match probe.status {
            ProbeStatus::Ok => "ok",
            ProbeStatus::Error => "error",
        };
        let detail = probe
            .preview
            .as_deref()
            .or(probe.error.as_deref())
            .unwrap_or_default();
        println!(
            "  {:<28} {:<6} {:>6} ms  {}",
            probe.model, status, probe.latency_ms, detail
        );
    }
    match &report.recommendation {
        Some(model) => println!("Recommended summarizer: {}", model),
        None => println!("No summarization model is working"),
    }

    Ok(())
}
