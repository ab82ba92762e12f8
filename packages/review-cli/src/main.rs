//! Classify a Web of Science export with a language model.
//!
//! Writes one JSON object per article (JSON lines) in column order
//! `identifier, title, year, sport, population, technology, outcome`.
//! Nothing is written unless every article was classified.

mod config;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{Context, Result};
use article_extraction::ai::{LanguageModelExt, OpenAiChat};
use article_extraction::{
    LanguageModel, OutputRow, Pipeline, PipelineConfig, ReplyFormat, Vocabularies,
};
use clap::Parser;
use secrecy::ExposeSecret;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "sport-review")]
#[command(about = "Classify sports technology literature with a language model")]
struct Cli {
    /// Plain-text bibliographic export (TI/AB/PY/UT tagged records)
    input: PathBuf,

    /// Write JSON lines here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with sports, technologies, populations and outcomes
    #[arg(long)]
    vocabulary: Option<PathBuf>,

    /// Articles in flight at once (overrides MODEL_CONCURRENCY)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Model name (overrides MODEL_NAME)
    #[arg(long)]
    model: Option<String>,

    /// OpenAI-compatible base URL (overrides MODEL_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Prompt/reply contract: json or legacy
    #[arg(long, default_value = "json")]
    format: ReplyFormat,

    /// Request rate cap (overrides MODEL_REQUESTS_PER_SECOND)
    #[arg(long)]
    requests_per_second: Option<NonZeroU32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean JSON lines
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,article_extraction=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let raw_text = tokio::fs::read_to_string(&cli.input)
        .await
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let vocabularies = match &cli.vocabulary {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Vocabularies::from_json(&json).context("Invalid vocabulary file")?
        }
        None => Vocabularies::builtin(),
    };

    let model = build_model(&cli, &config);
    let pipeline_config = PipelineConfig::new()
        .with_concurrency(cli.concurrency.unwrap_or(config.concurrency))
        .with_reply_format(cli.format);
    let pipeline = Pipeline::with_config(model, vocabularies, pipeline_config);

    // Ctrl-C aborts the batch without writing anything
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling run");
            on_signal.cancel();
        }
    });

    let rows = pipeline
        .run_with_cancel(&raw_text, cancel)
        .await
        .context("Classification run failed")?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_rows(BufWriter::new(file), &rows)?;
        }
        None => write_rows(io::stdout().lock(), &rows)?,
    }

    tracing::info!(rows = rows.len(), "Done");
    Ok(())
}

fn build_model(cli: &Cli, config: &Config) -> Box<dyn LanguageModel> {
    let base_url = cli.base_url.as_deref().unwrap_or(&config.base_url);
    let model_name = cli.model.as_deref().unwrap_or(&config.model);

    let mut client = OpenAiChat::new(base_url, model_name);
    if let Some(key) = &config.api_key {
        client = client.with_api_key(key.expose_secret());
    }

    tracing::info!(base_url, model = model_name, "Using model");

    match cli.requests_per_second.or(config.requests_per_second) {
        Some(rate) => Box::new(client.rate_limited(rate)),
        None => Box::new(client),
    }
}

/// Write rows as JSON lines.
fn write_rows(mut out: impl Write, rows: &[OutputRow]) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut out, &row.to_serialized())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
