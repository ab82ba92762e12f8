//! The Pipeline - main entry point for classifying an export.
//!
//! Each record goes through two prompt round trips (classification, then
//! PICO) back-to-back. Records are independent, so several may be in flight
//! at once, bounded by [`PipelineConfig::concurrency`]; output order always
//! equals input order.
//!
//! A model failure is the only fatal condition. It aborts the whole run and
//! no rows are returned. Callers that want to persist rows as they complete
//! should use [`Pipeline::run_stream`].

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, Result};
use crate::pipeline::grounding::{filter_grounded, normalize_candidates};
use crate::pipeline::parse::parse_records;
use crate::pipeline::prompts::{format_classification_prompt, format_pico_prompt, prompt_hashes};
use crate::pipeline::reply::{
    JsonObjectInterpreter, LabelledLineInterpreter, MarkdownTableInterpreter, ReplyInterpreter,
};
use crate::pipeline::validate::validate_sport;
use crate::traits::model::LanguageModel;
use crate::types::{
    classification::{ClassificationResult, OutputRow, PicoResult, NONE},
    config::{PipelineConfig, ReplyFormat},
    record::ArticleRecord,
    reply::ExtractedReply,
    vocabulary::Vocabularies,
};

/// Drives records through the model and assembles output rows.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = Pipeline::new(model, Vocabularies::builtin());
/// let rows = pipeline.run(&export_text).await?;
/// ```
pub struct Pipeline<M: LanguageModel> {
    model: M,
    vocabularies: Vocabularies,
    config: PipelineConfig,
}

impl<M: LanguageModel> Pipeline<M> {
    /// Create a new pipeline with the default configuration.
    pub fn new(model: M, vocabularies: Vocabularies) -> Self {
        Self {
            model,
            vocabularies,
            config: PipelineConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(model: M, vocabularies: Vocabularies, config: PipelineConfig) -> Self {
        Self {
            model,
            vocabularies,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn vocabularies(&self) -> &Vocabularies {
        &self.vocabularies
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Parse `raw_text` and classify every record.
    ///
    /// Returns one row per parsed record, in input order, or the first model
    /// error.
    pub async fn run(&self, raw_text: &str) -> Result<Vec<OutputRow>> {
        self.run_records(&parse_records(raw_text)).await
    }

    /// Classify already-parsed records.
    pub async fn run_records(&self, records: &[ArticleRecord]) -> Result<Vec<OutputRow>> {
        self.config.validate()?;
        self.log_start(records.len());

        let rows: Vec<OutputRow> = stream::iter(records)
            .map(|record| self.process_record(record))
            .buffered(self.config.concurrency)
            .try_collect()
            .await?;

        info!(rows = rows.len(), "Classification run complete");
        Ok(rows)
    }

    /// Run with cancellation support.
    pub async fn run_with_cancel(
        &self,
        raw_text: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<OutputRow>> {
        tokio::select! {
            result = self.run(raw_text) => result,
            _ = cancel.cancelled() => Err(ExtractionError::Cancelled),
        }
    }

    /// Return a stream of rows in input order.
    ///
    /// Rows are yielded as soon as they and every earlier row are done. The
    /// stream ends after the first error.
    pub fn run_stream(&self, raw_text: &str) -> BoxStream<'_, Result<OutputRow>> {
        if let Err(e) = self.config.validate() {
            return stream::once(async move { Err::<OutputRow, _>(e) }).boxed();
        }

        let records = parse_records(raw_text);
        self.log_start(records.len());

        stream::iter(records)
            .map(move |record| async move { self.process_record(&record).await })
            .buffered(self.config.concurrency)
            .scan(false, |failed, result| {
                // Stop after yielding the first error
                let item = if *failed {
                    None
                } else {
                    *failed = result.is_err();
                    Some(result)
                };
                async move { item }
            })
            .boxed()
    }

    /// Run both phases for one record and merge the results.
    pub async fn process_record(&self, record: &ArticleRecord) -> Result<OutputRow> {
        let classification = self.classify(record).await?;
        let pico = self.extract_pico(record).await?;
        Ok(OutputRow::new(record, classification, pico))
    }

    /// Classification phase: sport and grounded technologies.
    pub async fn classify(&self, record: &ArticleRecord) -> Result<ClassificationResult> {
        let prompt =
            format_classification_prompt(self.config.reply_format, record, &self.vocabularies);
        let (interpreter, _) = interpreters(self.config.reply_format);
        let reply = self.ask(record, &prompt, interpreter).await?;

        let sport = validate_sport(
            reply.get_str("sport").unwrap_or(NONE),
            &self.vocabularies.sports,
        );
        let technologies = filter_grounded(
            normalize_candidates(reply.get("technology")),
            &record.grounding_text(),
        );

        debug!(
            identifier = %record.identifier,
            sport = %sport,
            technologies = ?technologies,
            "Classified record"
        );
        Ok(ClassificationResult { sport, technologies })
    }

    /// PICO phase: population and outcomes, taken as the model gave them.
    pub async fn extract_pico(&self, record: &ArticleRecord) -> Result<PicoResult> {
        let prompt = format_pico_prompt(self.config.reply_format, record, &self.vocabularies);
        let (_, interpreter) = interpreters(self.config.reply_format);
        let reply = self.ask(record, &prompt, interpreter).await?;

        let population = population_label(reply.get("population"));
        let mut outcomes = normalize_candidates(reply.get("outcome"));
        if outcomes.is_empty() {
            outcomes.push(NONE.to_string());
        }

        Ok(PicoResult {
            population,
            outcomes,
        })
    }

    async fn ask(
        &self,
        record: &ArticleRecord,
        prompt: &str,
        interpreter: &dyn ReplyInterpreter,
    ) -> Result<ExtractedReply> {
        let raw = self.model.complete(prompt).await?;
        let reply = interpreter.interpret(&raw);

        if !reply.is_present() {
            warn!(
                identifier = %record.identifier,
                interpreter = interpreter.name(),
                reply = %raw,
                "No structured answer in model reply"
            );
        }
        Ok(reply)
    }

    fn log_start(&self, records: usize) {
        let (classification_hash, pico_hash) = prompt_hashes(self.config.reply_format);
        info!(
            records,
            concurrency = self.config.concurrency,
            reply_format = ?self.config.reply_format,
            classification_prompt = %classification_hash,
            pico_prompt = %pico_hash,
            "Starting classification run"
        );
    }
}

/// (classification, PICO) interpreters for a reply format.
fn interpreters(
    format: ReplyFormat,
) -> (&'static dyn ReplyInterpreter, &'static dyn ReplyInterpreter) {
    match format {
        ReplyFormat::Json => (&JsonObjectInterpreter, &JsonObjectInterpreter),
        ReplyFormat::Legacy => (&MarkdownTableInterpreter, &LabelledLineInterpreter),
    }
}

/// A string is trimmed, a list of strings is joined, anything else is none.
fn population_label(value: Option<&Value>) -> String {
    let label = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    };

    if label.is_empty() {
        NONE.to_string()
    } else {
        label
    }
}
