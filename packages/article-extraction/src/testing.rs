//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the extraction library
//! without making real model calls.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{ExtractionError, Result};
use crate::pipeline::prompts::PromptKind;
use crate::traits::model::LanguageModel;

/// A mock language model for testing.
///
/// Replies are scripted by prompt kind and a needle that must occur in the
/// rendered prompt (an article title works well). Prompts with no matching
/// script get the default reply, which is empty unless configured.
#[derive(Default)]
pub struct MockModel {
    /// Scripted replies, first match wins
    replies: Arc<RwLock<Vec<ScriptedReply>>>,

    /// Reply when nothing matches
    default_reply: String,

    /// Needles whose prompts fail with a model error
    failures: Arc<RwLock<Vec<String>>>,

    /// Artificial latency by needle
    delays: Arc<RwLock<Vec<(String, Duration)>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockModelCall>>>,

    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

struct ScriptedReply {
    kind: Option<PromptKind>,
    needle: String,
    reply: String,
}

/// Record of a call made to the mock model.
#[derive(Debug, Clone)]
pub struct MockModelCall {
    /// Phase of the prompt, if it carried a known header
    pub kind: Option<PromptKind>,
    pub prompt: String,
}

impl MockModel {
    /// Create a new mock model with default behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply used for prompts that match no script.
    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    /// Reply to any prompt containing `needle`.
    pub fn with_reply(self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.script(None, needle, reply)
    }

    /// Reply to classification prompts containing `needle`.
    pub fn with_classification_reply(
        self,
        needle: impl Into<String>,
        reply: impl Into<String>,
    ) -> Self {
        self.script(Some(PromptKind::Classification), needle, reply)
    }

    /// Reply to PICO prompts containing `needle`.
    pub fn with_pico_reply(self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.script(Some(PromptKind::Pico), needle, reply)
    }

    /// Fail every prompt containing `needle`.
    pub fn failing_on(self, needle: impl Into<String>) -> Self {
        self.failures.write().unwrap().push(needle.into());
        self
    }

    /// Delay replies to prompts containing `needle`.
    pub fn with_delay(self, needle: impl Into<String>, delay: Duration) -> Self {
        self.delays.write().unwrap().push((needle.into(), delay));
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockModelCall> {
        self.calls.read().unwrap().clone()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    /// Highest number of calls that were in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn script(
        self,
        kind: Option<PromptKind>,
        needle: impl Into<String>,
        reply: impl Into<String>,
    ) -> Self {
        self.replies.write().unwrap().push(ScriptedReply {
            kind,
            needle: needle.into(),
            reply: reply.into(),
        });
        self
    }

    fn reply_for(&self, kind: Option<PromptKind>, prompt: &str) -> String {
        self.replies
            .read()
            .unwrap()
            .iter()
            .find(|s| s.kind.is_none_or(|k| Some(k) == kind) && prompt.contains(&s.needle))
            .map(|s| s.reply.clone())
            .unwrap_or_else(|| self.default_reply.clone())
    }

    fn delay_for(&self, prompt: &str) -> Option<Duration> {
        self.delays
            .read()
            .unwrap()
            .iter()
            .find(|(needle, _)| prompt.contains(needle))
            .map(|(_, delay)| *delay)
    }

    fn fails_on(&self, prompt: &str) -> bool {
        self.failures
            .read()
            .unwrap()
            .iter()
            .any(|needle| prompt.contains(needle))
    }
}

/// Decrements the in-flight counter when a call ends or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let kind = PromptKind::of(prompt);
        self.calls.write().unwrap().push(MockModelCall {
            kind,
            prompt: prompt.to_string(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        match self.delay_for(prompt) {
            Some(delay) => tokio::time::sleep(delay).await,
            // Yield so concurrent callers can overlap
            None => tokio::task::yield_now().await,
        }

        if self.fails_on(prompt) {
            return Err(ExtractionError::model("mock model failure"));
        }

        Ok(self.reply_for(kind, prompt))
    }
}
