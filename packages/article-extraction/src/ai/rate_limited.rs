//! Rate-limited model wrapper.
//!
//! Wraps any LanguageModel with a request-rate limit using the governor crate.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::error::Result;
use crate::traits::model::LanguageModel;

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A model wrapper that enforces a request rate.
///
/// Calls wait for a permit before reaching the inner model. Nothing is
/// retried; a failing call still fails.
pub struct RateLimitedModel<M: LanguageModel> {
    inner: M,
    limiter: Arc<DefaultRateLimiter>,
}

impl<M: LanguageModel> RateLimitedModel<M> {
    /// Allow at most `requests_per_second` prompts per second.
    pub fn new(model: M, requests_per_second: NonZeroU32) -> Self {
        Self::with_quota(model, Quota::per_second(requests_per_second))
    }

    /// Sustained rate with a burst allowance.
    pub fn with_burst(model: M, requests_per_second: NonZeroU32, burst: NonZeroU32) -> Self {
        Self::with_quota(model, Quota::per_second(requests_per_second).allow_burst(burst))
    }

    /// Create with a custom quota.
    pub fn with_quota(model: M, quota: Quota) -> Self {
        Self {
            inner: model,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// The wrapped model.
    pub fn inner(&self) -> &M {
        &self.inner
    }
}

#[async_trait]
impl<M: LanguageModel> LanguageModel for RateLimitedModel<M> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.limiter.until_ready().await;
        self.inner.complete(prompt).await
    }
}

/// Extension trait for easy rate limiting.
pub trait LanguageModelExt: LanguageModel + Sized {
    /// Wrap this model with rate limiting.
    fn rate_limited(self, requests_per_second: NonZeroU32) -> RateLimitedModel<Self> {
        RateLimitedModel::new(self, requests_per_second)
    }
}

impl<M: LanguageModel + Sized> LanguageModelExt for M {}
