//! Language model trait - the boundary to the model-serving collaborator.
//!
//! The pipeline needs exactly one capability from a model: turn a rendered
//! prompt into the model's raw text reply. Everything about interpreting
//! that reply lives in the pipeline, not in the model client.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// A model that completes prompts.
///
/// Implementations wrap specific providers (OpenAI-compatible endpoints,
/// local servers, test doubles). A failed call is fatal to the batch that
/// issued it; implementations must not swallow transport errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send `prompt` and return the full text reply.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for &T {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for Box<T> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;

    #[tokio::test]
    async fn test_shared_model_delegates() {
        let mut mock = MockLanguageModel::new();
        mock.expect_complete()
            .times(2)
            .returning(|prompt| Ok(format!("echo: {prompt}")));

        let shared: Arc<dyn LanguageModel> = Arc::new(mock);
        assert_eq!(shared.complete("a").await.unwrap(), "echo: a");

        let by_ref = &shared;
        assert_eq!(by_ref.complete("b").await.unwrap(), "echo: b");
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        let mut mock = MockLanguageModel::new();
        mock.expect_complete()
            .returning(|_| Err(ExtractionError::model("connection reset")));

        let boxed: Box<dyn LanguageModel> = Box::new(mock);
        let result = boxed.complete("prompt").await;
        assert!(matches!(result, Err(ExtractionError::Model(_))));
    }
}
