//! The text-generation collaborator boundary.
//!
//! The [`Reviser`](crate::revise::Reviser) only needs one operation from the
//! outside world: send `{system_prompt, human_query}` and get text back.
//! [`Generator`] captures that. [`OpenRouterGenerator`] implements it over the
//! OpenRouter chat completions API; [`FnGenerator`] wraps a closure, which is
//! handy for tests and for plugging in other providers.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::error::GenerationError;
use crate::{ChatRequest, Message, OpenRouterClient};

/// Boxed future returned by [`Generator::generate`].
pub type GenerationFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;

/// A hosted text-generation call.
///
/// Implementations must report payload-too-large failures as
/// [`GenerationError::SizeRejected`] so the escalation ladder can react.
pub trait Generator: Send + Sync {
    /// Generate a response.
    ///
    /// Uses a boxed future so that the trait is dyn-compatible (object-safe).
    fn generate<'a>(
        &'a self,
        system_prompt: &'a str,
        human_query: &'a str,
    ) -> GenerationFuture<'a>;
}

/// [`Generator`] backed by an [`OpenRouterClient`].
pub struct OpenRouterGenerator {
    client: OpenRouterClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenRouterGenerator {
    /// Create a generator for `model` with deterministic sampling.
    pub fn new(client: OpenRouterClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens: 4096,
            temperature: 0.0,
        }
    }

    /// Set the per-response token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_request(&self, system_prompt: &str, human_query: &str) -> ChatRequest {
        ChatRequest {
            model: Some(self.model.clone()),
            messages: vec![Message::system(system_prompt), Message::user(human_query)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

impl Generator for OpenRouterGenerator {
    fn generate<'a>(
        &'a self,
        system_prompt: &'a str,
        human_query: &'a str,
    ) -> GenerationFuture<'a> {
        Box::pin(async move {
            let body = self.build_request(system_prompt, human_query);
            let completion = self
                .client
                .chat(&body)
                .await
                .map_err(GenerationError::from_message)?;
            debug!(
                "Generation finished: reason={}",
                completion.finish_reason.as_deref().unwrap_or("unknown")
            );
            completion
                .content
                .ok_or_else(|| GenerationError::Failed("empty LLM response".to_string()))
        })
    }
}

/// Closure signature wrapped by [`FnGenerator`].
type BoxedGenerateFn = Box<dyn Fn(String, String) -> GenerationFuture<'static> + Send + Sync>;

/// [`Generator`] built from an async closure.
///
/// ```ignore
/// let echo = FnGenerator::new(|_system, query| async move { Ok(query) });
/// ```
pub struct FnGenerator {
    func: BoxedGenerateFn,
}

impl FnGenerator {
    pub fn new<F, Fut>(func: F) -> Self
    where
        F: Fn(String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, GenerationError>> + Send + 'static,
    {
        let erased = move |system: String, query: String| -> GenerationFuture<'static> {
            Box::pin(func(system, query))
        };
        Self {
            func: Box::new(erased),
        }
    }
}

impl Generator for FnGenerator {
    fn generate<'a>(
        &'a self,
        system_prompt: &'a str,
        human_query: &'a str,
    ) -> GenerationFuture<'a> {
        (self.func)(system_prompt.to_string(), human_query.to_string())
    }
}
