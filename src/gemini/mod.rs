// Gemini API client module
// Author: kelexine (https://github.com/kelexine)

pub mod cache_models;
mod client;
pub mod streaming;

pub use cache_models::{CachedContent, CreateCachedContentRequest};
pub use client::GeminiClient;

use crate::error::Result;
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use futures::stream::Stream;
use std::fmt;
use std::pin::Pin;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Stream of response chunks from `streamGenerateContent`.
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>;

/// The remote operations a turn depends on.
///
/// Implementations classify failures: a cache request the service refuses as
/// ineligible must surface as `GemdocError::CacheIneligible`, every other
/// failure as a different variant.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Register content as a server-side cache that expires after the request TTL.
    async fn create_cached_content(
        &self,
        request: CreateCachedContentRequest,
    ) -> Result<CachedContent>;

    /// Start a streaming generation against `model`.
    async fn stream_generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<ResponseStream>;
}

/// Gemini API key. Zeroized on drop and never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Fully qualified model resource name, e.g. `models/gemini-1.5-pro-001`.
pub fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}
