// Shared test doubles
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use async_trait::async_trait;
use gemdoc::error::{GemdocError, Result};
use gemdoc::gemini::{CachedContent, CreateCachedContentRequest, GenerativeService, ResponseStream};
use gemdoc::models::gemini::{Content, GenerateContentRequest, GenerateContentResponse};
use gemdoc::models::gemini::Part;
use std::sync::Mutex;

/// What the stub does when asked to create a cache.
#[derive(Debug, Clone)]
pub enum CacheBehavior {
    Succeed,
    Ineligible,
    Fail,
}

/// One streamed chunk: text, a chunk with no text, or a transport failure.
#[derive(Debug, Clone)]
pub enum Chunk {
    Text(&'static str),
    NoText,
    Interrupt,
}

/// In-memory [`GenerativeService`] that records every request it receives.
pub struct StubService {
    cache: CacheBehavior,
    chunks: Vec<Chunk>,
    pub cache_requests: Mutex<Vec<CreateCachedContentRequest>>,
    pub generate_requests: Mutex<Vec<(String, GenerateContentRequest)>>,
}

impl StubService {
    pub fn new(cache: CacheBehavior, chunks: Vec<Chunk>) -> Self {
        Self {
            cache,
            chunks,
            cache_requests: Mutex::new(Vec::new()),
            generate_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(cache: CacheBehavior, text: &'static str) -> Self {
        Self::new(cache, vec![Chunk::Text(text)])
    }

    pub fn last_generate(&self) -> (String, GenerateContentRequest) {
        self.generate_requests.lock().unwrap().last().cloned().unwrap()
    }

    pub fn cache_request_count(&self) -> usize {
        self.cache_requests.lock().unwrap().len()
    }
}

fn text_chunk(text: &str) -> GenerateContentResponse {
    serde_json::from_value(serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    }))
    .unwrap()
}

#[async_trait]
impl GenerativeService for StubService {
    async fn create_cached_content(
        &self,
        request: CreateCachedContentRequest,
    ) -> Result<CachedContent> {
        let model = request.model.clone();
        self.cache_requests.lock().unwrap().push(request);
        match self.cache {
            CacheBehavior::Succeed => Ok(serde_json::from_value(serde_json::json!({
                "name": "cachedContents/stub123",
                "model": model,
                "displayName": "paper",
                "expireTime": "2030-01-01T00:10:00Z"
            }))
            .unwrap()),
            CacheBehavior::Ineligible => Err(GemdocError::CacheIneligible(
                "Cached content is too small".to_string(),
            )),
            CacheBehavior::Fail => Err(GemdocError::RemoteService("HTTP 503: unavailable".to_string())),
        }
    }

    async fn stream_generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<ResponseStream> {
        self.generate_requests
            .lock()
            .unwrap()
            .push((model.to_string(), request));

        let items: Vec<Result<GenerateContentResponse>> = self
            .chunks
            .iter()
            .map(|chunk| match chunk {
                Chunk::Text(text) => Ok(text_chunk(text)),
                Chunk::NoText => Ok(GenerateContentResponse::default()),
                Chunk::Interrupt => Err(GemdocError::StreamInterrupted(
                    "connection reset".to_string(),
                )),
            })
            .collect();

        Ok(Box::pin(futures::stream::iter(items)))
    }
}

/// Text of every part of every content.
pub fn contents_text(contents: &[Content]) -> String {
    contents
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(Part::as_text)
        .collect()
}
