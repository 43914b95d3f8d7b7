// Turn orchestration
// Author: kelexine (https://github.com/kelexine)

use super::Session;
use crate::cache::{CacheConfig, CacheManager, CacheStats};
use crate::config::AppConfig;
use crate::conversation::Role;
use crate::document::{DocumentLoader, LopdfExtractor, PdfExtractor, Upload};
use crate::error::Result;
use crate::gemini::GenerativeService;
use crate::responder::{build_payload, drain, fragments, Renderer};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of a completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// The full answer, as appended to the conversation.
    pub answer: String,
    /// Whether the answer was generated against a server-side cache.
    pub cached: bool,
}

/// Runs question-answer turns against a generative service.
pub struct Assistant<S, P = LopdfExtractor> {
    service: S,
    cache: CacheManager,
    loader: DocumentLoader<P>,
    model: String,
    ttl: Duration,
}

impl<S: GenerativeService> Assistant<S, LopdfExtractor> {
    pub fn new(service: S, cache: CacheManager, model: impl Into<String>, ttl: Duration) -> Self {
        Self {
            service,
            cache,
            loader: DocumentLoader::new(),
            model: model.into(),
            ttl,
        }
    }

    pub fn from_config(service: S, config: &AppConfig) -> Self {
        Self::new(
            service,
            CacheManager::new(CacheConfig::from(&config.cache)),
            config.gemini.model.clone(),
            config.cache.ttl(),
        )
    }
}

impl<S: GenerativeService, P: PdfExtractor> Assistant<S, P> {
    /// Replace the document loader, e.g. to use another PDF extractor.
    pub fn with_loader<Q: PdfExtractor>(self, loader: DocumentLoader<Q>) -> Assistant<S, Q> {
        Assistant {
            service: self.service,
            cache: self.cache,
            loader,
            model: self.model,
            ttl: self.ttl,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.get_stats().await
    }

    /// Run one turn: the question is recorded first, so it stays in the log even
    /// if the turn fails later. The answer is recorded only when the stream
    /// completes; a failure mid-stream discards the partial text.
    pub async fn ask<R: Renderer + ?Sized>(
        &self,
        session: &mut Session,
        upload: &Upload,
        question: &str,
        renderer: &mut R,
    ) -> Result<TurnOutcome> {
        session.record(Role::User, question);

        let document_text = self.loader.load_upload(upload)?;
        debug!(
            "Loaded {} ({} chars) for turn {}",
            upload.file_name,
            document_text.len(),
            session.conversation().len()
        );

        let binding = self
            .cache
            .acquire(
                &self.service,
                &document_text,
                session.system_prompt(),
                &self.model,
                self.ttl,
            )
            .await?;

        let conversation_text = session.conversation().serialize()?;
        let payload = build_payload(&binding, &conversation_text, &document_text);
        let request = binding.request_for(payload);

        info!(
            "Streaming answer from {} ({})",
            binding.model(),
            if binding.is_cached() { "cached" } else { "uncached" }
        );

        let stream = self
            .service
            .stream_generate_content(binding.model(), request)
            .await?;

        let answer = match drain(fragments(stream), renderer).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Answer stream failed, discarding partial answer: {}", e);
                return Err(e);
            }
        };

        session.record(Role::Assistant, answer.clone());

        Ok(TurnOutcome {
            answer,
            cached: binding.is_cached(),
        })
    }
}
