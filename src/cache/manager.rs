// Cache manager - decides between a cached and an uncached model per turn
// Author: kelexine (https://github.com/kelexine)

use crate::cache::models::{CacheConfig, CacheHandle, CacheStats, ModelBinding};
use crate::conversation::SystemPrompt;
use crate::error::Result;
use crate::gemini::cache_models::format_ttl;
use crate::gemini::{qualified_model, CachedContent, CreateCachedContentRequest, GenerativeService};
use crate::models::gemini::{Content, SystemInstruction};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Cache manager for Gemini context caching.
///
/// Each call to [`CacheManager::acquire`] attempts a fresh cache; nothing is
/// reused across turns and created caches are left to expire on the server.
pub struct CacheManager {
    config: CacheConfig,
    stats: Arc<RwLock<CacheStats>>,
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            stats: Arc::new(RwLock::new(CacheStats::default())),
        }
    }

    /// Estimate token count (rough approximation: 1 token ≈ 4 characters)
    fn estimate_token_count(document_text: &str, system_instruction: &SystemPrompt) -> usize {
        (document_text.len() + system_instruction.as_str().len()) / 4
    }

    /// Bind a model for this turn, caching `document_text` when the service allows it.
    ///
    /// Only `CacheIneligible` is recovered (as an uncached binding); any other
    /// failure is returned.
    pub async fn acquire<S: GenerativeService + ?Sized>(
        &self,
        service: &S,
        document_text: &str,
        system_instruction: &SystemPrompt,
        model: &str,
        ttl: Duration,
    ) -> Result<ModelBinding> {
        let model = qualified_model(model);

        if !self.config.enabled {
            debug!("Caching disabled");
            self.stats.write().await.skipped += 1;
            return Ok(uncached(model, system_instruction));
        }

        let estimated_tokens = Self::estimate_token_count(document_text, system_instruction);
        if estimated_tokens < self.config.min_tokens_for_cache {
            debug!(
                "Token count {} below minimum {}",
                estimated_tokens, self.config.min_tokens_for_cache
            );
            self.stats.write().await.skipped += 1;
            return Ok(uncached(model, system_instruction));
        }

        let request = CreateCachedContentRequest {
            model: model.clone(),
            display_name: Some(self.config.display_name.clone()),
            system_instruction: SystemInstruction::from_text(system_instruction.as_str()),
            contents: vec![Content::user_text(document_text)],
            ttl: format_ttl(ttl),
        };

        let outcome = service.create_cached_content(request).await;
        let binding = resolve_binding(outcome, &model, system_instruction)?;

        let mut stats = self.stats.write().await;
        match &binding {
            ModelBinding::Cached(handle) => {
                stats.creates += 1;
                info!(
                    "Created cache {} (expires {})",
                    handle.name,
                    handle
                        .expire_time
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "unknown".to_string())
                );
            }
            ModelBinding::Uncached { .. } => {
                stats.fallbacks += 1;
                info!("Content not eligible for caching, using uncached model {}", model);
            }
        }

        Ok(binding)
    }

    /// Get cache statistics
    pub async fn get_stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }
}

/// Turn the outcome of a cache creation into a binding.
///
/// `CacheIneligible` becomes an uncached binding on `model` carrying
/// `system_instruction`; any other error is passed through.
pub fn resolve_binding(
    outcome: Result<CachedContent>,
    model: &str,
    system_instruction: &SystemPrompt,
) -> Result<ModelBinding> {
    match outcome {
        Ok(cache) => Ok(ModelBinding::Cached(CacheHandle::from_response(cache, model))),
        Err(e) if e.is_cache_ineligible() => {
            debug!("Cache creation refused: {}", e);
            Ok(uncached(model.to_string(), system_instruction))
        }
        Err(e) => Err(e),
    }
}

fn uncached(model: String, system_instruction: &SystemPrompt) -> ModelBinding {
    ModelBinding::Uncached {
        model,
        system_instruction: system_instruction.clone(),
    }
}
