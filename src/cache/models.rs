//! Cache configuration, statistics and model binding types.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::CacheSettings;
use crate::conversation::SystemPrompt;
use crate::gemini::CachedContent;
use crate::models::gemini::{Content, GenerateContentRequest, SystemInstruction};
use chrono::{DateTime, Utc};

/// Configuration for the context caching system.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Whether caching is enabled.
    pub enabled: bool,
    /// Display name attached to created caches.
    pub display_name: String,
    /// Below this estimated token count no cache is requested.
    pub min_tokens_for_cache: usize,
}

impl Default for CacheConfig {
    /// Provides default values for cache configuration.
    ///
    /// - `enabled`: true
    /// - `display_name`: `paper`
    /// - `min_tokens_for_cache`: 0
    fn default() -> Self {
        Self {
            enabled: true,
            display_name: "paper".to_string(),
            min_tokens_for_cache: 0,
        }
    }
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            display_name: settings.display_name.clone(),
            min_tokens_for_cache: settings.min_tokens_for_cache,
        }
    }
}

/// Statistics for cache operations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of caches created on the server.
    pub creates: u64,
    /// Number of times the service refused to cache and an uncached model was used.
    pub fallbacks: u64,
    /// Number of turns that never asked for a cache (disabled or below threshold).
    pub skipped: u64,
}

/// A created server-side cache. The server reclaims it after its TTL; this
/// process never deletes it.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHandle {
    /// Resource name, e.g. `cachedContents/abc123`.
    pub name: String,
    /// Model the cache was created for.
    pub model: String,
    pub display_name: Option<String>,
    pub expire_time: Option<DateTime<Utc>>,
}

impl CacheHandle {
    /// Build a handle from the service response, defaulting the model to the
    /// one that was requested.
    pub fn from_response(cache: CachedContent, requested_model: &str) -> Self {
        Self {
            name: cache.name,
            model: cache.model.unwrap_or_else(|| requested_model.to_string()),
            display_name: cache.display_name,
            expire_time: cache.expire_time,
        }
    }
}

/// The model a generation call runs against.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelBinding {
    /// Document and system instruction live in a server-side cache.
    Cached(CacheHandle),
    /// No cache; the system instruction travels with every request.
    Uncached {
        model: String,
        system_instruction: SystemPrompt,
    },
}

impl ModelBinding {
    pub fn is_cached(&self) -> bool {
        matches!(self, ModelBinding::Cached(_))
    }

    pub fn model(&self) -> &str {
        match self {
            ModelBinding::Cached(handle) => &handle.model,
            ModelBinding::Uncached { model, .. } => model,
        }
    }

    /// Wrap a prompt payload into a generation request for this binding.
    pub fn request_for(&self, payload: String) -> GenerateContentRequest {
        let contents = vec![Content::user_text(payload)];
        match self {
            ModelBinding::Cached(handle) => GenerateContentRequest {
                contents,
                system_instruction: None,
                cached_content: Some(handle.name.clone()),
            },
            ModelBinding::Uncached {
                system_instruction, ..
            } => GenerateContentRequest {
                contents,
                system_instruction: SystemInstruction::from_text(system_instruction.as_str()),
                cached_content: None,
            },
        }
    }
}
