// Gemini API client authenticated with an API key
// Author: kelexine (https://github.com/kelexine)

use super::cache_models::{CachedContent, CreateCachedContentRequest};
use super::{qualified_model, ApiKey, GenerativeService, ResponseStream};
use crate::config::GeminiConfig;
use crate::error::{GemdocError, Result};
use crate::models::gemini::GenerateContentRequest;
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error};

/// Client for the public Gemini (Generative Language) API.
///
/// Every request carries the user-supplied API key in the `x-goog-api-key`
/// header. Supports:
/// - Context cache creation (`cachedContents`)
/// - Streaming content generation (`streamGenerateContent`)
///
/// Nothing is retried; failures are returned to the caller as-is.
pub struct GeminiClient {
    http_client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, api_key: ApiKey) -> Result<Self> {
        if api_key.is_empty() {
            return Err(GemdocError::InvalidRequest(
                "A Gemini API key is required".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| GemdocError::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Get the API base_url
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1beta/{}", self.base_url, path)
    }

    /// Extract error message from API response JSON
    pub(crate) fn extract_error_message(response_text: &str) -> Option<String> {
        Self::parse_error(response_text).and_then(|e| e.message.or(e.status))
    }

    fn parse_error(response_text: &str) -> Option<ErrorDetail> {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        serde_json::from_str::<ErrorResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
    }

    /// Map a failed cache creation to an error. A 400 (`INVALID_ARGUMENT`) means
    /// the content or model cannot be cached; everything else is a service failure.
    fn classify_cache_error(status: StatusCode, body: &str) -> GemdocError {
        let detail = Self::parse_error(body);
        let invalid_argument = status == StatusCode::BAD_REQUEST
            || detail
                .as_ref()
                .and_then(|d| d.status.as_deref())
                .is_some_and(|s| s == "INVALID_ARGUMENT");
        let message = sanitize(&detail.and_then(|d| d.message).unwrap_or_else(|| body.to_string()));

        if invalid_argument {
            GemdocError::CacheIneligible(message)
        } else {
            GemdocError::RemoteService(format!("HTTP {}: {}", status, message))
        }
    }
}

#[derive(serde::Deserialize)]
struct ErrorDetail {
    message: Option<String>,
    status: Option<String>,
}

#[async_trait]
impl GenerativeService for GeminiClient {
    /// Create a cached content entry via Gemini API.
    ///
    /// Returns the created resource (e.g. `cachedContents/abc123`) with its expiry.
    async fn create_cached_content(
        &self,
        request: CreateCachedContentRequest,
    ) -> Result<CachedContent> {
        let url = self.endpoint("cachedContents");
        debug!("Creating cache for model: {} (ttl {})", request.model, request.ttl);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| GemdocError::RemoteService(format!("HTTP error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            debug!("Cache creation failed: HTTP {} - {}", status, sanitize(&error_text));
            return Err(Self::classify_cache_error(status, &error_text));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| GemdocError::RemoteService(format!("Failed to read response body: {}", e)))?;

        let cache: CachedContent = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse cache response: {}", e);
            GemdocError::RemoteService(format!("Response parsing error: {}", e))
        })?;

        debug!(
            "Cache created: {} ({} tokens)",
            cache.name,
            cache
                .usage_metadata
                .as_ref()
                .and_then(|u| u.total_token_count)
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string())
        );
        Ok(cache)
    }

    /// Call Gemini `streamGenerateContent` API for SSE streaming.
    async fn stream_generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<ResponseStream> {
        let url = self.endpoint(&format!(
            "{}:streamGenerateContent?alt=sse",
            qualified_model(model)
        ));

        debug!("Calling streamGenerateContent API for model: {}", model);

        let request_body = serde_json::to_string(&request)?;

        super::streaming::stream_generate_content(&self.http_client, url, request_body, &self.api_key)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_is_cache_ineligible() {
        let body = r#"{"error":{"code":400,"message":"Cached content is too small. total_token_count=12, min_total_token_count=32768","status":"INVALID_ARGUMENT"}}"#;
        let err = GeminiClient::classify_cache_error(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, GemdocError::CacheIneligible(ref m) if m.contains("too small")));
    }

    #[test]
    fn test_other_statuses_are_remote_errors() {
        let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
        let err = GeminiClient::classify_cache_error(StatusCode::FORBIDDEN, body);
        assert!(matches!(err, GemdocError::RemoteService(ref m) if m.contains("API key not valid")));

        let err = GeminiClient::classify_cache_error(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert!(matches!(err, GemdocError::RemoteService(ref m) if m.contains("oops")));
    }

    #[test]
    fn test_error_messages_never_carry_api_keys() {
        let body = r#"{"error":{"code":403,"message":"Key AIzaSyExample-123 is blocked","status":"PERMISSION_DENIED"}}"#;
        let err = GeminiClient::classify_cache_error(StatusCode::FORBIDDEN, body);
        assert!(
            matches!(err, GemdocError::RemoteService(ref m) if m == "HTTP 403 Forbidden: Key [REDACTED_API_KEY] is blocked")
        );

        let err = GeminiClient::classify_cache_error(StatusCode::BAD_GATEWAY, "upstream saw AIzaRaw");
        assert!(matches!(err, GemdocError::RemoteService(ref m) if !m.contains("AIza")));
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let result = GeminiClient::new(&GeminiConfig::default(), ApiKey::new(""));
        assert!(matches!(result, Err(GemdocError::InvalidRequest(_))));
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            GeminiClient::extract_error_message(r#"{"error":{"status":"UNAVAILABLE"}}"#).as_deref(),
            Some("UNAVAILABLE")
        );
        assert!(GeminiClient::extract_error_message("not json").is_none());
    }
}
