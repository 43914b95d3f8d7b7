// Gemini cached content models for cache creation API
// Author: kelexine (https://github.com/kelexine)

use crate::models::gemini::{Content, SystemInstruction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request to create a cached content entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCachedContentRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    pub contents: Vec<Content>,
    pub ttl: String, // e.g., "600s" for 10 minutes
}

impl CreateCachedContentRequest {
    /// Concatenated text of every content part (the document being cached).
    pub fn content_text(&self) -> String {
        self.contents
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.as_text())
            .collect()
    }
}

/// Response from cache creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedContent {
    pub name: String, // e.g., "cachedContents/abc123"
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expire_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_metadata: Option<CacheUsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheUsageMetadata {
    #[serde(default)]
    pub total_token_count: Option<u32>,
}

/// Protobuf duration string for a TTL, in whole seconds.
pub fn format_ttl(ttl: Duration) -> String {
    format!("{}s", ttl.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ttl() {
        assert_eq!(format_ttl(Duration::from_secs(600)), "600s");
        assert_eq!(format_ttl(Duration::from_millis(1500)), "1s");
    }

    #[test]
    fn test_request_serialization() {
        let request = CreateCachedContentRequest {
            model: "models/gemini-1.5-pro-001".to_string(),
            display_name: Some("paper".to_string()),
            system_instruction: SystemInstruction::from_text("Be brief"),
            contents: vec![Content::user_text("document body")],
            ttl: "600s".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["displayName"], "paper");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be brief");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["ttl"], "600s");
        assert_eq!(request.content_text(), "document body");
    }

    #[test]
    fn test_response_parses_timestamps() {
        let json = r#"{
            "name": "cachedContents/abc123",
            "model": "models/gemini-1.5-pro-001",
            "displayName": "paper",
            "createTime": "2024-06-10T12:00:00.123456Z",
            "expireTime": "2024-06-10T12:10:00.123456Z",
            "usageMetadata": {"totalTokenCount": 40000}
        }"#;
        let cache: CachedContent = serde_json::from_str(json).unwrap();

        assert_eq!(cache.name, "cachedContents/abc123");
        let lifetime = cache.expire_time.unwrap() - cache.create_time.unwrap();
        assert_eq!(lifetime.num_minutes(), 10);
        assert_eq!(cache.usage_metadata.unwrap().total_token_count, Some(40000));
    }
}
