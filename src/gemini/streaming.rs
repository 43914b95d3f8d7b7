// Gemini API streaming client
// Author: kelexine (https://github.com/kelexine)

use super::{ApiKey, ResponseStream};
use crate::error::{GemdocError, Result};
use crate::models::gemini::GenerateContentResponse;
use crate::utils::logging::sanitize;
use futures::stream::Stream;
use reqwest::Client;
use tracing::{debug, warn};

/// Parse Gemini SSE stream
pub async fn stream_generate_content(
    client: &Client,
    url: String,
    request_body: String,
    api_key: &ApiKey,
) -> Result<ResponseStream> {
    debug!("Starting Gemini SSE stream to: {}", url);

    let response = client
        .post(&url)
        .header("x-goog-api-key", api_key.expose())
        .header("Content-Type", "application/json")
        .header("Accept", "text/event-stream")
        .body(request_body)
        .send()
        .await
        .map_err(|e| GemdocError::RemoteService(format!("HTTP error: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        let message = super::client::GeminiClient::extract_error_message(&error_text)
            .unwrap_or(error_text);
        return Err(GemdocError::RemoteService(format!(
            "HTTP {}: {}",
            status,
            sanitize(&message)
        )));
    }

    let byte_stream = response.bytes_stream();

    Ok(Box::pin(parse_sse_stream(byte_stream)))
}

/// Parse SSE byte stream into GenerateContentResponse chunks
pub(crate) fn parse_sse_stream<S, E>(
    byte_stream: S,
) -> impl Stream<Item = Result<GenerateContentResponse>> + Send
where
    S: Stream<Item = std::result::Result<bytes::Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    use futures::StreamExt;

    async_stream::stream! {
        // Raw bytes so multi-byte characters split across chunks survive
        let mut buffer: Vec<u8> = Vec::new();
        let mut events = 0usize;
        let mut failed = false;

        futures::pin_mut!(byte_stream);

        'chunks: while let Some(chunk_result) = byte_stream.next().await {
            match chunk_result {
                Ok(chunk) => {
                    debug!("Received chunk: {} bytes", chunk.len());
                    // The API terminates lines with \r\n; JSON payloads never hold a raw \r
                    buffer.extend(chunk.iter().filter(|&&b| b != b'\r'));

                    while let Some(event_end) = find_event_end(&buffer) {
                        let event_bytes: Vec<u8> = buffer.drain(..event_end + 2).collect();
                        let event_data = String::from_utf8_lossy(&event_bytes[..event_end]);

                        match parse_sse_event(&event_data) {
                            Some(Ok(response)) => {
                                events += 1;
                                yield Ok(response);
                            }
                            Some(Err(e)) => {
                                failed = true;
                                yield Err(e);
                                break 'chunks;
                            }
                            None => debug!("Skipping SSE event without payload"),
                        }
                    }
                }
                Err(e) => {
                    let message = sanitize(&e.to_string());
                    warn!("Stream error after {} events: {}", events, message);
                    failed = true;
                    yield Err(GemdocError::StreamInterrupted(message));
                    break;
                }
            }
        }

        // This handles cases where the final event doesn't have a trailing blank line
        let remaining = String::from_utf8_lossy(&buffer).to_string();
        if !failed && !remaining.trim().is_empty() {
            debug!("Processing remaining buffer: {} chars", remaining.len());
            match parse_sse_event(&remaining) {
                Some(Ok(response)) => {
                    events += 1;
                    yield Ok(response);
                }
                Some(Err(e)) => yield Err(e),
                None => {}
            }
        }

        debug!("Gemini SSE stream ended after {} events", events);
    }
}

fn find_event_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

/// Parse a single SSE event.
///
/// Returns `None` for events without a payload (comments, pings, `[DONE]`).
/// A payload that is not a valid response, or that reports a failure, is an error.
fn parse_sse_event(event_data: &str) -> Option<Result<GenerateContentResponse>> {
    // SSE format: "event: <name>\ndata: <json>" or just "data: <json>"
    let data: String = event_data
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    let parsed: serde_json::Value = match serde_json::from_str(&data) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse SSE JSON: {}", e);
            debug!("Raw data: {}", sanitize(&data.chars().take(200).collect::<String>()));
            return Some(Err(GemdocError::StreamInterrupted(format!(
                "malformed stream event: {}",
                e
            ))));
        }
    };

    if let Some(error) = parsed.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error");
        return Some(Err(GemdocError::RemoteService(sanitize(message))));
    }

    match serde_json::from_value::<GenerateContentResponse>(parsed) {
        Ok(response) => Some(Ok(response)),
        Err(e) => {
            warn!("Failed to convert to GenerateContentResponse: {}", e);
            Some(Err(GemdocError::StreamInterrupted(format!(
                "unexpected stream event: {}",
                e
            ))))
        }
    }
}
