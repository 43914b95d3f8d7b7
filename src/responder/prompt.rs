// Payload assembly for generation requests
// Author: kelexine (https://github.com/kelexine)

use crate::cache::ModelBinding;

/// Joins the document and the conversation when no cache holds the document.
pub const DOCUMENT_SEPARATOR: &str = "\n";

/// The prompt text for one generation call.
///
/// A cached binding already holds the document, so only the conversation is
/// sent; an uncached binding resends the document in front of it.
pub fn build_payload(binding: &ModelBinding, conversation_text: &str, document_text: &str) -> String {
    match binding {
        ModelBinding::Cached(_) => conversation_text.to_string(),
        ModelBinding::Uncached { .. } => {
            let mut payload =
                String::with_capacity(document_text.len() + DOCUMENT_SEPARATOR.len() + conversation_text.len());
            payload.push_str(document_text);
            payload.push_str(DOCUMENT_SEPARATOR);
            payload.push_str(conversation_text);
            payload
        }
    }
}
