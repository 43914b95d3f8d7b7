//! Response streaming.
//!
//! Assembles the outgoing payload for a binding, turns the response stream into
//! text fragments and folds them into the final answer while re-rendering the
//! accumulated buffer after every fragment.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod prompt;
mod render;

pub use prompt::{build_payload, DOCUMENT_SEPARATOR};
pub use render::{frame, BufferRenderer, Renderer, TerminalRenderer, CURSOR};

use crate::error::Result;
use crate::gemini::ResponseStream;
use crate::models::gemini::GenerateContentResponse;
use futures::stream::{Stream, StreamExt};
use tracing::debug;

/// Text fragments of a response stream. Chunks without text contribute `""`.
pub fn fragments(stream: ResponseStream) -> impl Stream<Item = Result<String>> + Send {
    stream.map(|chunk| {
        chunk.map(|response| {
            trace_chunk(&response);
            response.text().unwrap_or_default()
        })
    })
}

fn trace_chunk(response: &GenerateContentResponse) {
    if let Some(reason) = response
        .candidates
        .first()
        .and_then(|c| c.finish_reason.as_deref())
    {
        debug!("Generation finished: {}", reason);
    }
    if let Some(usage) = &response.usage_metadata {
        debug!(
            "Token usage: prompt={:?} candidates={:?} cached={:?} total={:?}",
            usage.prompt_token_count,
            usage.candidates_token_count,
            usage.cached_content_token_count,
            usage.total_token_count
        );
    }
}

/// Accumulate `fragments`, rendering the buffer with the cursor after every
/// fragment and once more without it when the stream ends.
///
/// A failing fragment ends the fold with that error; the partial buffer is
/// dropped and no final frame is rendered.
pub async fn drain<S, R>(fragments: S, renderer: &mut R) -> Result<String>
where
    S: Stream<Item = Result<String>>,
    R: Renderer + ?Sized,
{
    futures::pin_mut!(fragments);

    let mut buffer = String::new();
    let mut count = 0usize;
    while let Some(fragment) = fragments.next().await {
        buffer.push_str(&fragment?);
        count += 1;
        renderer.render(&frame(&buffer, true))?;
    }
    renderer.render(&frame(&buffer, false))?;

    debug!("Stream drained: {} fragments, {} chars", count, buffer.len());
    Ok(buffer)
}
