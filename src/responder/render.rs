// Progressive rendering of a streamed answer
// Author: kelexine (https://github.com/kelexine)

use crate::error::Result;
use std::io::Write;

/// Marker appended to the buffer while a response is still streaming.
pub const CURSOR: &str = "▌";

/// The visible text for `buffer`. The cursor is shown only while in progress.
pub fn frame(buffer: &str, in_progress: bool) -> String {
    if in_progress {
        format!("{}{}", buffer, CURSOR)
    } else {
        buffer.to_string()
    }
}

/// Something that can display the current frame of an answer.
///
/// Every call receives the whole frame, not a delta. Rendering the same frame
/// twice must leave the display unchanged.
pub trait Renderer {
    fn render(&mut self, frame: &str) -> Result<()>;
}

/// Keeps every frame in memory. The last one is what a redrawing surface shows.
#[derive(Debug, Default, Clone)]
pub struct BufferRenderer {
    frames: Vec<String>,
}

impl BufferRenderer {
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn last(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }
}

impl Renderer for BufferRenderer {
    fn render(&mut self, frame: &str) -> Result<()> {
        self.frames.push(frame.to_string());
        Ok(())
    }
}

/// Renders onto an append-only terminal.
///
/// A line terminal cannot redraw, so only the text beyond what is already
/// printed is written and the cursor marker is never printed.
pub struct TerminalRenderer<W: Write> {
    out: W,
    printed: String,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: String::new(),
        }
    }

    /// Text written so far.
    pub fn printed(&self) -> &str {
        &self.printed
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &str) -> Result<()> {
        let text = frame.strip_suffix(CURSOR).unwrap_or(frame);
        if let Some(delta) = text.strip_prefix(self.printed.as_str()) {
            if !delta.is_empty() {
                self.out.write_all(delta.as_bytes())?;
                self.out.flush()?;
                self.printed.push_str(delta);
            }
        }
        Ok(())
    }
}
