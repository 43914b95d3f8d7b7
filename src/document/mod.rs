// Document ingestion module
// Author: kelexine (https://github.com/kelexine)

mod loader;
mod pdf;

pub use loader::DocumentLoader;
pub use pdf::{LopdfExtractor, PdfExtractor};

use crate::error::Result;
use std::path::Path;

/// Extensions whose bytes are passed through as UTF-8 text.
const TEXT_EXTENSIONS: &[&str] = &["md", "mmd", "markdown", "txt"];

/// How an uploaded file is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Markdown or plain text, decoded verbatim.
    Text,
    /// Paged document, extracted page by page.
    Pdf,
}

impl DocumentKind {
    /// Classify by the text after the last `.`, case-insensitively.
    /// Everything that is not a known text extension is treated as PDF.
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if TEXT_EXTENSIONS.contains(&extension.as_str()) {
            DocumentKind::Text
        } else {
            DocumentKind::Pdf
        }
    }
}

/// An uploaded file: its name (for classification) and raw bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an upload from disk, keeping only the file name.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(Self { file_name, bytes })
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_file_name(&self.file_name)
    }
}
