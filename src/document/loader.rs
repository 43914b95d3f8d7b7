// Document loader - turns an upload into plain text
// Author: kelexine (https://github.com/kelexine)

use super::{DocumentKind, LopdfExtractor, PdfExtractor, Upload};
use crate::error::Result;
use tracing::debug;

/// Dispatches an upload to the text or PDF path by its extension.
///
/// The two paths are exclusive: a text upload never touches the PDF extractor.
pub struct DocumentLoader<P = LopdfExtractor> {
    pdf: P,
}

impl DocumentLoader<LopdfExtractor> {
    pub fn new() -> Self {
        Self { pdf: LopdfExtractor }
    }
}

impl Default for DocumentLoader<LopdfExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PdfExtractor> DocumentLoader<P> {
    pub fn with_extractor(pdf: P) -> Self {
        Self { pdf }
    }

    pub fn extractor(&self) -> &P {
        &self.pdf
    }

    /// Extract the text of `bytes`, classified by `file_name`.
    pub fn load(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        self.load_as(DocumentKind::from_file_name(file_name), file_name, bytes)
    }

    pub fn load_upload(&self, upload: &Upload) -> Result<String> {
        self.load_as(upload.kind(), &upload.file_name, &upload.bytes)
    }

    fn load_as(&self, kind: DocumentKind, file_name: &str, bytes: &[u8]) -> Result<String> {
        match kind {
            DocumentKind::Text => {
                debug!("Loading {} as text ({} bytes)", file_name, bytes.len());
                Ok(std::str::from_utf8(bytes)?.to_string())
            }
            DocumentKind::Pdf => {
                debug!("Loading {} as PDF ({} bytes)", file_name, bytes.len());
                Ok(self.pdf.extract_pages(bytes)?.join("\n"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GemdocError;

    struct FixedPages(Vec<&'static str>);

    impl PdfExtractor for FixedPages {
        fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    #[test]
    fn test_markdown_passthrough() {
        let loader = DocumentLoader::new();
        let text = loader.load("notes.md", "# Title\n\nHello world".as_bytes()).unwrap();
        assert_eq!(text, "# Title\n\nHello world");
    }

    #[test]
    fn test_invalid_utf8_is_encoding_error() {
        let loader = DocumentLoader::new();
        let result = loader.load("notes.md", &[0x48, 0xff, 0xfe]);
        assert!(matches!(result, Err(GemdocError::Encoding(_))));
    }

    #[test]
    fn test_pages_joined_with_newline() {
        let loader = DocumentLoader::with_extractor(FixedPages(vec!["A", "B", "C"]));
        assert_eq!(loader.load("paper.pdf", b"%PDF").unwrap(), "A\nB\nC");
    }

    #[test]
    fn test_single_page_has_no_separator() {
        let loader = DocumentLoader::with_extractor(FixedPages(vec!["only"]));
        assert_eq!(loader.load("paper.pdf", b"%PDF").unwrap(), "only");
    }
}
