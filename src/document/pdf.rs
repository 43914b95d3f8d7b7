// PDF text extraction
// Author: kelexine (https://github.com/kelexine)

use crate::error::{GemdocError, Result};
use lopdf::Document;
use tracing::debug;

/// Extracts the text of every page of a PDF, in page order.
pub trait PdfExtractor: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>>;
}

/// [`PdfExtractor`] backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let document = Document::load_mem(bytes)
            .map_err(|e| GemdocError::DocumentParse(format!("Failed to open PDF: {}", e)))?;

        // BTreeMap keyed by page number, so iteration is already in page order
        let pages = document.get_pages();
        debug!("Extracting text from {} PDF pages", pages.len());

        pages
            .keys()
            .map(|&page_number| {
                document
                    .extract_text(&[page_number])
                    .map(|text| text.trim_end_matches(['\n', '\r']).to_string())
                    .map_err(|e| {
                        GemdocError::DocumentParse(format!(
                            "Failed to extract page {}: {}",
                            page_number, e
                        ))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_a_parse_error() {
        let result = LopdfExtractor.extract_pages(b"definitely not a pdf");
        assert!(matches!(result, Err(GemdocError::DocumentParse(_))));
    }

    #[test]
    fn test_empty_input_is_a_parse_error() {
        let result = LopdfExtractor.extract_pages(&[]);
        assert!(matches!(result, Err(GemdocError::DocumentParse(_))));
    }
}
