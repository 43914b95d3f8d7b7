// Document loader tests
// Author: kelexine (https://github.com/kelexine)

use gemdoc::document::{DocumentLoader, LopdfExtractor, PdfExtractor, Upload};
use gemdoc::error::{GemdocError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build an in-memory PDF with one line of text per page.
fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Counts calls so tests can see which path a load took.
#[derive(Default)]
struct CountingExtractor {
    calls: AtomicUsize,
}

impl PdfExtractor for CountingExtractor {
    fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["pdf text".to_string()])
    }
}

#[test]
fn test_three_page_pdf_joins_pages() {
    let bytes = pdf_with_pages(&["A", "B", "C"]);
    let text = DocumentLoader::new().load("paper.pdf", &bytes).unwrap();
    assert_eq!(text, "A\nB\nC");
}

#[test]
fn test_lopdf_extracts_pages_in_order() {
    let bytes = pdf_with_pages(&["first", "second"]);
    let pages = LopdfExtractor.extract_pages(&bytes).unwrap();
    assert_eq!(pages, vec!["first", "second"]);
}

#[test]
fn test_text_uploads_never_reach_pdf_extractor() {
    let loader = DocumentLoader::with_extractor(CountingExtractor::default());

    for name in ["notes.md", "paper.mmd", "NOTES.MD", "plain.txt"] {
        assert_eq!(loader.load(name, b"text body").unwrap(), "text body");
    }

    assert_eq!(loader.extractor().calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_pdf_uploads_never_take_text_path() {
    let loader = DocumentLoader::with_extractor(CountingExtractor::default());

    // Valid UTF-8 that would decode fine as text still goes to the extractor
    assert_eq!(loader.load("paper.pdf", b"Hello world").unwrap(), "pdf text");
    assert_eq!(loader.load("scan", b"Hello world").unwrap(), "pdf text");
    assert_eq!(loader.extractor().calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_corrupt_pdf_is_parse_error() {
    let mut bytes = pdf_with_pages(&["A"]);
    bytes.truncate(20);
    let result = DocumentLoader::new().load("paper.pdf", &bytes);
    assert!(matches!(result, Err(GemdocError::DocumentParse(_))));
}

#[test]
fn test_invalid_utf8_markdown_is_encoding_error() {
    let result = DocumentLoader::new().load("notes.md", &[0xc3, 0x28]);
    assert!(matches!(result, Err(GemdocError::Encoding(_))));
}

#[tokio::test]
async fn test_upload_from_path_keeps_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.md");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "Hello world").unwrap();

    let upload = Upload::from_path(&path).await.unwrap();
    assert_eq!(upload.file_name, "notes.md");
    assert_eq!(DocumentLoader::new().load_upload(&upload).unwrap(), "Hello world");
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Upload::from_path(&dir.path().join("absent.pdf")).await;
    assert!(matches!(result, Err(GemdocError::Io(_))));
}
