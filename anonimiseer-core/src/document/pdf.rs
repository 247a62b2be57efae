// anonimiseer-core/src/document/pdf.rs
//! PDF text extraction and line-oriented reconstruction, both built on
//! `lopdf`.
//!
//! License: MIT OR APACHE 2.0

use std::fs;
use std::path::Path;

use log::{debug, warn};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::errors::AnonError;

use super::TextExtractor;

// US-Letter page, Helvetica 11pt. The cursor starts near the top margin and
// advances a fixed line height; crossing the bottom margin starts a new page.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN_LEFT: i64 = 50;
const FIRST_BASELINE: i64 = 750;
const BOTTOM_MARGIN: i64 = 50;
const LINE_HEIGHT: i64 = 12;
const FONT_SIZE: i64 = 11;

/// Extracts linear text per page from a PDF.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<String>, AnonError> {
        let doc = Document::load(path).map_err(|e| AnonError::Extraction {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut pages = Vec::new();
        for (number, _) in doc.get_pages() {
            match doc.extract_text(&[number]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    // Image-only or malformed page: report it as empty so the
                    // pipeline can decide whether to fall back to OCR.
                    warn!("No extractable text on page {}: {}", number, e);
                    pages.push(String::new());
                }
            }
        }
        debug!("Extracted {} page(s) from {}", pages.len(), path.display());
        Ok(pages)
    }
}

/// Encodes a line for a WinAnsi-encoded text-showing operator. Characters
/// without a WinAnsi code point become '?'.
fn encode_win_ansi(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '\u{20ac}' => 0x80, // €
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

/// Renders `text` line-by-line into a fresh paginated PDF at `output`.
///
/// Empty lines advance nothing; a document without any renderable line still
/// produces a single blank page so the output is a valid PDF. On a write
/// failure the partially written file is removed.
pub fn render_pdf(text: &str, output: &Path) -> Result<(), AnonError> {
    let reconstruction_err = |reason: String| AnonError::Reconstruction {
        path: output.to_path_buf(),
        reason,
    };

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut page_ops: Vec<Vec<Operation>> = Vec::new();
    let mut ops: Vec<Operation> = Vec::new();
    let mut y = FIRST_BASELINE;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]));
        ops.push(Operation::new("Td", vec![MARGIN_LEFT.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
        y -= LINE_HEIGHT;
        if y < BOTTOM_MARGIN {
            page_ops.push(std::mem::take(&mut ops));
            y = FIRST_BASELINE;
        }
    }
    // A break on the very last line leaves `ops` empty; pushing it anyway
    // would emit a trailing blank page.
    if !ops.is_empty() || page_ops.is_empty() {
        page_ops.push(ops);
    }

    let mut kids: Vec<Object> = Vec::new();
    for operations in page_ops {
        let content = Content { operations };
        let encoded = content.encode().map_err(|e| reconstruction_err(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    debug!("Rendering {} page(s) to {}", page_count, output.display());
    if let Err(e) = doc.save(output) {
        // Do not leave a truncated document behind.
        let _ = fs::remove_file(output);
        return Err(reconstruction_err(e.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_then_extract_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roundtrip.pdf");
        render_pdf("Eerste regel\nTweede regel", &path).unwrap();

        let pages = PdfTextExtractor.extract(&path).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("Eerste regel"));
        assert!(pages[0].contains("Tweede regel"));
    }

    #[test]
    fn test_long_text_paginates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paged.pdf");
        let lines: Vec<String> = (0..120).map(|i| format!("Regel nummer {}", i)).collect();
        render_pdf(&lines.join("\n"), &path).unwrap();

        let doc = Document::load(&path).unwrap();
        // 59 usable lines per page at the configured margins
        assert!(doc.get_pages().len() >= 2);
    }

    #[test]
    fn test_exact_page_boundary_adds_no_blank_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exact.pdf");
        // 59 lines fill a page exactly at the configured margins
        let full_page: Vec<String> = (0..59).map(|i| format!("Regel {}", i)).collect();
        render_pdf(&full_page.join("\n"), &path).unwrap();
        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let path = dir.path().join("overflow.pdf");
        let overflow: Vec<String> = (0..60).map(|i| format!("Regel {}", i)).collect();
        render_pdf(&overflow.join("\n"), &path).unwrap();
        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_accented_text_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accenten.pdf");
        render_pdf("René Müller, Curaçao", &path).unwrap();

        let pages = PdfTextExtractor.extract(&path).unwrap();
        assert!(pages[0].contains("René Müller, Curaçao"));
    }

    #[test]
    fn test_unencodable_char_degrades_to_question_mark() {
        assert_eq!(encode_win_ansi("prijs: €10"), b"prijs: \x8010");
        assert_eq!(encode_win_ansi("漢字"), b"??");
    }

    #[test]
    fn test_empty_text_renders_single_blank_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.pdf");
        render_pdf("", &path).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_render_to_unwritable_path_fails_clean() {
        let err = render_pdf("tekst", Path::new("/nonexistent-dir/out.pdf")).unwrap_err();
        assert!(matches!(err, AnonError::Reconstruction { .. }));
    }
}
