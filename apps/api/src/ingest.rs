//! Uploaded-document text extraction.
//!
//! JDs and CVs arrive as raw multipart bytes. TXT decodes lossily (bad
//! bytes become replacement characters rather than failing the upload);
//! PDFs are parsed from memory. Unreadable files yield `None` and a
//! warning — a bad CV skips one candidate, never the batch.

use std::path::Path;

use tracing::warn;

/// Extracts plain text from an uploaded file, keyed on its extension.
/// Unknown extensions are treated as text, matching what users actually
/// upload (`.text`, extensionless exports, and so on).
pub fn extract_document_text(filename: &str, bytes: &[u8]) -> Option<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => extract_pdf_text(filename, bytes),
        _ => Some(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn extract_pdf_text(filename: &str, bytes: &[u8]) -> Option<String> {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Ok(_) => {
            warn!("PDF '{filename}' contains no extractable text");
            None
        }
        Err(e) => {
            warn!("Failed to read PDF '{filename}': {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_decodes_utf8() {
        let text = extract_document_text("cv.txt", "Senior Rust engineer".as_bytes()).unwrap();
        assert_eq!(text, "Senior Rust engineer");
    }

    #[test]
    fn test_txt_decodes_invalid_bytes_lossily() {
        let bytes = [b'C', b'V', 0xff, 0xfe, b'!'];
        let text = extract_document_text("cv.txt", &bytes).unwrap();
        assert!(text.starts_with("CV"));
        assert!(text.ends_with('!'));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let bytes = b"plain text resume";
        assert!(extract_document_text("CV.TXT", bytes).is_some());
        // Garbage bytes under a .PDF extension go down the PDF path and fail.
        assert!(extract_document_text("CV.PDF", b"not a pdf").is_none());
    }

    #[test]
    fn test_unknown_extension_treated_as_text() {
        let text = extract_document_text("resume.text", b"some resume body").unwrap();
        assert_eq!(text, "some resume body");
    }

    #[test]
    fn test_corrupt_pdf_yields_none() {
        assert!(extract_document_text("cv.pdf", b"%PDF-garbage").is_none());
    }
}
