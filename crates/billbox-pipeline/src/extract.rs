//! Extraction collaborator interface
//!
//! The pipeline decrypts into a guarded scratch file and hands the
//! extractor its path; extractors that shell out to OCR/PDF tooling get a
//! real file to point at. Any failure is recoverable: plaintext is purged
//! and the failure surfaced, never a crash. The crate ships a strict UTF-8
//! extractor for plain-text documents.

use std::path::Path;

use crate::error::ExtractionFailure;

pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractionFailure>;
}

/// Reference extractor: the document is already text.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8Extractor;

impl TextExtractor for Utf8Extractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionFailure> {
        let bytes = std::fs::read(path)
            .map_err(|e| ExtractionFailure(format!("reading {}: {e}", path.display())))?;
        String::from_utf8(bytes)
            .map_err(|e| ExtractionFailure(format!("document is not valid UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_utf8_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("doc.plain");
        std::fs::write(&path, "Total: $42.00").unwrap();

        let text = Utf8Extractor.extract(&path).unwrap();
        assert_eq!(text, "Total: $42.00");
    }

    #[test]
    fn test_rejects_binary_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("doc.bin");
        std::fs::write(&path, [0xFF, 0xFE, 0x00]).unwrap();

        assert!(Utf8Extractor.extract(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_extraction_failure() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Utf8Extractor.extract(&tmp.path().join("gone.plain")).is_err());
    }
}
