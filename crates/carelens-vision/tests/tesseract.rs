use std::io::Write;

use carelens_core::capability::TextExtractor;
use carelens_core::error::ExtractionError;
use carelens_vision::TesseractExtractor;

#[tokio::test]
async fn missing_image_is_corrupt_input() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = TesseractExtractor::new("tesseract", "eng");

    let err = extractor
        .extract_text(&dir.path().join("absent.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::CorruptInput(_)));
}

#[tokio::test]
async fn missing_binary_is_backend_failure() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"png bytes").unwrap();

    let extractor = TesseractExtractor::new("/nonexistent/bin/tesseract", "eng");
    let err = extractor.extract_text(file.path()).await.unwrap_err();
    assert!(matches!(err, ExtractionError::Backend(_)));
}
