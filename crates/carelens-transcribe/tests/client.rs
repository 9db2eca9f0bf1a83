use std::io::Write;

use aws_config::{BehaviorVersion, Region};
use carelens_core::capability::Transcriber;
use carelens_core::error::ExtractionError;
use carelens_transcribe::TranscribeClient;
use carelens_transcribe::client::extract_transcript_text;

fn offline_client() -> TranscribeClient {
    let config = aws_config::SdkConfig::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .build();
    TranscribeClient::new(&config, "unused-bucket")
}

#[test]
fn transcript_text_is_extracted() {
    let json = br#"{"jobName":"x","results":{"transcripts":[{"transcript":" I feel fine today. "}],"items":[]}}"#;
    assert_eq!(extract_transcript_text(json).unwrap(), "I feel fine today.");
}

#[test]
fn empty_transcripts_yield_empty_text() {
    let json = br#"{"results":{"transcripts":[]}}"#;
    assert_eq!(extract_transcript_text(json).unwrap(), "");
}

#[test]
fn malformed_document_is_a_parse_error() {
    assert!(extract_transcript_text(b"{\"results\": 3}").is_err());
}

#[tokio::test]
async fn unsupported_extension_fails_before_any_request() {
    let mut file = tempfile::Builder::new().suffix(".xyz").tempfile().unwrap();
    file.write_all(b"noise").unwrap();

    let err = offline_client().transcribe(file.path()).await.unwrap_err();
    assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn missing_file_is_corrupt_input() {
    let dir = tempfile::tempdir().unwrap();
    let err = offline_client()
        .transcribe(&dir.path().join("gone.mp3"))
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::CorruptInput(_)));
}

#[tokio::test]
async fn corrupt_wav_is_rejected_before_upload() {
    let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
    file.write_all(b"RIFF....WAVEjunk").unwrap();

    let err = offline_client().transcribe(file.path()).await.unwrap_err();
    assert!(matches!(err, ExtractionError::CorruptInput(_)));
}
