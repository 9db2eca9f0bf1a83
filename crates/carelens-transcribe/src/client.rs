//! Speech-to-text through Amazon Transcribe.
//!
//! Transcribe only reads media from S3, so each file is staged under a
//! scratch prefix in the configured bucket, transcribed by a batch job that
//! writes its JSON result next to it, and every staged object is deleted once
//! the text is out. The deletes also run when the caller drops the future
//! part way, e.g. on a timeout.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_transcribe::types::{LanguageCode, Media, TranscriptionJobStatus};
use aws_smithy_types::byte_stream::ByteStream;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use carelens_core::capability::Transcriber;
use carelens_core::error::ExtractionError;

use crate::cleanup::CleanupGuard;
use crate::error::TranscribeError;
use crate::format::AudioFormat;
use crate::wav::validate_wav;

const STAGING_PREFIX: &str = "_carelens/transcribe";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct TranscribeClient {
    s3: aws_sdk_s3::Client,
    transcribe: aws_sdk_transcribe::Client,
    bucket: String,
    poll_interval: Duration,
}

impl TranscribeClient {
    pub fn new(config: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        Self {
            s3: aws_sdk_s3::Client::new(config),
            transcribe: aws_sdk_transcribe::Client::new(config),
            bucket: bucket.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Transcribe a local audio file of a known format.
    pub async fn transcribe_file(
        &self,
        path: &Path,
        format: AudioFormat,
    ) -> Result<String, TranscribeError> {
        if !tokio::fs::try_exists(path).await? {
            return Err(TranscribeError::MissingFile(path.display().to_string()));
        }
        if format == AudioFormat::Wav {
            let summary = validate_wav(path)?;
            info!(
                channels = summary.channels,
                sample_rate = summary.sample_rate,
                duration_secs = summary.duration_secs,
                "wav header validated"
            );
        }

        let bytes = tokio::fs::read(path).await?;
        let job_name = format!("carelens-{}", Uuid::new_v4());
        let audio_key = format!("{STAGING_PREFIX}/{job_name}.{format}");

        // Armed before the upload: a put cut short may still land.
        let staged_audio = CleanupGuard::new(
            "staged audio",
            delete_object(self.s3.clone(), self.bucket.clone(), audio_key.clone()),
        );
        let uploaded = self
            .s3
            .put_object()
            .bucket(&self.bucket)
            .key(&audio_key)
            .body(ByteStream::from(bytes))
            .send()
            .await;

        let result = match uploaded {
            Ok(_) => self.run_job(&job_name, &audio_key, format).await,
            Err(e) => Err(TranscribeError::Upload(e.into_service_error().to_string())),
        };
        staged_audio.run().await;

        result
    }

    async fn run_job(
        &self,
        job_name: &str,
        audio_key: &str,
        format: AudioFormat,
    ) -> Result<String, TranscribeError> {
        let media_uri = format!("s3://{}/{audio_key}", self.bucket);
        let output_key = format!("{STAGING_PREFIX}/{job_name}.json");

        info!(job_name, media_uri, "starting transcription job");

        self.transcribe
            .start_transcription_job()
            .transcription_job_name(job_name)
            .media(Media::builder().media_file_uri(&media_uri).build())
            .media_format(format.media_format())
            .language_code(LanguageCode::EnUs)
            .output_bucket_name(&self.bucket)
            .output_key(&output_key)
            .send()
            .await
            .map_err(|e| TranscribeError::Api(e.into_service_error().to_string()))?;

        let job_artifacts = CleanupGuard::new("transcription job", {
            let output = delete_object(self.s3.clone(), self.bucket.clone(), output_key.clone());
            let job = delete_job(self.transcribe.clone(), job_name.to_string());
            move || async move {
                output().await;
                job().await;
            }
        });

        let outcome = self.await_completion(job_name).await;
        let text = match outcome {
            Ok(()) => self.read_transcript(&output_key).await,
            Err(e) => Err(e),
        };
        job_artifacts.run().await;

        text
    }

    async fn await_completion(&self, job_name: &str) -> Result<(), TranscribeError> {
        loop {
            tokio::time::sleep(self.poll_interval).await;

            let resp = self
                .transcribe
                .get_transcription_job()
                .transcription_job_name(job_name)
                .send()
                .await
                .map_err(|e| TranscribeError::Api(e.into_service_error().to_string()))?;

            let job = resp
                .transcription_job()
                .ok_or_else(|| TranscribeError::Api("no job in response".into()))?;

            match job.transcription_job_status() {
                Some(TranscriptionJobStatus::Completed) => return Ok(()),
                Some(TranscriptionJobStatus::Failed) => {
                    let reason = job.failure_reason().unwrap_or("unknown").to_string();
                    return Err(TranscribeError::JobFailed(reason));
                }
                _ => continue,
            }
        }
    }

    async fn read_transcript(&self, output_key: &str) -> Result<String, TranscribeError> {
        let resp = self
            .s3
            .get_object()
            .bucket(&self.bucket)
            .key(output_key)
            .send()
            .await
            .map_err(|e| TranscribeError::Api(format!("failed to read transcript: {e}")))?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| TranscribeError::Api(format!("failed to read transcript body: {e}")))?
            .into_bytes();

        let text = extract_transcript_text(&body)?;
        info!(output_key, text_len = text.len(), "transcription complete");
        Ok(text)
    }
}

/// Deferred delete of one staged S3 object. Failures are logged, not raised.
fn delete_object(
    s3: aws_sdk_s3::Client,
    bucket: String,
    key: String,
) -> impl FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send>> {
    move || {
        Box::pin(async move {
            if let Err(e) = s3.delete_object().bucket(&bucket).key(&key).send().await {
                warn!(key = %key, error = %e, "failed to delete staged object");
            }
        })
    }
}

fn delete_job(
    transcribe: aws_sdk_transcribe::Client,
    job_name: String,
) -> impl FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send>> {
    move || {
        Box::pin(async move {
            if let Err(e) = transcribe
                .delete_transcription_job()
                .transcription_job_name(&job_name)
                .send()
                .await
            {
                warn!(job_name = %job_name, error = %e, "failed to delete transcription job");
            }
        })
    }
}

#[async_trait]
impl Transcriber for TranscribeClient {
    async fn transcribe(&self, audio: &Path) -> Result<String, ExtractionError> {
        let name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let format = AudioFormat::from_filename(name)?;
        Ok(self.transcribe_file(audio, format).await?)
    }
}

#[derive(Deserialize)]
struct TranscriptDocument {
    results: TranscriptResults,
}

#[derive(Deserialize)]
struct TranscriptResults {
    #[serde(default)]
    transcripts: Vec<TranscriptEntry>,
}

#[derive(Deserialize)]
struct TranscriptEntry {
    transcript: String,
}

/// Pull the plain text out of a Transcribe result document:
///
/// ```json
/// { "results": { "transcripts": [{ "transcript": "the text..." }] } }
/// ```
///
/// A document with no transcripts yields an empty string.
pub fn extract_transcript_text(json: &[u8]) -> Result<String, TranscribeError> {
    let doc: TranscriptDocument =
        serde_json::from_slice(json).map_err(|e| TranscribeError::Parse(e.to_string()))?;
    Ok(doc
        .results
        .transcripts
        .into_iter()
        .next()
        .map(|t| t.transcript.trim().to_string())
        .unwrap_or_default())
}
