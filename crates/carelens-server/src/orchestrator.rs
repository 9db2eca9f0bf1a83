//! Per-request composition of conditioning, extraction, prompting and
//! generation.
//!
//! Every capability call runs under `capability_timeout`. Analysis tasks
//! (OCR, report, audio) each get a fresh conversation context; chat turns go
//! through the caller's session, holding its lock for the whole turn.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use carelens_core::capability::{GeneratorRef, TextExtractorRef, TranscriberRef};
use carelens_core::models::conversation::ConversationContext;
use carelens_core::error::GenerationError;
use carelens_core::models::request::{PromptRequest, RawDemographics, normalize_field};
use carelens_prompt::PromptAssembler;
use carelens_prompt::chat::frame_conversation;
use carelens_sentiment::{FusedSentiment, SentimentFusion};
use carelens_transcribe::AudioFormat;
use carelens_vision::{CleanMode, ConditionerParams, ImageConditioner, clean_text};

use crate::config::ServiceConfig;
use crate::error::OrchestratorError;
use crate::sessions::SessionStore;
use crate::upload::ScopedUpload;

/// Substituted when OCR finds no legible text.
pub const NO_TEXT_DETECTED: &str = "No text could be detected in the provided image.";

/// The backends the pipeline calls out to.
#[derive(Clone)]
pub struct Capabilities {
    pub extractor: TextExtractorRef,
    pub transcriber: TranscriberRef,
    pub generator: GeneratorRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatTask {
    Medical,
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTask {
    /// Ingredient label against the user's profile.
    Nutrition,
    /// Lab or medical report, optionally against a user question.
    HealthReport,
}

impl ImageTask {
    fn clean_mode(self) -> CleanMode {
        match self {
            ImageTask::Nutrition => CleanMode::Ingredients,
            ImageTask::HealthReport => CleanMode::Report,
        }
    }
}

/// An uploaded image plus the optional form fields sent with it.
#[derive(Debug, Clone, Default)]
pub struct ImageSubmission {
    pub image: Vec<u8>,
    pub demographics: RawDemographics,
    pub query: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AudioAnalysis {
    pub transcription: String,
    pub fused: FusedSentiment,
}

pub struct Orchestrator {
    capabilities: Capabilities,
    assembler: Arc<PromptAssembler>,
    conditioner: ImageConditioner,
    fusion: SentimentFusion,
    sessions: Arc<SessionStore>,
    upload_dir: PathBuf,
    window_size: usize,
    capability_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        config: &ServiceConfig,
        capabilities: Capabilities,
        sessions: Arc<SessionStore>,
    ) -> Result<Self, OrchestratorError> {
        let assembler = Arc::new(PromptAssembler::new()?);
        let conditioner = ImageConditioner::new(ConditionerParams {
            scale_factor: config.scale_factor,
            contrast_factor: config.contrast_factor,
            ..ConditionerParams::default()
        })?;
        let fusion = SentimentFusion::new(
            Arc::clone(&capabilities.generator),
            Arc::clone(&assembler),
            config.capability_timeout(),
        );

        Ok(Self {
            capabilities,
            assembler,
            conditioner,
            fusion,
            sessions,
            upload_dir: config.upload_dir(),
            window_size: config.window_size,
            capability_timeout: config.capability_timeout(),
        })
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// One chat turn on `session_id`. Concurrent turns on the same session
    /// queue on its lock. A failed turn stays in the window without a
    /// response, so later history skips it.
    pub async fn chat(
        &self,
        session_id: &str,
        task: ChatTask,
        message: &str,
    ) -> Result<String, OrchestratorError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(OrchestratorError::Validation("message must not be empty".into()));
        }

        let request = match task {
            ChatTask::Medical => PromptRequest::MedicalChat {
                message: message.to_string(),
            },
            ChatTask::Health => PromptRequest::HealthChat {
                message: message.to_string(),
            },
        };
        let prompt = self.assembler.render(&request)?;

        let context = self.sessions.acquire(session_id);
        let mut context = context.lock().await;
        info!(
            session_id,
            task = %request.kind(),
            history_len = context.len(),
            "chat turn started"
        );
        self.converse(&mut context, prompt.into_string()).await
    }

    /// OCR an uploaded image and analyse the text with the task's template.
    pub async fn analyze_image(
        &self,
        task: ImageTask,
        submission: ImageSubmission,
    ) -> Result<String, OrchestratorError> {
        let started = Instant::now();
        let ImageSubmission {
            image,
            demographics,
            query,
        } = submission;
        if image.is_empty() {
            return Err(OrchestratorError::Validation("uploaded image is empty".into()));
        }
        let source_bytes = image.len();

        let conditioner = self.conditioner.clone();
        let png = tokio::task::spawn_blocking(move || conditioner.condition_bytes(&image)?.to_png())
            .await
            .map_err(|e| OrchestratorError::Internal(format!("conditioning task failed: {e}")))??;

        let upload = ScopedUpload::write(&self.upload_dir, ".png", &png)
            .await
            .map_err(|e| OrchestratorError::Resource(format!("failed to stage image: {e}")))?;
        let extracted = self
            .bounded("text extraction", self.capabilities.extractor.extract_text(upload.path()))
            .await;
        upload.release();

        let text = clean_text(&extracted?, task.clean_mode());
        let text = if text.is_empty() {
            warn!(source_bytes, "no text detected in image");
            NO_TEXT_DETECTED.to_string()
        } else {
            text
        };

        let demographics = demographics.normalize();
        let request = match task {
            ImageTask::Nutrition => PromptRequest::NutritionAnalysis {
                demographics,
                ingredients: text,
            },
            ImageTask::HealthReport => PromptRequest::HealthReportAnalysis {
                demographics,
                report_text: text,
                query: normalize_field(query.as_deref()),
            },
        };
        let kind = request.kind();
        let prompt = self.assembler.render(&request)?;

        let mut context = ConversationContext::with_window(self.window_size)?;
        let reply = self.converse(&mut context, prompt.into_string()).await?;

        info!(
            task = %kind,
            source_bytes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "image analysis complete"
        );
        Ok(reply)
    }

    /// Transcribe an audio upload, then score and explain its sentiment.
    pub async fn process_audio(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<AudioAnalysis, OrchestratorError> {
        let started = Instant::now();
        let format = AudioFormat::from_filename(file_name)
            .map_err(|e| OrchestratorError::Validation(e.to_string()))?;
        if bytes.is_empty() {
            return Err(OrchestratorError::Validation("uploaded audio is empty".into()));
        }

        let upload = ScopedUpload::write(&self.upload_dir, &format!(".{format}"), bytes)
            .await
            .map_err(|e| OrchestratorError::Resource(format!("failed to stage audio: {e}")))?;
        let transcribed = self
            .bounded("transcription", self.capabilities.transcriber.transcribe(upload.path()))
            .await;
        upload.release();

        let transcription = transcribed?.trim().to_string();
        let fused = self.fusion.analyze(&transcription).await;

        info!(
            format = %format,
            audio_bytes = bytes.len(),
            transcript_len = transcription.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "audio analysis complete"
        );
        Ok(AudioAnalysis {
            transcription,
            fused,
        })
    }

    /// Score and explain free text. Never fails once the text is non-empty.
    pub async fn text_sentiment(&self, text: &str) -> Result<FusedSentiment, OrchestratorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OrchestratorError::Validation("message must not be empty".into()));
        }
        Ok(self.fusion.analyze(text).await)
    }

    /// Push `prompt` as the pending user turn, generate against the framed
    /// context and record the reply.
    async fn converse(
        &self,
        context: &mut ConversationContext,
        prompt: String,
    ) -> Result<String, OrchestratorError> {
        context.add_pending(prompt);
        let framed = frame_conversation(context)?;

        let started = Instant::now();
        let reply = self
            .bounded("generation", self.capabilities.generator.generate(&framed))
            .await?;
        let reply = reply.trim().to_string();
        if reply.is_empty() {
            return Err(GenerationError::EmptyOutput("model returned only whitespace".into()).into());
        }

        context.update_last_response(reply.clone())?;
        info!(
            reply_len = reply.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generation complete"
        );
        Ok(reply)
    }

    async fn bounded<T, E>(
        &self,
        stage: &'static str,
        work: impl Future<Output = Result<T, E>>,
    ) -> Result<T, OrchestratorError>
    where
        OrchestratorError: From<E>,
    {
        match tokio::time::timeout(self.capability_timeout, work).await {
            Ok(result) => result.map_err(OrchestratorError::from),
            Err(_) => Err(OrchestratorError::Timeout {
                stage,
                after: self.capability_timeout,
            }),
        }
    }
}
