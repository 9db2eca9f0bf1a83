#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use image::{GrayImage, ImageFormat, Luma};
use tower::ServiceExt;

use carelens_core::capability::{Generator, TextExtractor, Transcriber};
use carelens_core::error::{ExtractionError, GenerationError};
use carelens_core::models::request::RenderedPrompt;
use carelens_server::config::ServiceConfig;
use carelens_server::orchestrator::{Capabilities, Orchestrator};
use carelens_server::sessions::SessionStore;
use carelens_server::state::AppState;

/// A path handed to a backend, and whether it existed at that moment.
#[derive(Debug, Clone)]
pub struct SeenPath {
    pub path: PathBuf,
    pub existed: bool,
}

pub struct FakeExtractor {
    pub reply: Option<String>,
    pub seen: Mutex<Vec<SeenPath>>,
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract_text(&self, image: &Path) -> Result<String, ExtractionError> {
        record(&self.seen, image);
        self.reply
            .clone()
            .ok_or_else(|| ExtractionError::Backend("ocr engine crashed".into()))
    }
}

pub struct FakeTranscriber {
    pub reply: Option<String>,
    pub seen: Mutex<Vec<SeenPath>>,
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<String, ExtractionError> {
        record(&self.seen, audio);
        self.reply
            .clone()
            .ok_or_else(|| ExtractionError::CorruptInput("unreadable audio".into()))
    }
}

#[derive(Debug, Clone)]
pub enum GeneratorMode {
    /// Reply "Reply N" for the Nth call, after an optional delay.
    Numbered { delay: Duration },
    Fail,
    Hang,
}

pub struct FakeGenerator {
    pub mode: GeneratorMode,
    pub prompts: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, prompt: &RenderedPrompt) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.mode {
            GeneratorMode::Numbered { delay } => {
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_in_flight.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(*delay).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(format!("Reply {n}"))
            }
            GeneratorMode::Fail => Err(GenerationError::Unavailable("model offline".into())),
            GeneratorMode::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
                Ok("never".into())
            }
        }
    }
}

fn record(seen: &Mutex<Vec<SeenPath>>, path: &Path) {
    seen.lock().unwrap().push(SeenPath {
        path: path.to_path_buf(),
        existed: path.exists(),
    });
}

pub struct Harness {
    pub app: Router,
    pub extractor: Arc<FakeExtractor>,
    pub transcriber: Arc<FakeTranscriber>,
    pub generator: Arc<FakeGenerator>,
    pub sessions: Arc<SessionStore>,
    pub upload_dir: tempfile::TempDir,
}

pub struct HarnessBuilder {
    ocr_text: Option<String>,
    transcript: Option<String>,
    mode: GeneratorMode,
    capability_timeout_secs: u64,
    request_timeout_secs: u64,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            ocr_text: Some("Sugar, salt & E211".into()),
            transcript: Some("I am so happy and grateful today".into()),
            mode: GeneratorMode::Numbered {
                delay: Duration::ZERO,
            },
            capability_timeout_secs: 30,
            request_timeout_secs: 60,
        }
    }
}

impl HarnessBuilder {
    pub fn ocr_text(mut self, text: Option<&str>) -> Self {
        self.ocr_text = text.map(str::to_string);
        self
    }

    pub fn transcript(mut self, text: Option<&str>) -> Self {
        self.transcript = text.map(str::to_string);
        self
    }

    pub fn generator(mut self, mode: GeneratorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn capability_timeout_secs(mut self, secs: u64) -> Self {
        self.capability_timeout_secs = secs;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn build(self) -> Harness {
        let upload_dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig {
            upload_dir: Some(upload_dir.path().to_path_buf()),
            capability_timeout_secs: self.capability_timeout_secs,
            request_timeout_secs: self.request_timeout_secs,
            ..ServiceConfig::default()
        };

        let extractor = Arc::new(FakeExtractor {
            reply: self.ocr_text,
            seen: Mutex::new(Vec::new()),
        });
        let transcriber = Arc::new(FakeTranscriber {
            reply: self.transcript,
            seen: Mutex::new(Vec::new()),
        });
        let generator = Arc::new(FakeGenerator {
            mode: self.mode,
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });

        let sessions = Arc::new(SessionStore::new(
            config.window_size,
            config.max_sessions,
            config.session_idle(),
        ));
        let capabilities = Capabilities {
            extractor: extractor.clone(),
            transcriber: transcriber.clone(),
            generator: generator.clone(),
        };
        let orchestrator = Orchestrator::new(&config, capabilities, Arc::clone(&sessions)).unwrap();
        let app = carelens_server::router(AppState::new(orchestrator), &config);

        Harness {
            app,
            extractor,
            transcriber,
            generator,
            sessions,
            upload_dir,
        }
    }
}

impl Harness {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.generator.prompts.lock().unwrap().clone()
    }

    /// Files still present in the upload directory.
    pub fn leftover_uploads(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const BOUNDARY: &str = "carelens-test-boundary";

/// One multipart part: `(name, file name, bytes)`.
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, file_name, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// A small grayscale PNG with a dark bar across a light background.
pub fn sample_png() -> Vec<u8> {
    let mut img = GrayImage::from_pixel(16, 8, Luma([220]));
    for x in 2..14 {
        for y in 3..5 {
            img.put_pixel(x, y, Luma([30]));
        }
    }
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}
