//! Service configuration.
//!
//! Values come from built-in defaults, then an optional JSON file named by
//! `CARELENS_CONFIG`, then individual environment variables. The merged
//! result is validated once at startup.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "CARELENS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind: String,
    pub region: String,
    pub model_id: String,
    /// S3 bucket used to stage audio for transcription.
    pub staging_bucket: String,
    /// Where uploads are written while a request runs. `None` = system temp dir.
    pub upload_dir: Option<PathBuf>,
    pub window_size: usize,
    pub scale_factor: u32,
    pub contrast_factor: f32,
    pub session_idle_secs: u64,
    pub max_sessions: usize,
    pub sweep_interval_secs: u64,
    pub capability_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub tesseract_bin: String,
    pub tesseract_lang: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            region: "us-east-1".to_string(),
            model_id: "us.amazon.nova-lite-v1:0".to_string(),
            staging_bucket: "carelens-staging".to_string(),
            upload_dir: None,
            window_size: 5,
            scale_factor: 2,
            contrast_factor: 2.0,
            session_idle_secs: 30 * 60,
            max_sessions: 1000,
            sweep_interval_secs: 60,
            capability_timeout_secs: 120,
            request_timeout_secs: 180,
            max_upload_bytes: 20 * 1024 * 1024,
            tesseract_bin: "tesseract".to_string(),
            tesseract_lang: "eng".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        Self::from_sources(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Merge an optional JSON file and a variable lookup over the defaults.
    pub fn from_sources(
        file: Option<&Path>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };

        if let Some(v) = var("CARELENS_BIND") {
            config.bind = v;
        }
        if let Some(v) = var("AWS_REGION") {
            config.region = v;
        }
        if let Some(v) = var("CARELENS_MODEL_ID") {
            config.model_id = v;
        }
        if let Some(v) = var("CARELENS_STAGING_BUCKET") {
            config.staging_bucket = v;
        }
        if let Some(v) = var("CARELENS_UPLOAD_DIR") {
            config.upload_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = var("CARELENS_TESSERACT_BIN") {
            config.tesseract_bin = v;
        }
        override_parsed(&var, "CARELENS_WINDOW_SIZE", &mut config.window_size)?;
        override_parsed(&var, "CARELENS_SESSION_IDLE_SECS", &mut config.session_idle_secs)?;
        override_parsed(
            &var,
            "CARELENS_CAPABILITY_TIMEOUT_SECS",
            &mut config.capability_timeout_secs,
        )?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "bind must be a socket address, got {:?}",
                self.bind
            )));
        }
        if self.window_size == 0 {
            return Err(ConfigError::Invalid("window_size must be at least 1".into()));
        }
        if self.scale_factor == 0 {
            return Err(ConfigError::Invalid("scale_factor must be at least 1".into()));
        }
        if !(self.contrast_factor.is_finite() && self.contrast_factor > 0.0) {
            return Err(ConfigError::Invalid("contrast_factor must be positive".into()));
        }
        if self.max_sessions == 0 {
            return Err(ConfigError::Invalid("max_sessions must be at least 1".into()));
        }
        for (name, secs) in [
            ("session_idle_secs", self.session_idle_secs),
            ("sweep_interval_secs", self.sweep_interval_secs),
            ("capability_timeout_secs", self.capability_timeout_secs),
            ("request_timeout_secs", self.request_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        Ok(())
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn capability_timeout(&self) -> Duration {
        Duration::from_secs(self.capability_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn override_parsed<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    slot: &mut T,
) -> Result<(), ConfigError> {
    if let Some(raw) = var(key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw })?;
    }
    Ok(())
}
