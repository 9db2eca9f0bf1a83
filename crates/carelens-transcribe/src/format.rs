use std::fmt;
use std::path::Path;

use aws_sdk_transcribe::types::MediaFormat;

use crate::error::TranscribeError;

/// Audio containers accepted for transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Mp4,
    M4a,
    M4p,
    Aac,
    Ogg,
    Flac,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 8] = [
        AudioFormat::Wav,
        AudioFormat::Mp3,
        AudioFormat::Mp4,
        AudioFormat::M4a,
        AudioFormat::M4p,
        AudioFormat::Aac,
        AudioFormat::Ogg,
        AudioFormat::Flac,
    ];

    /// Match a bare extension, case-insensitively and without the dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let format = match ext.to_ascii_lowercase().as_str() {
            "wav" => AudioFormat::Wav,
            "mp3" => AudioFormat::Mp3,
            "mp4" => AudioFormat::Mp4,
            "m4a" => AudioFormat::M4a,
            "m4p" => AudioFormat::M4p,
            "aac" => AudioFormat::Aac,
            "ogg" => AudioFormat::Ogg,
            "flac" => AudioFormat::Flac,
            _ => return None,
        };
        Some(format)
    }

    /// Resolve the format from a client-supplied file name.
    pub fn from_filename(name: &str) -> Result<Self, TranscribeError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| {
            let shown = if ext.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{}", ext.to_ascii_lowercase())
            };
            TranscribeError::UnsupportedFormat(format!(
                "{shown}; supported formats are {}",
                supported_list()
            ))
        })
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Mp4 => "mp4",
            AudioFormat::M4a => "m4a",
            AudioFormat::M4p => "m4p",
            AudioFormat::Aac => "aac",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Flac => "flac",
        }
    }

    /// The Transcribe container. The MPEG-4 audio family all ride in MP4.
    pub fn media_format(self) -> MediaFormat {
        match self {
            AudioFormat::Wav => MediaFormat::Wav,
            AudioFormat::Mp3 => MediaFormat::Mp3,
            AudioFormat::Mp4 | AudioFormat::M4a | AudioFormat::M4p | AudioFormat::Aac => {
                MediaFormat::Mp4
            }
            AudioFormat::Ogg => MediaFormat::Ogg,
            AudioFormat::Flac => MediaFormat::Flac,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn supported_list() -> String {
    AudioFormat::ALL
        .iter()
        .map(|f| format!(".{f}"))
        .collect::<Vec<_>>()
        .join(", ")
}
