use std::path::Path;

use crate::error::TranscribeError;

/// Header facts of a readable WAV file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavSummary {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub duration_secs: f64,
}

/// Parse the RIFF/WAVE header so a truncated or mislabelled upload fails
/// before it is staged for transcription.
pub fn validate_wav(path: &Path) -> Result<WavSummary, TranscribeError> {
    let reader = hound::WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
            TranscribeError::MissingFile(path.display().to_string())
        }
        other => TranscribeError::InvalidWav(other.to_string()),
    })?;

    let spec = reader.spec();
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(TranscribeError::InvalidWav(
            "header declares no channels or a zero sample rate".into(),
        ));
    }

    Ok(WavSummary {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        duration_secs: f64::from(reader.duration()) / f64::from(spec.sample_rate),
    })
}
