use std::fmt::{Display, Formatter};

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by session construction and export commands.
///
/// Timeline mutations never error: malformed ranges are clamped or dropped
/// during normalization, and an empty segment list is a valid terminal state.
#[derive(Debug)]
pub enum EngineError {
    InvalidSourceDuration {
        seconds: f64,
    },
    NoExportableContent,
    MultiSegmentExportUnsupported {
        segment_count: usize,
    },
    Transcode(transcode_ffmpeg::TranscodeError),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSourceDuration { seconds } => {
                write!(f, "source duration must be positive and finite: {seconds}")
            }
            Self::NoExportableContent => {
                write!(f, "timeline has no kept content to export")
            }
            Self::MultiSegmentExportUnsupported { segment_count } => {
                write!(
                    f,
                    "export requires a single contiguous kept range, found {segment_count} segments"
                )
            }
            Self::Transcode(err) => write!(f, "transcode gateway error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transcode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<transcode_ffmpeg::TranscodeError> for EngineError {
    fn from(value: transcode_ffmpeg::TranscodeError) -> Self {
        Self::Transcode(value)
    }
}
