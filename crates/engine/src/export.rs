use std::path::{Path, PathBuf};

use transcode_ffmpeg::{TranscodeOperation, TranscodeRequest, run_transcode};

use crate::error::{EngineError, Result};
use crate::segments::SegmentList;

/// Media file manipulation required when the user commits an edit.
///
/// The engine only constructs declarative requests (operation kind plus
/// time bounds or parameters) and never interprets codec details.
pub trait TranscodeGateway {
    /// Realizes one request and returns the produced output path.
    fn run(&self, request: &TranscodeRequest) -> Result<PathBuf>;
}

/// FFmpeg CLI-backed gateway used by production wiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegTranscodeGateway;

impl TranscodeGateway for FfmpegTranscodeGateway {
    fn run(&self, request: &TranscodeRequest) -> Result<PathBuf> {
        run_transcode(request)?;
        Ok(request.output.clone())
    }
}

/// Builds the trim request for the current kept range.
///
/// Only a single contiguous kept range maps onto a real cut file. After
/// split/delete edits the preview simulates the result but nothing is
/// committed; callers get an explicit error instead of a silently
/// concatenated output.
pub fn build_trim_export(
    source_uri: impl AsRef<Path>,
    output: PathBuf,
    segments: &SegmentList,
) -> Result<TranscodeRequest> {
    let kept = segments.as_slice();
    match kept {
        [] => Err(EngineError::NoExportableContent),
        [only] => Ok(TranscodeRequest {
            input: source_uri.as_ref().to_path_buf(),
            output,
            operation: TranscodeOperation::Trim {
                start_seconds: only.start,
                end_seconds: only.end,
            },
        }),
        _ => Err(EngineError::MultiSegmentExportUnsupported {
            segment_count: kept.len(),
        }),
    }
}
