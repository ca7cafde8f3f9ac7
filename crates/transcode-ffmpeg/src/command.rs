use std::path::PathBuf;
use std::process::Command;

use crate::error::{Result, TranscodeError};

/// Slowest speed the single-pass `atempo` audio filter supports.
const MIN_SPEED_FACTOR: f64 = 0.5;
/// Fastest speed the single-pass `atempo` audio filter supports.
const MAX_SPEED_FACTOR: f64 = 2.0;

/// One destructive edit, described declaratively.
///
/// Callers state what to do and over which bounds; how the FFmpeg filter
/// graph realizes it stays inside this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscodeOperation {
    /// Keep `[start_seconds, end_seconds]` of the input, stream-copied.
    Trim {
        start_seconds: f64,
        end_seconds: f64,
    },
    /// Burn a centered white caption into the video track.
    TextOverlay { text: String },
    /// Re-time video and audio by `factor` (2.0 = twice as fast).
    Speed { factor: f64 },
    /// Rotate the video a quarter turn clockwise.
    Rotate,
}

/// Request handed to the FFmpeg CLI runner.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub operation: TranscodeOperation,
}

/// Builds the operation-specific arguments placed between `-i <input>` and
/// the output path.
///
/// # Example
/// ```
/// use transcode_ffmpeg::{TranscodeOperation, build_operation_args};
///
/// let args = build_operation_args(&TranscodeOperation::Trim {
///     start_seconds: 2.0,
///     end_seconds: 8.0,
/// })
/// .expect("valid");
/// assert_eq!(args, ["-ss", "2.000", "-t", "6.000", "-c", "copy"]);
/// ```
pub fn build_operation_args(operation: &TranscodeOperation) -> Result<Vec<String>> {
    validate_operation(operation)?;

    let args = match operation {
        TranscodeOperation::Trim {
            start_seconds,
            end_seconds,
        } => vec![
            "-ss".to_string(),
            format_seconds(*start_seconds),
            "-t".to_string(),
            format_seconds(end_seconds - start_seconds),
            "-c".to_string(),
            "copy".to_string(),
        ],
        TranscodeOperation::TextOverlay { text } => vec![
            "-vf".to_string(),
            format!(
                "drawtext=text='{}':fontcolor=white:fontsize=24:x=(w-text_w)/2:y=(h-text_h)/2",
                escape_drawtext(text)
            ),
        ],
        TranscodeOperation::Speed { factor } => vec![
            "-filter:v".to_string(),
            format!("setpts={:.4}*PTS", 1.0 / factor),
            "-filter:a".to_string(),
            format!("atempo={:.3}", factor),
        ],
        TranscodeOperation::Rotate => vec!["-vf".to_string(), "transpose=1".to_string()],
    };

    Ok(args)
}

/// Runs one request through the `ffmpeg` CLI.
pub fn run_transcode(request: &TranscodeRequest) -> Result<()> {
    let operation_args = build_operation_args(&request.operation)?;

    let mut command = Command::new("ffmpeg");
    command.args(["-hide_banner", "-v", "error", "-y"]);
    command.arg("-i").arg(&request.input);
    command.args(&operation_args);
    command.arg(&request.output);

    let output = command.output().map_err(|source| TranscodeError::Io {
        context: "run ffmpeg transcode",
        source,
    })?;
    if !output.status.success() {
        return Err(TranscodeError::CommandFailed {
            command: command_for_display(request),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

fn validate_operation(operation: &TranscodeOperation) -> Result<()> {
    match operation {
        TranscodeOperation::Trim {
            start_seconds,
            end_seconds,
        } => {
            if !start_seconds.is_finite() || *start_seconds < 0.0 {
                return Err(TranscodeError::InvalidRequest {
                    reason: "trim start must be non-negative",
                });
            }
            if *end_seconds <= *start_seconds {
                return Err(TranscodeError::InvalidRequest {
                    reason: "trim range is not positive",
                });
            }
        }
        TranscodeOperation::TextOverlay { text } => {
            if text.trim().is_empty() {
                return Err(TranscodeError::InvalidRequest {
                    reason: "overlay text is empty",
                });
            }
        }
        TranscodeOperation::Speed { factor } => {
            if !(MIN_SPEED_FACTOR..=MAX_SPEED_FACTOR).contains(factor) {
                return Err(TranscodeError::InvalidRequest {
                    reason: "speed factor must be between 0.5 and 2.0",
                });
            }
        }
        TranscodeOperation::Rotate => {}
    }
    Ok(())
}

fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.3}")
}

/// Escapes drawtext metacharacters so user text survives the filter parser.
fn escape_drawtext(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ':' => escaped.push_str("\\:"),
            '\'' => escaped.push_str("\\'"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn command_for_display(request: &TranscodeRequest) -> String {
    format!("ffmpeg transcode {}", request.output.display())
}

#[cfg(test)]
mod tests {
    use super::{TranscodeOperation, build_operation_args};
    use crate::TranscodeError;

    #[test]
    fn trim_args_use_stream_copy_with_millisecond_bounds() {
        let args = build_operation_args(&TranscodeOperation::Trim {
            start_seconds: 2.5,
            end_seconds: 10.0,
        })
        .expect("trim should build");

        assert_eq!(args, ["-ss", "2.500", "-t", "7.500", "-c", "copy"]);
    }

    #[test]
    fn trim_rejects_an_empty_range() {
        let result = build_operation_args(&TranscodeOperation::Trim {
            start_seconds: 5.0,
            end_seconds: 5.0,
        });
        assert!(matches!(
            result,
            Err(TranscodeError::InvalidRequest {
                reason: "trim range is not positive"
            })
        ));
    }

    #[test]
    fn text_overlay_builds_a_centered_drawtext_filter() {
        let args = build_operation_args(&TranscodeOperation::TextOverlay {
            text: "My Pitch".to_string(),
        })
        .expect("overlay should build");

        assert_eq!(
            args,
            [
                "-vf",
                "drawtext=text='My Pitch':fontcolor=white:fontsize=24:\
x=(w-text_w)/2:y=(h-text_h)/2",
            ]
        );
    }

    #[test]
    fn text_overlay_escapes_filter_metacharacters() {
        let args = build_operation_args(&TranscodeOperation::TextOverlay {
            text: "it's 10:30".to_string(),
        })
        .expect("overlay should build");

        assert!(args[1].contains(r"it\'s 10\:30"));
    }

    #[test]
    fn text_overlay_rejects_blank_text() {
        let result = build_operation_args(&TranscodeOperation::TextOverlay {
            text: "   ".to_string(),
        });
        assert!(matches!(result, Err(TranscodeError::InvalidRequest { .. })));
    }

    #[test]
    fn speed_args_pair_setpts_with_atempo() {
        let args = build_operation_args(&TranscodeOperation::Speed { factor: 2.0 })
            .expect("speed should build");

        assert_eq!(
            args,
            ["-filter:v", "setpts=0.5000*PTS", "-filter:a", "atempo=2.000"]
        );
    }

    #[test]
    fn speed_rejects_factors_outside_the_atempo_range() {
        for factor in [0.25, 4.0, 0.0] {
            let result = build_operation_args(&TranscodeOperation::Speed { factor });
            assert!(
                matches!(result, Err(TranscodeError::InvalidRequest { .. })),
                "factor {factor} should be rejected"
            );
        }
    }

    #[test]
    fn rotate_uses_a_single_transpose() {
        let args =
            build_operation_args(&TranscodeOperation::Rotate).expect("rotate should build");
        assert_eq!(args, ["-vf", "transpose=1"]);
    }
}
