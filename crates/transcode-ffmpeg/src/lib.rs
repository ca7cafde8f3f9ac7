//! Declarative edit execution backed by the FFmpeg CLI.
//!
//! Requests name an operation and its bounds; argument construction is pure
//! and testable, and only [`run_transcode`] touches the process boundary.

mod command;
mod error;

pub use command::{TranscodeOperation, TranscodeRequest, build_operation_args, run_transcode};
pub use error::{Result, TranscodeError};
