//! UI-agnostic segment editing engine for the pitch recorder's preview
//! player.
//!
//! The engine keeps a list of disjoint kept intervals over an immutable
//! source recording, maps between absolute source time and the gap-free
//! virtual timeline, and continuously corrects the live playback cursor
//! into kept territory. Actual media manipulation happens behind the
//! transcode gateway; the engine only issues declarative requests.

pub mod clamp;
pub mod error;
pub mod export;
pub mod mapper;
pub mod segments;
pub mod session;
pub mod settings;
pub mod sync;
pub mod ticker;
pub mod transitions;

pub use clamp::{ClampConfig, END_SNAP_EPSILON, PlaybackClamp, TrimWindow};
pub use error::{EngineError, Result};
pub use export::{FfmpegTranscodeGateway, TranscodeGateway, build_trim_export};
pub use segments::{MERGE_TOLERANCE, Segment, SegmentList};
pub use session::{
    EditCommand, EditSession, MediaPlayer, SessionEvent, SourceVideo, TimelineSnapshot,
};
pub use settings::{ChannelVolume, PlaybackSettings};
pub use sync::{AuxTrackState, SyncAction, SyncConfig};
pub use ticker::{DEFAULT_TICK_PERIOD, Ticker};
pub use transitions::{ActiveTransition, TransitionEffect, active_transition};
