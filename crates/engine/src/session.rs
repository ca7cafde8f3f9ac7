use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::clamp::{PlaybackClamp, TrimWindow};
use crate::error::{EngineError, Result};
use crate::export::{TranscodeGateway, build_trim_export};
use crate::mapper;
use crate::segments::{Segment, SegmentList};
use crate::settings::PlaybackSettings;
use crate::sync::{self, AuxTrackState, SyncAction, SyncConfig};
use crate::transitions::{ActiveTransition, TransitionEffect, active_transition};

/// Minimum virtual-time movement, in seconds, before a change event is
/// emitted. Keeps tick output quiet while the cursor creeps forward.
pub const CURSOR_REPORT_QUANTUM: f64 = 0.1;

/// Narrow interface to the media player collaborator.
///
/// The session polls the position each tick and writes a corrected position
/// back when needed; it never drives play/pause itself.
pub trait MediaPlayer {
    fn position(&self) -> f64;
    fn set_position(&mut self, seconds: f64);
    fn is_playing(&self) -> bool;
}

/// The source recording under edit. Immutable for the session's lifetime;
/// all edits are slices over it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceVideo {
    pub uri: String,
    pub duration: f64,
}

/// Edit commands issued by a UI, matched exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    Trim { start: f64, end: f64 },
    Split { at: f64 },
    Delete { start: f64, end: f64 },
    SeekVirtual { seconds: f64 },
}

/// Events emitted by commands and ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SegmentsChanged(TimelineSnapshot),
    CursorMoved { from: f64, to: f64 },
    VirtualTimeChanged { seconds: f64 },
    MusicSync(SyncAction),
    VoiceSync(SyncAction),
    TransitionChanged(Option<ActiveTransition>),
}

/// Immutable timeline view consumed by a timeline widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSnapshot {
    pub source_uri: String,
    pub source_duration: f64,
    pub segments: Vec<Segment>,
    pub virtual_duration: f64,
}

/// Facade binding the segment list, the time mapper and the playback clamp
/// to a live media player.
///
/// Single-writer by construction: user commands arrive between ticks, and
/// the tick always re-reads the current list, so an edit committed while
/// paused is picked up naturally on the next tick.
///
/// # Example
/// ```ignore
/// let mut session = EditSession::new(player, SourceVideo {
///     uri: "take.mp4".to_string(),
///     duration: 20.0,
/// })?;
/// session.handle_command(EditCommand::Split { at: 8.0 });
/// session.handle_command(EditCommand::Delete { start: 0.0, end: 8.0 });
/// assert_eq!(session.virtual_duration(), 12.0);
/// ```
#[derive(Debug)]
pub struct EditSession<P> {
    player: P,
    source: SourceVideo,
    segments: SegmentList,
    window: TrimWindow,
    clamp: PlaybackClamp,
    settings: PlaybackSettings,
    sync_config: SyncConfig,
    music: Option<AuxTrackState>,
    voice: Option<AuxTrackState>,
    transitions: Vec<TransitionEffect>,
    active: Option<ActiveTransition>,
    music_seek_cooldown: u32,
    last_virtual_time: f64,
}

impl<P> EditSession<P>
where
    P: MediaPlayer,
{
    /// Creates a session over one source video, keeping the full range and
    /// parking the cursor at the first segment's start.
    pub fn new(mut player: P, source: SourceVideo) -> Result<Self> {
        if !source.duration.is_finite() || source.duration <= 0.0 {
            return Err(EngineError::InvalidSourceDuration {
                seconds: source.duration,
            });
        }

        let segments = SegmentList::full_range(source.duration);
        let window = TrimWindow::new(0.0, source.duration);
        player.set_position(0.0);
        info!(uri = %source.uri, duration = source.duration, "session established");

        Ok(Self {
            player,
            source,
            segments,
            window,
            clamp: PlaybackClamp::default(),
            settings: PlaybackSettings::default(),
            sync_config: SyncConfig::default(),
            music: None,
            voice: None,
            transitions: Vec::new(),
            active: None,
            music_seek_cooldown: 0,
            last_virtual_time: 0.0,
        })
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: EditCommand) -> Vec<SessionEvent> {
        match command {
            EditCommand::Trim { start, end } => self.apply_trim(start, end),
            EditCommand::Split { at } => self.apply_split(at),
            EditCommand::Delete { start, end } => self.apply_delete(start, end),
            EditCommand::SeekVirtual { seconds } => self.seek_virtual(seconds),
        }
    }

    /// Commits a fresh single-range baseline, discarding split/delete
    /// history, and narrows the legacy trim window to match.
    pub fn apply_trim(&mut self, start: f64, end: f64) -> Vec<SessionEvent> {
        let previous = self.player.position();
        self.segments = SegmentList::trim(start, end, self.source.duration);
        if let Some(kept) = self.segments.first() {
            self.window = TrimWindow::new(kept.start, kept.end);
        }
        info!(start, end, "trim applied");
        self.finish_mutation(previous)
    }

    /// Splits the kept range at `at`; a cut on a boundary or in a gap is a
    /// no-op and still reported through a snapshot event.
    pub fn apply_split(&mut self, at: f64) -> Vec<SessionEvent> {
        let previous = self.player.position();
        self.segments = self.segments.split_at(at);
        info!(at, segment_count = self.segments.len(), "split applied");
        self.finish_mutation(previous)
    }

    /// Deletes `[start, end]` from the kept ranges. An empty result is a
    /// valid terminal state: the virtual duration drops to zero and the UI
    /// is expected to disable playback.
    pub fn apply_delete(&mut self, start: f64, end: f64) -> Vec<SessionEvent> {
        let previous = self.player.position();
        self.segments = self
            .segments
            .delete_range(start, end, self.source.duration);
        info!(
            start,
            end,
            segment_count = self.segments.len(),
            "delete applied"
        );
        self.finish_mutation(previous)
    }

    /// Seeks to a virtual timestamp. The next tick settles the cursor
    /// exactly if the mapped position needs further correction.
    pub fn seek_virtual(&mut self, seconds: f64) -> Vec<SessionEvent> {
        let from = self.player.position();
        let to = mapper::to_absolute(seconds, &self.segments, self.source.duration);
        if to != from {
            self.player.set_position(to);
            debug!(virtual_seconds = seconds, to, "seek");
            return vec![SessionEvent::CursorMoved { from, to }];
        }
        Vec::new()
    }

    /// Virtual position of the live cursor.
    pub fn virtual_current_time(&self) -> f64 {
        mapper::to_virtual(self.player.position(), &self.segments)
    }

    /// Total edited duration; zero when everything was deleted.
    pub fn virtual_duration(&self) -> f64 {
        mapper::virtual_duration(&self.segments)
    }

    /// Builds the timeline view for a UI widget.
    pub fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            source_uri: self.source.uri.clone(),
            source_duration: self.source.duration,
            segments: self.segments.as_slice().to_vec(),
            virtual_duration: self.virtual_duration(),
        }
    }

    pub fn segments(&self) -> &SegmentList {
        &self.segments
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PlaybackSettings {
        &mut self.settings
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Attaches or replaces the background-music track.
    pub fn set_music_track(&mut self, duration: f64) {
        self.music = Some(AuxTrackState {
            duration,
            position: 0.0,
        });
        self.music_seek_cooldown = 0;
    }

    pub fn clear_music_track(&mut self) {
        self.music = None;
    }

    /// Records the music player's last reported position.
    pub fn report_music_position(&mut self, seconds: f64) {
        if let Some(track) = self.music.as_mut() {
            track.position = seconds;
        }
    }

    /// Attaches or replaces the voice-over track.
    pub fn set_voice_track(&mut self, duration: f64) {
        self.voice = Some(AuxTrackState {
            duration,
            position: 0.0,
        });
    }

    pub fn clear_voice_track(&mut self) {
        self.voice = None;
    }

    /// Records the voice player's last reported position.
    pub fn report_voice_position(&mut self, seconds: f64) {
        if let Some(track) = self.voice.as_mut() {
            track.position = seconds;
        }
    }

    /// Replaces the transition effect list used by the tick projection.
    pub fn set_transitions(&mut self, effects: Vec<TransitionEffect>) {
        self.transitions = effects;
    }

    /// Runs one synchronization tick.
    ///
    /// Samples the player, corrects the cursor through the clamp (writing
    /// back only when the position actually changes), derives aux-track
    /// actions while playing, and re-projects the active transition.
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        let reported = self.player.position();
        let corrected = self.clamp.correct(reported, &self.segments, self.window);
        if corrected != reported {
            self.player.set_position(corrected);
            events.push(SessionEvent::CursorMoved {
                from: reported,
                to: corrected,
            });
        }

        let virtual_now = mapper::to_virtual(corrected, &self.segments);
        if (virtual_now - self.last_virtual_time).abs() > CURSOR_REPORT_QUANTUM {
            self.last_virtual_time = virtual_now;
            events.push(SessionEvent::VirtualTimeChanged {
                seconds: virtual_now,
            });
        }

        self.music_seek_cooldown = self.music_seek_cooldown.saturating_sub(1);
        if self.player.is_playing() {
            if let Some(track) = self.music {
                if let Some(action) =
                    sync::music_action(corrected, self.source.duration, track, self.sync_config)
                {
                    let rate_limited =
                        matches!(action, SyncAction::Seek(_)) && self.music_seek_cooldown > 0;
                    if !rate_limited {
                        if matches!(action, SyncAction::Seek(_)) {
                            self.music_seek_cooldown = self.sync_config.seek_cooldown_ticks;
                        }
                        events.push(SessionEvent::MusicSync(action));
                    }
                }
            }
            if let Some(track) = self.voice {
                if let Some(action) =
                    sync::voice_action(corrected, self.source.duration, track, self.sync_config)
                {
                    events.push(SessionEvent::VoiceSync(action));
                }
            }
        }

        let active = active_transition(&self.transitions, corrected);
        if active != self.active {
            self.active = active.clone();
            events.push(SessionEvent::TransitionChanged(active));
        }

        events
    }

    /// Realizes the current kept range into a new media file.
    ///
    /// Only a single contiguous range is committable; split/delete edits
    /// stay preview-only and are refused here.
    pub fn commit_trim(
        &self,
        gateway: &impl TranscodeGateway,
        output: PathBuf,
    ) -> Result<PathBuf> {
        let request = build_trim_export(&self.source.uri, output, &self.segments)?;
        info!(input = %request.input.display(), "committing trim export");
        gateway.run(&request)
    }

    /// Moves the cursor to the start of the segment containing (or nearest
    /// after) its previous position, so it never dangles in deleted
    /// territory. With no segments left the cursor stays put.
    fn finish_mutation(&mut self, previous: f64) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        if let Some(index) = self.segments.index_at_or_after(previous) {
            let target = self.segments.as_slice()[index].start;
            if target != previous {
                self.player.set_position(target);
                events.push(SessionEvent::CursorMoved {
                    from: previous,
                    to: target,
                });
            }
        }

        events.push(SessionEvent::SegmentsChanged(self.snapshot()));
        events
    }
}
