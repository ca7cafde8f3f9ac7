//! Aux-track synchronization decisions.
//!
//! The preview plays up to three tracks: the video itself, an optional
//! background-music track and an optional voice-over track. Only the video
//! cursor is authoritative; the aux tracks follow it loosely. The functions
//! here decide, from positions and durations alone, what an aux player
//! should do next; the caller applies the action to its audio player.

use tracing::debug;

/// End-of-track guard in seconds. Acting slightly before a boundary keeps a
/// late tick from running past it.
pub const END_GUARD: f64 = 0.1;

/// Drift in seconds beyond which an aux track is re-seeked to the video.
pub const DRIFT_THRESHOLD: f64 = 1.0;

/// Video positions below this count as "restarted from the beginning".
pub const RESTART_WINDOW: f64 = 1.0;

/// Tunable thresholds for aux-track following.
///
/// `seek_cooldown_ticks` rate-limits drift seeks: the session skips further
/// drift corrections for this many ticks after issuing one, which at the
/// default 100 ms tick period reproduces the original 500 ms debounce while
/// staying tick-rate independent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncConfig {
    pub end_guard: f64,
    pub drift_threshold: f64,
    pub restart_window: f64,
    pub seek_cooldown_ticks: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            end_guard: END_GUARD,
            drift_threshold: DRIFT_THRESHOLD,
            restart_window: RESTART_WINDOW,
            seek_cooldown_ticks: 5,
        }
    }
}

/// Last reported state of one aux track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuxTrackState {
    pub duration: f64,
    pub position: f64,
}

/// What the caller should do with an aux player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncAction {
    /// Stop the track; the video has reached its end.
    Pause,
    /// Jump the track back to its beginning (loop or restart).
    Rewind,
    /// Align the track with the video; rate-limited by the seek cooldown.
    Seek(f64),
}

/// Decides the next action for the background-music track.
///
/// A track at least as long as the video pauses with it at the end; a
/// shorter track loops by rewinding when it runs out. Otherwise the track
/// is re-seeked whenever it drifts more than the threshold away from where
/// the video cursor says it should be.
pub fn music_action(
    video_position: f64,
    video_duration: f64,
    track: AuxTrackState,
    config: SyncConfig,
) -> Option<SyncAction> {
    if video_duration <= 0.0 || track.duration <= 0.0 {
        return None;
    }

    if video_position < config.restart_window && track.position >= config.restart_window {
        debug!(video_position, track_position = track.position, "video restarted, rewinding music");
        return Some(SyncAction::Rewind);
    }

    if track.duration >= video_duration {
        if video_position >= video_duration - config.end_guard {
            return Some(SyncAction::Pause);
        }
    } else if track.position >= track.duration - config.end_guard {
        return Some(SyncAction::Rewind);
    }

    let target = music_target_position(video_position, video_duration, track.duration);
    if (target - track.position).abs() > config.drift_threshold {
        debug!(to = target, track_position = track.position, "music drifted, re-seeking");
        return Some(SyncAction::Seek(target));
    }

    None
}

/// Where the music track should sit for a given video position.
///
/// When the video outlasts the track the track loops, so the target wraps
/// modulo the track duration; otherwise it clamps to the track's end.
pub fn music_target_position(video_position: f64, video_duration: f64, track_duration: f64) -> f64 {
    if video_duration > track_duration {
        video_position % track_duration
    } else {
        video_position.min(track_duration)
    }
}

/// Decides the next action for the voice-over track.
///
/// Voice recordings match the video take; they never loop. The track pauses
/// with the video at its end and rewinds when the video restarts.
pub fn voice_action(
    video_position: f64,
    video_duration: f64,
    track: AuxTrackState,
    config: SyncConfig,
) -> Option<SyncAction> {
    if video_duration <= 0.0 {
        return None;
    }
    if video_position < config.restart_window && track.position >= config.restart_window {
        return Some(SyncAction::Rewind);
    }
    if video_position >= video_duration - config.end_guard {
        return Some(SyncAction::Pause);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{AuxTrackState, SyncAction, SyncConfig, music_action, voice_action};

    fn config() -> SyncConfig {
        SyncConfig::default()
    }

    #[test]
    fn long_music_track_pauses_when_the_video_ends() {
        let track = AuxTrackState {
            duration: 30.0,
            position: 19.9,
        };
        let action = music_action(19.95, 20.0, track, config());
        assert_eq!(action, Some(SyncAction::Pause));
    }

    #[test]
    fn short_music_track_loops_at_its_own_end() {
        let track = AuxTrackState {
            duration: 8.0,
            position: 7.95,
        };
        let action = music_action(7.95, 20.0, track, config());
        assert_eq!(action, Some(SyncAction::Rewind));
    }

    #[test]
    fn music_reseeks_when_drift_exceeds_the_threshold() {
        let track = AuxTrackState {
            duration: 30.0,
            position: 2.0,
        };
        let action = music_action(5.0, 20.0, track, config());
        assert_eq!(action, Some(SyncAction::Seek(5.0)));
    }

    #[test]
    fn music_seek_target_wraps_when_the_video_is_longer() {
        let track = AuxTrackState {
            duration: 8.0,
            position: 0.5,
        };
        let action = music_action(10.0, 20.0, track, config());
        assert_eq!(action, Some(SyncAction::Seek(2.0)));
    }

    #[test]
    fn music_within_tolerance_needs_no_action() {
        let track = AuxTrackState {
            duration: 30.0,
            position: 4.5,
        };
        assert_eq!(music_action(5.0, 20.0, track, config()), None);
    }

    #[test]
    fn music_rewinds_when_the_video_restarts() {
        let track = AuxTrackState {
            duration: 30.0,
            position: 14.0,
        };
        let action = music_action(0.2, 20.0, track, config());
        assert_eq!(action, Some(SyncAction::Rewind));
    }

    #[test]
    fn voice_pauses_at_video_end_and_rewinds_on_restart() {
        let track = AuxTrackState {
            duration: 20.0,
            position: 19.9,
        };
        assert_eq!(
            voice_action(19.95, 20.0, track, config()),
            Some(SyncAction::Pause)
        );

        let rewound = AuxTrackState {
            duration: 20.0,
            position: 15.0,
        };
        assert_eq!(
            voice_action(0.1, 20.0, rewound, config()),
            Some(SyncAction::Rewind)
        );
        assert_eq!(voice_action(10.0, 20.0, rewound, config()), None);
    }
}
