use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::segments::SegmentList;

/// Pre-boundary tolerance in seconds. Advancing slightly before a segment's
/// end keeps a single late tick from overshooting into discarded material.
pub const END_SNAP_EPSILON: f64 = 0.05;

/// Tunable tolerances for per-tick cursor correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampConfig {
    pub end_snap_epsilon: f64,
}

impl Default for ClampConfig {
    fn default() -> Self {
        Self {
            end_snap_epsilon: END_SNAP_EPSILON,
        }
    }
}

/// Simple kept window used when no segment list is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimWindow {
    pub start: f64,
    pub end: f64,
}

impl TrimWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Per-tick corrector keeping the playback cursor inside kept territory.
///
/// Conceptually this plays a playlist of disjoint source intervals
/// back-to-back with wraparound. The decision is re-derived from the current
/// segment list on every call because the list can change between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackClamp {
    config: ClampConfig,
}

impl PlaybackClamp {
    pub fn new(config: ClampConfig) -> Self {
        Self { config }
    }

    /// Returns the corrected absolute position for the reported one.
    ///
    /// With a non-empty list: a position in a gap snaps forward to the next
    /// segment's start; a position past all segments restarts at the first
    /// segment; within [`ClampConfig::end_snap_epsilon`] of a segment's end
    /// the cursor advances to the next segment, looping to the first from
    /// the last. With an empty list the plain trim window applies, with the
    /// same start snap and loop-at-end behavior.
    ///
    /// The caller writes the result back to the player only when it differs
    /// from the reported position, avoiding redundant seeks.
    pub fn correct(&self, position: f64, segments: &SegmentList, window: TrimWindow) -> f64 {
        if segments.is_empty() {
            return self.correct_in_window(position, window);
        }

        let Some(index) = segments.index_at_or_after(position) else {
            return position;
        };
        let segment = segments.as_slice()[index];

        if position < segment.start {
            debug!(
                position,
                to = segment.start,
                "cursor outside kept range, snapping to segment start"
            );
            return segment.start;
        }

        if position >= segment.end - self.config.end_snap_epsilon {
            let next_index = if index + 1 < segments.len() { index + 1 } else { 0 };
            let next_start = segments.as_slice()[next_index].start;
            debug!(position, to = next_start, "segment end reached, advancing");
            return next_start;
        }

        position
    }

    fn correct_in_window(&self, position: f64, window: TrimWindow) -> f64 {
        if window.end <= window.start {
            return position;
        }
        if position < window.start {
            debug!(position, to = window.start, "cursor before trim window");
            return window.start;
        }
        if position >= window.end - self.config.end_snap_epsilon {
            debug!(position, to = window.start, "trim window end reached, looping");
            return window.start;
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use super::{PlaybackClamp, TrimWindow};
    use crate::segments::{Segment, SegmentList};

    fn two_segments() -> SegmentList {
        SegmentList::normalize(vec![Segment::new(0.0, 5.0), Segment::new(10.0, 15.0)])
    }

    fn window() -> TrimWindow {
        TrimWindow::new(0.0, 20.0)
    }

    #[test]
    fn position_inside_a_segment_is_unchanged() {
        let clamp = PlaybackClamp::default();
        assert_eq!(clamp.correct(3.0, &two_segments(), window()), 3.0);
        assert_eq!(clamp.correct(12.0, &two_segments(), window()), 12.0);
    }

    #[test]
    fn position_in_a_gap_snaps_to_the_next_segment_start() {
        let clamp = PlaybackClamp::default();
        assert_eq!(clamp.correct(7.0, &two_segments(), window()), 10.0);
    }

    #[test]
    fn near_segment_end_advances_to_the_next_segment() {
        let clamp = PlaybackClamp::default();
        assert_eq!(clamp.correct(4.97, &two_segments(), window()), 10.0);
    }

    #[test]
    fn near_last_segment_end_loops_to_the_first_segment() {
        let clamp = PlaybackClamp::default();
        assert_eq!(clamp.correct(14.97, &two_segments(), window()), 0.0);
    }

    #[test]
    fn past_all_segments_restarts_at_the_first_segment() {
        let clamp = PlaybackClamp::default();
        assert_eq!(clamp.correct(19.0, &two_segments(), window()), 0.0);
    }

    #[test]
    fn before_the_first_segment_snaps_to_its_start() {
        let segments = SegmentList::normalize(vec![Segment::new(2.0, 8.0)]);
        let clamp = PlaybackClamp::default();
        assert_eq!(clamp.correct(0.5, &segments, window()), 2.0);
    }

    #[test]
    fn empty_list_clamps_into_the_trim_window() {
        let clamp = PlaybackClamp::default();
        let empty = SegmentList::default();
        let window = TrimWindow::new(2.0, 8.0);

        assert_eq!(clamp.correct(1.0, &empty, window), 2.0);
        assert_eq!(clamp.correct(5.0, &empty, window), 5.0);
        assert_eq!(clamp.correct(7.96, &empty, window), 2.0);
    }

    #[test]
    fn degenerate_trim_window_leaves_the_position_alone() {
        let clamp = PlaybackClamp::default();
        let empty = SegmentList::default();
        assert_eq!(clamp.correct(5.0, &empty, TrimWindow::new(8.0, 8.0)), 5.0);
    }
}
