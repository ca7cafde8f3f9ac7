use serde::{Deserialize, Serialize};
use tracing::debug;

/// Merge tolerance in seconds. Two kept intervals whose boundaries land
/// within this distance are treated as touching and merged, absorbing
/// floating-point and frame-rounding flutter from slider input.
pub const MERGE_TOLERANCE: f64 = 0.001;

/// One kept interval of absolute source time, in seconds.
///
/// A segment means "this slice of the original recording stays in the
/// edited output". Invariant: `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    /// Creates a segment without validation; callers normalize afterwards.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the kept interval in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Returns true when `at` lies inside the interval, boundaries included.
    pub fn contains(&self, at: f64) -> bool {
        at >= self.start && at <= self.end
    }
}

/// Ordered, non-overlapping list of kept intervals over one source video.
///
/// The list is the sole authoritative representation of the edited timeline.
/// Every mutation rebuilds the whole list through [`SegmentList::normalize`]
/// rather than patching entries in place, so a valid state can never be
/// reached by accident.
///
/// # Example
/// ```
/// use engine::segments::{Segment, SegmentList};
///
/// let list = SegmentList::normalize(vec![Segment::new(5.0, 10.0), Segment::new(0.0, 5.0)]);
/// assert_eq!(list.as_slice(), &[Segment::new(0.0, 10.0)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentList {
    segments: Vec<Segment>,
}

impl SegmentList {
    /// Builds a valid list from raw, possibly overlapping intervals.
    ///
    /// Bounds are clamped non-negative, degenerate intervals (`end <= start`)
    /// are dropped, the remainder is sorted by start and merged left to right
    /// whenever two intervals touch within [`MERGE_TOLERANCE`].
    ///
    /// Idempotent: normalizing an already-normalized list returns it as is.
    pub fn normalize(raw: Vec<Segment>) -> Self {
        let mut cleaned: Vec<Segment> = raw
            .into_iter()
            .map(|segment| Segment::new(segment.start.max(0.0), segment.end.max(0.0)))
            .filter(|segment| segment.end > segment.start)
            .collect();
        cleaned.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut merged = Vec::with_capacity(cleaned.len());
        for segment in cleaned {
            let Some(last) = merged.last_mut() else {
                merged.push(segment);
                continue;
            };
            if segment.start <= last.end + MERGE_TOLERANCE {
                last.end = last.end.max(segment.end);
            } else {
                merged.push(segment);
            }
        }

        Self { segments: merged }
    }

    /// Resets the list to a single segment covering the whole source.
    ///
    /// Used on initial load and whenever a trim is confirmed.
    pub fn full_range(source_duration: f64) -> Self {
        Self::normalize(vec![Segment::new(0.0, source_duration)])
    }

    /// Replaces the whole list with one kept range `[start, end]`.
    ///
    /// `start` is clamped into `[0, source_duration]` and `end` into
    /// `[start, source_duration]`. Any prior split/delete history is
    /// discarded; confirming a trim commits a fresh baseline.
    pub fn trim(start: f64, end: f64, source_duration: f64) -> Self {
        let start = start.clamp(0.0, source_duration);
        let end = end.clamp(start, source_duration);
        debug!(start, end, "trim baseline established");
        Self::normalize(vec![Segment::new(start, end)])
    }

    /// Splits every segment strictly containing `at` into two segments
    /// touching at `at`. A cut point on a boundary or inside a gap changes
    /// nothing.
    ///
    /// The cut pieces touch exactly, so the merge pass would heal them
    /// straight back; the list is rebuilt directly instead. Ordering and
    /// disjointness carry over from the input, and both pieces are
    /// non-degenerate because the containment check is strict.
    pub fn split_at(&self, at: f64) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        for segment in &self.segments {
            if at <= segment.start || at >= segment.end {
                segments.push(*segment);
            } else {
                segments.push(Segment::new(segment.start, at));
                segments.push(Segment::new(at, segment.end));
            }
        }
        let out = Self { segments };
        debug!(at, segment_count = out.len(), "split applied");
        out
    }

    /// Removes `[start, end]` from every kept interval, emitting up to two
    /// remainder pieces per overlapped segment. Degenerate pieces are
    /// discarded by normalization. The result may be empty; the caller
    /// treats that as "no playable content" rather than an error.
    pub fn delete_range(&self, start: f64, end: f64, source_duration: f64) -> Self {
        let start = start.clamp(0.0, source_duration);
        let end = end.clamp(start, source_duration);

        let mut raw = Vec::with_capacity(self.segments.len() + 1);
        for segment in &self.segments {
            if end <= segment.start || start >= segment.end {
                raw.push(*segment);
                continue;
            }
            if start > segment.start {
                raw.push(Segment::new(segment.start, start.min(segment.end)));
            }
            if end < segment.end {
                raw.push(Segment::new(end.max(segment.start), segment.end));
            }
        }
        let out = Self::normalize(raw);
        debug!(start, end, remaining = out.len(), "delete applied");
        out
    }

    /// Finds the segment containing `at`, else the next segment after `at`,
    /// else the last segment. `None` only for an empty list.
    pub fn index_at_or_after(&self, at: f64) -> Option<usize> {
        if let Some(index) = self.segments.iter().position(|segment| segment.contains(at)) {
            return Some(index);
        }
        if let Some(index) = self.segments.iter().position(|segment| segment.start > at) {
            return Some(index);
        }
        self.segments.len().checked_sub(1)
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }
}

#[cfg(test)]
mod tests {
    use super::{Segment, SegmentList};

    #[test]
    fn normalize_sorts_clamps_and_drops_degenerate_intervals() {
        let list = SegmentList::normalize(vec![
            Segment::new(8.0, 12.0),
            Segment::new(-2.0, 3.0),
            Segment::new(6.0, 6.0),
            Segment::new(5.0, 4.0),
        ]);

        assert_eq!(
            list.as_slice(),
            &[Segment::new(0.0, 3.0), Segment::new(8.0, 12.0)]
        );
    }

    #[test]
    fn normalize_merges_touching_segments() {
        let list = SegmentList::normalize(vec![Segment::new(0.0, 5.0), Segment::new(5.0, 10.0)]);
        assert_eq!(list.as_slice(), &[Segment::new(0.0, 10.0)]);
    }

    #[test]
    fn normalize_merges_segments_within_tolerance() {
        let list =
            SegmentList::normalize(vec![Segment::new(0.0, 5.0), Segment::new(5.0005, 10.0)]);
        assert_eq!(list.as_slice(), &[Segment::new(0.0, 10.0)]);
    }

    #[test]
    fn normalize_keeps_segments_separated_by_a_real_gap() {
        let list = SegmentList::normalize(vec![Segment::new(0.0, 5.0), Segment::new(5.01, 10.0)]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = vec![
            Segment::new(3.0, 7.0),
            Segment::new(0.0, 4.0),
            Segment::new(9.0, 11.0),
        ];
        let once = SegmentList::normalize(raw);
        let twice = SegmentList::normalize(once.as_slice().to_vec());
        assert_eq!(once, twice);
    }

    #[test]
    fn split_inside_a_segment_yields_two_touching_pieces() {
        let list = SegmentList::full_range(10.0).split_at(4.0);
        assert_eq!(
            list.as_slice(),
            &[Segment::new(0.0, 4.0), Segment::new(4.0, 10.0)]
        );
    }

    #[test]
    fn split_at_segment_boundary_is_a_no_op() {
        let list = SegmentList::full_range(10.0);
        assert_eq!(list.split_at(0.0), list);
        assert_eq!(list.split_at(10.0), list);
    }

    #[test]
    fn split_inside_a_gap_is_a_no_op() {
        let list = SegmentList::normalize(vec![Segment::new(0.0, 3.0), Segment::new(7.0, 10.0)]);
        assert_eq!(list.split_at(5.0), list);
    }

    #[test]
    fn delete_middle_range_leaves_two_remainders() {
        let list = SegmentList::full_range(10.0).delete_range(3.0, 7.0, 10.0);
        assert_eq!(
            list.as_slice(),
            &[Segment::new(0.0, 3.0), Segment::new(7.0, 10.0)]
        );
    }

    #[test]
    fn delete_full_range_empties_the_list() {
        let list = SegmentList::full_range(10.0).delete_range(0.0, 10.0, 10.0);
        assert!(list.is_empty());
    }

    #[test]
    fn delete_range_spanning_two_segments_trims_both() {
        let list = SegmentList::normalize(vec![Segment::new(0.0, 4.0), Segment::new(6.0, 10.0)])
            .delete_range(2.0, 8.0, 10.0);
        assert_eq!(
            list.as_slice(),
            &[Segment::new(0.0, 2.0), Segment::new(8.0, 10.0)]
        );
    }

    #[test]
    fn delete_range_outside_all_segments_changes_nothing() {
        let list = SegmentList::normalize(vec![Segment::new(0.0, 3.0), Segment::new(7.0, 10.0)]);
        assert_eq!(list.delete_range(4.0, 6.0, 10.0), list);
    }

    #[test]
    fn trim_discards_prior_split_history() {
        let split = SegmentList::full_range(10.0).split_at(5.0);
        assert_eq!(split.len(), 2);

        let trimmed = SegmentList::trim(2.0, 8.0, 10.0);
        assert_eq!(trimmed.as_slice(), &[Segment::new(2.0, 8.0)]);
    }

    #[test]
    fn trim_clamps_bounds_into_the_source_duration() {
        let list = SegmentList::trim(-3.0, 99.0, 10.0);
        assert_eq!(list.as_slice(), &[Segment::new(0.0, 10.0)]);
    }

    #[test]
    fn index_at_or_after_prefers_containing_then_next_then_last() {
        let list = SegmentList::normalize(vec![Segment::new(0.0, 5.0), Segment::new(10.0, 15.0)]);

        assert_eq!(list.index_at_or_after(3.0), Some(0));
        assert_eq!(list.index_at_or_after(7.0), Some(1));
        assert_eq!(list.index_at_or_after(20.0), Some(1));
        assert_eq!(SegmentList::default().index_at_or_after(0.0), None);
    }
}
