//! Projections between absolute source time and virtual (edited) time.
//!
//! Virtual time runs gap-free through the kept segments in order: virtual 0
//! is the start of the first segment, and gaps contribute nothing. Nothing
//! here is stored; both directions are derived on demand from the segment
//! list.

use crate::segments::SegmentList;

/// Maps an absolute source timestamp into virtual time.
///
/// Inside a kept segment the mapping is exact. Inside a gap (or before the
/// first segment) the result is the virtual position immediately after the
/// previous kept segment. At or past the last segment's end the result is
/// the full virtual duration.
pub fn to_virtual(absolute: f64, segments: &SegmentList) -> f64 {
    let mut accumulated = 0.0;
    for segment in segments.iter() {
        if absolute < segment.start {
            break;
        }
        if absolute <= segment.end {
            return accumulated + (absolute - segment.start);
        }
        accumulated += segment.duration();
    }
    accumulated
}

/// Maps a virtual timestamp back into absolute source time.
///
/// Past the total virtual duration the result clamps to the last segment's
/// end. With no segments at all the raw input is clamped into
/// `[0, source_duration]`.
pub fn to_absolute(virtual_time: f64, segments: &SegmentList, source_duration: f64) -> f64 {
    let mut remaining = virtual_time;
    for segment in segments.iter() {
        let length = segment.duration();
        if remaining <= length {
            return segment.start + remaining;
        }
        remaining -= length;
    }
    match segments.last() {
        Some(last) => last.end,
        None => virtual_time.clamp(0.0, source_duration),
    }
}

/// Total edited duration: the sum of kept segment lengths.
pub fn virtual_duration(segments: &SegmentList) -> f64 {
    segments.iter().map(|segment| segment.duration()).sum()
}
