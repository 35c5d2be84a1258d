//! # Chord Timeline
//!
//! An ordered, non-overlapping sequence of labeled half-open time ranges describing
//! which chord sounds at which point of a track.
//!
//! A timeline is built once per analyzed upload and never mutated afterwards; a new
//! upload replaces it wholesale. Construction checks every invariant, so a value of
//! type [`ChordTimeline`] is always sorted and free of overlaps.
//!
//! ## Wire Format
//! ```json
//! { "chords": [ { "startSec": 0.0, "endSec": 2.0, "label": "C" } ] }
//! ```
//!
//! ## Lookup
//! [`ChordTimeline::active_interval_at`] answers "which chord is playing at `t`?".
//! When no interval contains `t`, the answer depends on the [`FallbackPolicy`]:
//!
//! | Position of `t`        | `Last`        | `NearestPreceding` |
//! |------------------------|---------------|--------------------|
//! | inside an interval     | that interval | that interval      |
//! | in a gap               | last interval | interval before    |
//! | before the first start | last interval | `None`             |
//! | past the last end      | last interval | last interval      |
//!
//! `Last` is what the player has always shown. It conflates "not started yet" with
//! "finished", which is why `NearestPreceding` exists as an explicit alternative.

use serde::{Deserialize, Serialize};

use crate::chords::ChordLabel;
use crate::error::TimelineError;

/// A half-open range `[start_sec, end_sec)` labeled with a chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub start_sec: f64,
    pub end_sec: f64,
    pub label: ChordLabel,
}

impl Interval {
    pub fn new(start_sec: f64, end_sec: f64, label: impl Into<ChordLabel>) -> Self {
        Interval {
            start_sec,
            end_sec,
            label: label.into(),
        }
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_sec && t < self.end_sec
    }

    pub fn duration(&self) -> f64 {
        self.end_sec - self.start_sec
    }
}

/// What to return when the queried time falls outside every interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackPolicy {
    /// Any miss resolves to the final interval.
    #[default]
    Last,
    /// Misses resolve to the closest interval that started before `t`,
    /// or `None` when nothing has started yet.
    NearestPreceding,
}

#[derive(Deserialize)]
struct TimelineDocument {
    chords: Vec<Interval>,
}

/// Validated chord timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChordTimeline {
    #[serde(rename = "chords")]
    intervals: Vec<Interval>,
}

impl ChordTimeline {
    /// Build a timeline, checking bounds, ordering and overlap.
    ///
    /// # Errors
    /// - [`TimelineError::InvalidInterval`] for NaN/infinite bounds or `start >= end`
    /// - [`TimelineError::Unordered`] when starts are not ascending
    /// - [`TimelineError::Overlap`] when an interval begins before the previous one ends
    pub fn new(intervals: Vec<Interval>) -> Result<Self, TimelineError> {
        for (index, interval) in intervals.iter().enumerate() {
            // Zero-length intervals are rejected too, including the single-frame tail
            // segment a detector can emit; the whole timeline is then malformed.
            if !interval.start_sec.is_finite()
                || !interval.end_sec.is_finite()
                || interval.start_sec >= interval.end_sec
            {
                return Err(TimelineError::InvalidInterval {
                    index,
                    start_sec: interval.start_sec,
                    end_sec: interval.end_sec,
                });
            }

            if index == 0 {
                continue;
            }
            let previous = &intervals[index - 1];
            if interval.start_sec < previous.start_sec {
                return Err(TimelineError::Unordered {
                    index,
                    start_sec: interval.start_sec,
                    previous_start_sec: previous.start_sec,
                });
            }
            if interval.start_sec < previous.end_sec {
                return Err(TimelineError::Overlap {
                    index,
                    start_sec: interval.start_sec,
                    previous_end_sec: previous.end_sec,
                });
            }
        }

        Ok(ChordTimeline { intervals })
    }

    pub fn empty() -> Self {
        ChordTimeline::default()
    }

    /// Parse and validate the `{ "chords": [...] }` wire document.
    pub fn from_json(json: &str) -> Result<Self, TimelineError> {
        let doc: TimelineDocument = serde_json::from_str(json)?;
        ChordTimeline::new(doc.chords)
    }

    /// Same as [`ChordTimeline::from_json`] for an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, TimelineError> {
        let doc: TimelineDocument = serde_json::from_value(value)?;
        ChordTimeline::new(doc.chords)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"chords":[]}"#.to_string())
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn last(&self) -> Option<&Interval> {
        self.intervals.last()
    }

    /// End of the final interval, or `0.0` for an empty timeline.
    pub fn duration(&self) -> f64 {
        self.intervals.last().map(|i| i.end_sec).unwrap_or(0.0)
    }

    /// Distinct labels in order of first appearance.
    pub fn unique_labels(&self) -> Vec<&ChordLabel> {
        let mut seen: Vec<&ChordLabel> = Vec::new();
        for interval in &self.intervals {
            if !seen.contains(&&interval.label) {
                seen.push(&interval.label);
            }
        }
        seen
    }

    /// The interval active at `t`, falling back to the last interval on a miss.
    ///
    /// # Example
    /// ```
    /// use track2tabs::{ChordTimeline, Interval};
    ///
    /// let timeline = ChordTimeline::new(vec![
    ///     Interval::new(0.0, 2.0, "C"),
    ///     Interval::new(2.0, 4.0, "G"),
    /// ]).unwrap();
    ///
    /// assert_eq!(timeline.active_interval_at(1.5).unwrap().label.as_str(), "C");
    /// assert_eq!(timeline.active_interval_at(3.9).unwrap().label.as_str(), "G");
    /// assert_eq!(timeline.active_interval_at(10.0).unwrap().label.as_str(), "G");
    /// ```
    pub fn active_interval_at(&self, t: f64) -> Option<&Interval> {
        self.active_interval_with(t, FallbackPolicy::Last)
    }

    /// The interval active at `t` under an explicit fallback policy.
    pub fn active_interval_with(&self, t: f64, policy: FallbackPolicy) -> Option<&Interval> {
        let last = self.intervals.last()?;

        // Number of intervals that started at or before t. Starts are sorted, and
        // because intervals never overlap only the last of those can contain t.
        let started = self.intervals.partition_point(|i| i.start_sec <= t);
        if started > 0 {
            let candidate = &self.intervals[started - 1];
            if candidate.contains(t) {
                return Some(candidate);
            }
        }

        match policy {
            FallbackPolicy::Last => Some(last),
            FallbackPolicy::NearestPreceding => {
                if started == 0 {
                    None
                } else {
                    Some(&self.intervals[started - 1])
                }
            }
        }
    }
}

/// Free-function form of [`ChordTimeline::active_interval_at`].
pub fn active_interval_at(timeline: &ChordTimeline, t: f64) -> Option<&Interval> {
    timeline.active_interval_at(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_chords() -> ChordTimeline {
        ChordTimeline::new(vec![Interval::new(0.0, 2.0, "C"), Interval::new(2.0, 4.0, "G")]).unwrap()
    }

    fn with_gaps() -> ChordTimeline {
        ChordTimeline::new(vec![
            Interval::new(1.0, 2.0, "Am"),
            Interval::new(3.0, 4.0, "F"),
            Interval::new(4.0, 6.0, "C"),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_inside_intervals() {
        let timeline = two_chords();
        assert_eq!(timeline.active_interval_at(0.0).unwrap().label, ChordLabel::C);
        assert_eq!(timeline.active_interval_at(1.5).unwrap(), &Interval::new(0.0, 2.0, "C"));
        // Half-open: the boundary belongs to the next interval
        assert_eq!(timeline.active_interval_at(2.0).unwrap().label, ChordLabel::G);
        assert_eq!(timeline.active_interval_at(3.9).unwrap(), &Interval::new(2.0, 4.0, "G"));
    }

    #[test]
    fn test_every_point_resolves_to_its_interval() {
        let timeline = with_gaps();
        for interval in timeline.intervals() {
            let mut t = interval.start_sec;
            while t < interval.end_sec {
                assert_eq!(timeline.active_interval_at(t), Some(interval));
                t += 0.1;
            }
        }
    }

    #[test]
    fn test_past_end_falls_back_to_last() {
        let timeline = two_chords();
        assert_eq!(timeline.active_interval_at(4.0).unwrap().label, ChordLabel::G);
        assert_eq!(timeline.active_interval_at(10.0).unwrap().label, ChordLabel::G);
    }

    #[test]
    fn test_gap_and_before_start_fall_back_to_last() {
        let timeline = with_gaps();
        assert_eq!(timeline.active_interval_at(0.5).unwrap().label, ChordLabel::C);
        assert_eq!(timeline.active_interval_at(2.5).unwrap().label, ChordLabel::C);
        assert_eq!(timeline.active_interval_at(-3.0).unwrap().label, ChordLabel::C);
    }

    #[test]
    fn test_nearest_preceding_policy() {
        let timeline = with_gaps();
        let policy = FallbackPolicy::NearestPreceding;
        assert_eq!(timeline.active_interval_with(0.5, policy), None);
        assert_eq!(timeline.active_interval_with(2.5, policy).unwrap().label, ChordLabel::Am);
        assert_eq!(timeline.active_interval_with(3.5, policy).unwrap().label, ChordLabel::F);
        assert_eq!(timeline.active_interval_with(99.0, policy).unwrap().label, ChordLabel::C);
    }

    #[test]
    fn test_empty_timeline_returns_none() {
        let timeline = ChordTimeline::empty();
        for t in [-1.0, 0.0, 3.0, f64::MAX] {
            assert_eq!(timeline.active_interval_at(t), None);
            assert_eq!(timeline.active_interval_with(t, FallbackPolicy::NearestPreceding), None);
        }
    }

    #[test]
    fn test_nan_position_falls_back() {
        let timeline = two_chords();
        assert_eq!(timeline.active_interval_at(f64::NAN).unwrap().label, ChordLabel::G);
    }

    #[test]
    fn test_lookup_is_idempotent_under_seeks() {
        let timeline = with_gaps();
        let positions = [5.0, 1.2, 3.3, 0.0, 5.9, 1.2];
        let first: Vec<_> = positions.iter().map(|t| timeline.active_interval_at(*t).cloned()).collect();
        let second: Vec<_> = positions.iter().map(|t| timeline.active_interval_at(*t).cloned()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_empty_or_inverted_interval() {
        let err = ChordTimeline::new(vec![Interval::new(1.0, 1.0, "C")]).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidInterval { index: 0, .. }));

        let err = ChordTimeline::new(vec![
            Interval::new(0.0, 1.0, "C"),
            Interval::new(3.0, 2.0, "G"),
        ])
        .unwrap_err();
        assert!(matches!(err, TimelineError::InvalidInterval { index: 1, .. }));
    }

    #[test]
    fn test_zero_length_tail_segment_is_rejected() {
        // Single-frame audio: the closing segment starts and ends on the last frame
        let json = r#"{"chords":[
            {"label":"C","startSec":0.0,"endSec":0.0929},
            {"label":"G","startSec":0.0929,"endSec":0.0929}
        ]}"#;
        let err = ChordTimeline::from_json(json).unwrap_err();
        assert_eq!(
            err,
            TimelineError::InvalidInterval {
                index: 1,
                start_sec: 0.0929,
                end_sec: 0.0929,
            }
        );
    }

    #[test]
    fn test_rejects_non_finite_bounds() {
        let err = ChordTimeline::new(vec![Interval::new(f64::NAN, 1.0, "C")]).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidInterval { .. }));
        let err = ChordTimeline::new(vec![Interval::new(0.0, f64::INFINITY, "C")]).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidInterval { .. }));
    }

    #[test]
    fn test_rejects_unordered_and_overlapping() {
        let err = ChordTimeline::new(vec![
            Interval::new(2.0, 3.0, "C"),
            Interval::new(0.0, 1.0, "G"),
        ])
        .unwrap_err();
        assert!(matches!(err, TimelineError::Unordered { index: 1, .. }));

        let err = ChordTimeline::new(vec![
            Interval::new(0.0, 2.5, "C"),
            Interval::new(2.0, 3.0, "G"),
        ])
        .unwrap_err();
        assert!(matches!(err, TimelineError::Overlap { index: 1, .. }));
    }

    #[test]
    fn test_json_wire_format() {
        let json = r#"{"chords":[{"label":"C","startSec":0.0,"endSec":2.0},{"label":"F#m","startSec":2.0,"endSec":3.5}]}"#;
        let timeline = ChordTimeline::from_json(json).unwrap();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.intervals()[1].label, ChordLabel::Other("F#m".to_string()));
        assert_eq!(timeline.duration(), 3.5);

        let out: serde_json::Value = serde_json::from_str(&timeline.to_json()).unwrap();
        assert_eq!(out["chords"][0]["startSec"], 0.0);
        assert_eq!(out["chords"][1]["label"], "F#m");
    }

    #[test]
    fn test_json_missing_chords_is_error() {
        let err = ChordTimeline::from_json(r#"{"detail":"nope"}"#).unwrap_err();
        assert!(matches!(err, TimelineError::Json(_)));
    }

    #[test]
    fn test_unique_labels_in_first_appearance_order() {
        let timeline = ChordTimeline::new(vec![
            Interval::new(0.0, 1.0, "G"),
            Interval::new(1.0, 2.0, "C"),
            Interval::new(2.0, 3.0, "G"),
            Interval::new(3.0, 4.0, "D"),
            Interval::new(4.0, 5.0, "C"),
        ])
        .unwrap();
        let labels: Vec<&str> = timeline.unique_labels().iter().map(|l| l.as_str()).collect();
        assert_eq!(labels, vec!["G", "C", "D"]);
    }
}
