//! # Error Types
//!
//! This module defines the error type for building chord timelines.
//!
//! Every structural error names the zero-based index of the offending interval so the
//! caller can point at the exact entry of a backend response.
//!
//! ## Error Types
//! - `InvalidInterval` - An interval whose bounds are not finite or not increasing
//! - `Unordered` - An interval that starts before its predecessor
//! - `Overlap` - An interval that starts before its predecessor has ended
//! - `Json` - The wire payload is not a valid `{ "chords": [...] }` document
//!
//! ## Usage
//! ```rust
//! use track2tabs::{ChordTimeline, TimelineError};
//!
//! let json = r#"{"chords":[{"startSec":2.0,"endSec":1.0,"label":"C"}]}"#;
//! match ChordTimeline::from_json(json) {
//!     Ok(timeline) => println!("{} chords", timeline.len()),
//!     Err(TimelineError::InvalidInterval { index, .. }) => {
//!         eprintln!("chord #{} has bad bounds", index);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Interval bounds are not finite, or `start_sec >= end_sec`.
    ///
    /// # Example
    /// ```
    /// # use track2tabs::TimelineError;
    /// let err = TimelineError::InvalidInterval { index: 3, start_sec: 4.0, end_sec: 4.0 };
    /// assert_eq!(err.to_string(), "Invalid interval #3: start 4s must be before end 4s");
    /// ```
    #[error("Invalid interval #{index}: start {start_sec}s must be before end {end_sec}s")]
    InvalidInterval {
        index: usize,
        start_sec: f64,
        end_sec: f64,
    },

    /// Interval starts earlier than the interval before it.
    #[error("Interval #{index} starts at {start_sec}s, before the previous start at {previous_start_sec}s")]
    Unordered {
        index: usize,
        start_sec: f64,
        previous_start_sec: f64,
    },

    /// Interval starts before the previous interval has ended.
    ///
    /// Gaps between intervals are allowed; overlaps are not.
    #[error("Interval #{index} starts at {start_sec}s, overlapping the previous interval ending at {previous_end_sec}s")]
    Overlap {
        index: usize,
        start_sec: f64,
        previous_end_sec: f64,
    },

    /// The payload could not be decoded as a timeline document.
    #[error("Invalid timeline JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for TimelineError {
    fn from(e: serde_json::Error) -> Self {
        TimelineError::Json(e.to_string())
    }
}
