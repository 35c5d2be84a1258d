//! # Playback Module
//!
//! Bridge a playback-time signal to discrete chord notifications.
//!
//! ## Purpose
//! The media element reports its current time many times per second. This module turns
//! that stream of positions into events the UI can render:
//! 1. **Chord** - the interval active at the reported position
//! 2. **NoChord** - nothing to show (empty timeline, or a miss under
//!    [`FallbackPolicy::NearestPreceding`](crate::FallbackPolicy)), so stale display
//!    must be cleared
//!
//! ## Sub-modules
//! - `types` - SyncEvent and EmitMode
//! - `source` - PositionSource trait and a stepped clock for simulated playback
//! - `synchronizer` - PlaybackSynchronizer and the Renderer seam
//!
//! ## Example
//! ```rust
//! use track2tabs::{ChordTimeline, Interval};
//! use track2tabs::playback::{PlaybackSynchronizer, SyncEvent};
//!
//! let timeline = ChordTimeline::new(vec![
//!     Interval::new(0.0, 2.0, "C"),
//!     Interval::new(2.0, 4.0, "G"),
//! ]).unwrap();
//!
//! let mut sync = PlaybackSynchronizer::new();
//! let mut rendered: Vec<SyncEvent> = Vec::new();
//! let emitted = sync.drive(&timeline, vec![0.5, 1.0, 2.5].into_iter(), &mut rendered);
//!
//! assert_eq!(emitted, 3);
//! assert_eq!(rendered[2].label(), Some("G"));
//! ```
//!
//! ## Update Cadence
//!
//! Positions are not produced on a timer here. Whatever drives playback pushes them in
//! (`on_position`) or the synchronizer pulls them from a [`PositionSource`] (`drive`).
//! Tests use a fixed list of positions, so seeks, resets and jumps are fully scripted.

mod types;
mod source;
mod synchronizer;


pub use types::{EmitMode, SyncEvent};
pub use source::{PositionSource, SteppedClock};
pub use synchronizer::{PlaybackSynchronizer, Renderer};
