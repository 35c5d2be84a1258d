//! # Playback Session
//!
//! All per-track state of the player in one place: the current timeline, the
//! synchronizer that reads it, and the bookkeeping that keeps a slow upload from
//! clobbering a newer one.
//!
//! ## Upload Generations
//! Every upload is tagged with a generation number when it starts. Only the result of
//! the most recently started upload is applied; anything older is discarded when it
//! arrives, whatever order the responses come back in.
//!
//! ```rust
//! use track2tabs::{ChordTimeline, Interval, Session, UploadOutcome};
//!
//! let mut session = Session::new();
//! let slow = session.begin_upload();
//! let fast = session.begin_upload();
//!
//! let fresh = ChordTimeline::new(vec![Interval::new(0.0, 1.0, "D")]).unwrap();
//! let stale = ChordTimeline::new(vec![Interval::new(0.0, 1.0, "E")]).unwrap();
//!
//! assert_eq!(session.complete_upload(fast, Ok::<_, String>(fresh)), UploadOutcome::Applied);
//! assert_eq!(session.complete_upload(slow, Ok::<_, String>(stale)), UploadOutcome::Superseded);
//! assert_eq!(session.timeline().intervals()[0].label.as_str(), "D");
//! ```

use crate::playback::{EmitMode, PlaybackSynchronizer, Renderer, SyncEvent};
use crate::timeline::{ChordTimeline, FallbackPolicy, Interval};

/// Handle for one in-flight upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadTicket {
    generation: u64,
}

impl UploadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rebuild a ticket from a generation number that crossed an FFI boundary.
    pub fn from_generation(generation: u64) -> Self {
        UploadTicket { generation }
    }
}

/// What [`Session::complete_upload`] did with a result.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The result belonged to the latest upload and is now the current timeline.
    Applied,
    /// A newer upload was started after this one; the result was dropped.
    Superseded,
    /// The latest upload failed. The previous timeline stays in place.
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    timeline: ChordTimeline,
    sync: PlaybackSynchronizer,
    latest_generation: u64,
    pending: bool,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn with_synchronizer(sync: PlaybackSynchronizer) -> Self {
        Session {
            sync,
            ..Session::default()
        }
    }

    pub fn with_options(policy: FallbackPolicy, mode: EmitMode) -> Self {
        Session::with_synchronizer(PlaybackSynchronizer::new().with_policy(policy).with_mode(mode))
    }

    pub fn timeline(&self) -> &ChordTimeline {
        &self.timeline
    }

    pub fn synchronizer(&self) -> &PlaybackSynchronizer {
        &self.sync
    }

    /// Whether the latest upload is still waiting for its result.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Replace the timeline directly, outside the upload flow.
    ///
    /// Any in-flight upload is superseded.
    pub fn load_timeline(&mut self, timeline: ChordTimeline) {
        self.latest_generation += 1;
        self.pending = false;
        self.install(timeline);
    }

    /// Register a new upload. Every earlier ticket becomes stale.
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.latest_generation += 1;
        self.pending = true;
        log::debug!("Upload generation {} started", self.latest_generation);
        UploadTicket {
            generation: self.latest_generation,
        }
    }

    pub fn is_current(&self, ticket: UploadTicket) -> bool {
        ticket.generation == self.latest_generation
    }

    /// Deliver the result of an upload.
    ///
    /// Stale tickets are ignored regardless of whether their result is `Ok` or `Err`.
    pub fn complete_upload<E: ToString>(
        &mut self,
        ticket: UploadTicket,
        result: Result<ChordTimeline, E>,
    ) -> UploadOutcome {
        if !self.is_current(ticket) || !self.pending {
            log::debug!(
                "Dropping result of upload generation {} (latest is {})",
                ticket.generation,
                self.latest_generation
            );
            return UploadOutcome::Superseded;
        }
        self.pending = false;

        match result {
            Ok(timeline) => {
                log::info!(
                    "Upload generation {} applied: {} chords",
                    ticket.generation,
                    timeline.len()
                );
                self.install(timeline);
                UploadOutcome::Applied
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("Upload generation {} failed: {}", ticket.generation, message);
                UploadOutcome::Failed(message)
            }
        }
    }

    /// Interval at `position` under the session's fallback policy. Does not emit.
    pub fn chord_at(&self, position: f64) -> Option<&Interval> {
        self.timeline.active_interval_with(position, self.sync.policy())
    }

    /// Feed one playback position through the synchronizer.
    pub fn on_position(&mut self, position: f64) -> Option<SyncEvent> {
        self.sync.on_position(&self.timeline, position)
    }

    /// Feed one playback position and deliver any event to `renderer`.
    pub fn update<R: Renderer + ?Sized>(&mut self, position: f64, renderer: &mut R) -> bool {
        self.sync.update(&self.timeline, position, renderer)
    }

    fn install(&mut self, timeline: ChordTimeline) {
        self.timeline = timeline;
        self.sync.reset();
    }
}
