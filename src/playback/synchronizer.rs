//! Playback synchronizer
//!
//! Resolves each reported playback position against the current timeline and decides
//! whether the renderer needs to hear about it.

use crate::timeline::{ChordTimeline, FallbackPolicy};

use super::source::PositionSource;
use super::types::{EmitMode, SyncEvent};

/// Receives chord events. The UI implements this; tests usually collect into a `Vec`.
pub trait Renderer {
    fn render(&mut self, event: &SyncEvent);
}

impl Renderer for Vec<SyncEvent> {
    fn render(&mut self, event: &SyncEvent) {
        self.push(event.clone());
    }
}

impl<F> Renderer for F
where
    F: FnMut(&SyncEvent),
{
    fn render(&mut self, event: &SyncEvent) {
        self(event)
    }
}

/// Turns positions into [`SyncEvent`]s.
///
/// The synchronizer never owns a timeline. Every call borrows the current one, so
/// swapping the timeline after an upload is just passing a different reference (and
/// calling [`reset`](PlaybackSynchronizer::reset) so the next update is always shown).
///
/// The only state kept between calls is the last emitted event, used by
/// [`EmitMode::OnChange`], and the last position, used to detect backward seeks. A
/// backward seek forgets the last emitted event, so the chord at the new position is
/// always shown. Neither influences which interval a position resolves to.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSynchronizer {
    policy: FallbackPolicy,
    mode: EmitMode,
    last_emitted: Option<SyncEvent>,
    last_position: Option<f64>,
}

impl PlaybackSynchronizer {
    /// Fallback-to-last lookup, emitting on every tick.
    pub fn new() -> Self {
        PlaybackSynchronizer::default()
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_mode(mut self, mode: EmitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn mode(&self) -> EmitMode {
        self.mode
    }

    /// Last event handed out, if any since the last reset.
    pub fn current(&self) -> Option<&SyncEvent> {
        self.last_emitted.as_ref()
    }

    /// Forget what was last shown. The next update always emits.
    pub fn reset(&mut self) {
        self.last_emitted = None;
        self.last_position = None;
    }

    /// Resolve `position` without touching any state.
    pub fn resolve(&self, timeline: &ChordTimeline, position: f64) -> SyncEvent {
        match timeline.active_interval_with(position, self.policy) {
            Some(interval) => SyncEvent::Chord {
                position,
                interval: interval.clone(),
            },
            None => SyncEvent::NoChord { position },
        }
    }

    /// Handle one position update.
    ///
    /// Returns the event to render, or `None` when [`EmitMode::OnChange`] suppressed it.
    pub fn on_position(&mut self, timeline: &ChordTimeline, position: f64) -> Option<SyncEvent> {
        if let Some(previous) = self.last_position {
            if position < previous {
                log::debug!("Playback moved back from {:.3}s to {:.3}s", previous, position);
                self.last_emitted = None;
            }
        }
        self.last_position = Some(position);

        let event = self.resolve(timeline, position);

        if self.mode == EmitMode::OnChange {
            if let Some(last) = &self.last_emitted {
                if last.same_display(&event) {
                    return None;
                }
            }
        }

        self.last_emitted = Some(event.clone());
        Some(event)
    }

    /// Like [`on_position`](Self::on_position) but delivers the event straight to `renderer`.
    ///
    /// Returns whether anything was rendered.
    pub fn update<R: Renderer + ?Sized>(
        &mut self,
        timeline: &ChordTimeline,
        position: f64,
        renderer: &mut R,
    ) -> bool {
        match self.on_position(timeline, position) {
            Some(event) => {
                renderer.render(&event);
                true
            }
            None => false,
        }
    }

    /// Pull positions from `source` until it is exhausted.
    ///
    /// Returns the number of events rendered.
    pub fn drive<S, R>(&mut self, timeline: &ChordTimeline, mut source: S, renderer: &mut R) -> usize
    where
        S: PositionSource,
        R: Renderer + ?Sized,
    {
        let mut emitted = 0;
        while let Some(position) = source.next_position() {
            if self.update(timeline, position, renderer) {
                emitted += 1;
            }
        }
        emitted
    }
}
