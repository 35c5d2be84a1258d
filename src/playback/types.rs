//! Synchronizer event and configuration types

use serde::Serialize;

use crate::chords::ChordLabel;
use crate::timeline::Interval;

/// What the renderer should show after a position update.
///
/// Serializes with a `type` tag so the browser can switch on it:
/// `{"type":"chord","position":1.5,"interval":{...}}` or `{"type":"noChord","position":0.0}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SyncEvent {
    /// `interval` is active at `position`.
    Chord { position: f64, interval: Interval },
    /// Nothing to show; clear the chord display.
    NoChord { position: f64 },
}

impl SyncEvent {
    pub fn position(&self) -> f64 {
        match self {
            SyncEvent::Chord { position, .. } | SyncEvent::NoChord { position } => *position,
        }
    }

    pub fn interval(&self) -> Option<&Interval> {
        match self {
            SyncEvent::Chord { interval, .. } => Some(interval),
            SyncEvent::NoChord { .. } => None,
        }
    }

    pub fn chord(&self) -> Option<&ChordLabel> {
        self.interval().map(|i| &i.label)
    }

    pub fn label(&self) -> Option<&str> {
        self.chord().map(|l| l.as_str())
    }

    pub fn is_no_chord(&self) -> bool {
        matches!(self, SyncEvent::NoChord { .. })
    }

    /// Two events show the same thing on screen (same label, or both empty).
    pub(crate) fn same_display(&self, other: &SyncEvent) -> bool {
        self.chord() == other.chord()
    }
}

/// When the synchronizer hands an event to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EmitMode {
    /// Emit on every position update, even if nothing changed.
    #[default]
    EveryTick,
    /// Emit only when the displayed chord changes.
    OnChange,
}
