pub mod chords;
pub mod error;
pub mod playback;
pub mod session;
pub mod sheet;
pub mod timeline;

pub use chords::ChordLabel;
pub use error::TimelineError;
pub use playback::{EmitMode, PlaybackSynchronizer, Renderer, SyncEvent};
pub use session::{Session, UploadOutcome, UploadTicket};
pub use sheet::{render_chord_sheet, SheetOptions};
pub use timeline::{active_interval_at, ChordTimeline, FallbackPolicy, Interval};

/// Parse a backend response and return the chord label active at `t`.
/// Convenience entry point for one-off lookups.
pub fn chord_at(timeline_json: &str, t: f64) -> Result<Option<ChordLabel>, TimelineError> {
    let timeline = ChordTimeline::from_json(timeline_json)?;
    Ok(timeline.active_interval_at(t).map(|i| i.label.clone()))
}

/// Parse a backend response and render its chord sheet with default layout.
pub fn chord_sheet(timeline_json: &str, title: &str) -> Result<String, TimelineError> {
    let timeline = ChordTimeline::from_json(timeline_json)?;
    let options = SheetOptions {
        title: title.to_string(),
        ..SheetOptions::default()
    };
    Ok(render_chord_sheet(&timeline, &options))
}
