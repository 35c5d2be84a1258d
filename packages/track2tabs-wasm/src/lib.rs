use serde::{Deserialize, Serialize};
use track2tabs::{
    ChordLabel, ChordTimeline, EmitMode, FallbackPolicy, Session, SheetOptions, TimelineError,
    UploadOutcome, UploadTicket,
};
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct BindingError {
    message: String,
    /// Offending interval, when the error points at one.
    index: Option<usize>,
}

/// Error shape the relay answers with.
#[derive(Deserialize)]
struct RelayFailure {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

fn timeline_error_to_binding_error(e: TimelineError) -> BindingError {
    let index = match e {
        TimelineError::InvalidInterval { index, .. }
        | TimelineError::Unordered { index, .. }
        | TimelineError::Overlap { index, .. } => Some(index),
        TimelineError::Json(_) => None,
    };
    BindingError {
        message: e.to_string(),
        index,
    }
}

fn to_js_error(message: impl Into<String>) -> JsValue {
    binding_error_to_js(BindingError {
        message: message.into(),
        index: None,
    })
}

fn timeline_error_to_js(e: TimelineError) -> JsValue {
    binding_error_to_js(timeline_error_to_binding_error(e))
}

fn binding_error_to_js(error: BindingError) -> JsValue {
    JsValue::from_str(
        &serde_json::to_string(&error).unwrap_or_else(|_| r#"{"message":"unknown error"}"#.to_string()),
    )
}

fn parse_policy(policy: Option<&str>) -> FallbackPolicy {
    match policy {
        Some("nearestPreceding") | Some("nearest-preceding") => FallbackPolicy::NearestPreceding,
        _ => FallbackPolicy::Last,
    }
}

fn outcome_name(outcome: &UploadOutcome) -> &'static str {
    match outcome {
        UploadOutcome::Applied => "applied",
        UploadOutcome::Superseded => "superseded",
        UploadOutcome::Failed(_) => "failed",
    }
}

/// Turn the relay's response body into a timeline or a readable failure message.
fn relay_response_to_result(body: &str) -> Result<ChordTimeline, String> {
    match ChordTimeline::from_json(body) {
        Ok(timeline) => Ok(timeline),
        Err(timeline_error) => match serde_json::from_str::<RelayFailure>(body) {
            Ok(failure) => Err(match failure.details {
                Some(details) => format!("{}: {}", failure.error, details),
                None => failure.error,
            }),
            Err(_) => Err(timeline_error.to_string()),
        },
    }
}

fn ticket(generation: f64) -> UploadTicket {
    UploadTicket::from_generation(generation.max(0.0) as u64)
}

/// Player state for one page: current timeline, synchronizer and upload bookkeeping.
#[wasm_bindgen]
pub struct ChordSession {
    session: Session,
}

#[wasm_bindgen]
impl ChordSession {
    /// `policy`: `"last"` (default) or `"nearestPreceding"`.
    /// `emit_on_change`: only report chord changes instead of every time update.
    #[wasm_bindgen(constructor)]
    pub fn new(policy: Option<String>, emit_on_change: Option<bool>) -> ChordSession {
        let mode = if emit_on_change.unwrap_or(false) {
            EmitMode::OnChange
        } else {
            EmitMode::EveryTick
        };
        ChordSession {
            session: Session::with_options(parse_policy(policy.as_deref()), mode),
        }
    }

    /// Replace the timeline with a `{ chords: [...] }` document.
    #[wasm_bindgen(js_name = loadTimeline)]
    pub fn load_timeline(&mut self, json: &str) -> Result<(), JsValue> {
        let timeline = ChordTimeline::from_json(json).map_err(timeline_error_to_js)?;
        self.session.load_timeline(timeline);
        Ok(())
    }

    /// Start an upload. Pass the returned generation to `completeUpload`/`failUpload`.
    #[wasm_bindgen(js_name = beginUpload)]
    pub fn begin_upload(&mut self) -> f64 {
        self.session.begin_upload().generation() as f64
    }

    /// Hand over the relay's response body. Returns `"applied"`, `"superseded"` or `"failed"`.
    #[wasm_bindgen(js_name = completeUpload)]
    pub fn complete_upload(&mut self, generation: f64, response_body: &str) -> String {
        let result = relay_response_to_result(response_body);
        let outcome = self.session.complete_upload(ticket(generation), result);
        outcome_name(&outcome).to_string()
    }

    /// Report a network-level failure for an upload.
    #[wasm_bindgen(js_name = failUpload)]
    pub fn fail_upload(&mut self, generation: f64, message: &str) -> String {
        let outcome = self
            .session
            .complete_upload::<&str>(ticket(generation), Err(message));
        outcome_name(&outcome).to_string()
    }

    #[wasm_bindgen(js_name = isPending)]
    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }

    /// Call from the media element's `timeupdate` handler.
    ///
    /// Returns `{ type: "chord", position, interval }`, `{ type: "noChord", position }`,
    /// or `undefined` when nothing needs re-rendering.
    #[wasm_bindgen(js_name = onTimeUpdate)]
    pub fn on_time_update(&mut self, position: f64) -> Result<JsValue, JsValue> {
        match self.session.on_position(position) {
            Some(event) => serde_wasm_bindgen::to_value(&event).map_err(|e| to_js_error(e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Label active at `position`, without emitting anything.
    #[wasm_bindgen(js_name = chordAt)]
    pub fn chord_at(&self, position: f64) -> Option<String> {
        self.session
            .chord_at(position)
            .map(|interval| interval.label.to_string())
    }

    /// Distinct chords in order of first appearance.
    #[wasm_bindgen(js_name = uniqueChords)]
    pub fn unique_chords(&self) -> Result<JsValue, JsValue> {
        let labels: Vec<&str> = self
            .session
            .timeline()
            .unique_labels()
            .into_iter()
            .map(|l| l.as_str())
            .collect();
        serde_wasm_bindgen::to_value(&labels).map_err(|e| to_js_error(e.to_string()))
    }

    #[wasm_bindgen(js_name = timelineJson)]
    pub fn timeline_json(&self) -> String {
        self.session.timeline().to_json()
    }

    /// Printable HTML sheet of the current timeline's chords.
    #[wasm_bindgen(js_name = chordSheet)]
    pub fn chord_sheet(&self, title: &str, diagram_base: Option<String>) -> String {
        let mut options = SheetOptions {
            title: title.to_string(),
            ..SheetOptions::default()
        };
        if let Some(base) = diagram_base {
            options.diagram_base = base;
        }
        track2tabs::render_chord_sheet(self.session.timeline(), &options)
    }
}

/// One-off lookup on a `{ chords: [...] }` document.
#[wasm_bindgen(js_name = chordAt)]
pub fn chord_at(timeline_json: &str, position: f64) -> Result<Option<String>, JsValue> {
    track2tabs::chord_at(timeline_json, position)
        .map(|label| label.map(|l| l.to_string()))
        .map_err(timeline_error_to_js)
}

/// Diagram file name for a chord label, or `undefined` if it has none.
#[wasm_bindgen(js_name = diagramFor)]
pub fn diagram_for(label: &str) -> Option<String> {
    ChordLabel::from(label).diagram_file().map(str::to_string)
}
