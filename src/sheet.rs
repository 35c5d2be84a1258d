use crate::chords::ChordLabel;
use crate::timeline::ChordTimeline;

/// Layout options for [`render_chord_sheet`].
#[derive(Debug, Clone)]
pub struct SheetOptions {
    /// Heading printed at the top of the sheet.
    pub title: String,
    /// Prefix for diagram image paths (e.g. `"chords/"` or an absolute URL).
    pub diagram_base: String,
    /// Append the time-ordered chord progression after the chord list.
    pub include_progression: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        SheetOptions {
            title: "Chord Sheet".to_string(),
            diagram_base: "chords/".to_string(),
            include_progression: true,
        }
    }
}

/// Convert a timeline to a printable HTML chord sheet.
///
/// Lists every distinct chord once, in order of first appearance, with its diagram
/// (when one exists) and its chord tones. The browser's print dialog turns the page
/// into a PDF.
pub fn render_chord_sheet(timeline: &ChordTimeline, options: &SheetOptions) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n");
    html.push_str("<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str(&format!("  <title>{}</title>\n", escape_html(&options.title)));
    html.push_str("  <style>\n");
    html.push_str("    body { font-family: sans-serif; margin: 2em; }\n");
    html.push_str("    .chords { display: flex; flex-wrap: wrap; gap: 1.5em; }\n");
    html.push_str("    .chord { text-align: center; page-break-inside: avoid; }\n");
    html.push_str("    .chord img { width: 120px; }\n");
    html.push_str("    .tones { color: #555; font-size: 0.9em; }\n");
    html.push_str("  </style>\n");
    html.push_str("</head>\n");
    html.push_str("<body>\n");
    html.push_str(&format!("  <h1>{}</h1>\n", escape_html(&options.title)));

    let labels = timeline.unique_labels();
    if labels.is_empty() {
        html.push_str("  <p class=\"empty\">No chords detected.</p>\n");
    } else {
        html.push_str("  <div class=\"chords\">\n");
        for label in labels {
            html.push_str(&chord_to_html(label, &options.diagram_base));
        }
        html.push_str("  </div>\n");
    }

    if options.include_progression && !timeline.is_empty() {
        html.push_str("  <h2>Progression</h2>\n");
        html.push_str("  <ol class=\"progression\">\n");
        for interval in timeline.intervals() {
            html.push_str(&format!(
                "    <li>{} <span class=\"time\">{}–{}</span></li>\n",
                escape_html(interval.label.as_str()),
                format_timestamp(interval.start_sec),
                format_timestamp(interval.end_sec)
            ));
        }
        html.push_str("  </ol>\n");
    }

    html.push_str("</body>\n");
    html.push_str("</html>\n");

    html
}

fn chord_to_html(label: &ChordLabel, diagram_base: &str) -> String {
    let mut html = String::new();
    let name = escape_html(label.as_str());

    html.push_str("    <div class=\"chord\">\n");
    if let Some(file) = label.diagram_file() {
        html.push_str(&format!(
            "      <img src=\"{}{}\" alt=\"{} chord diagram\">\n",
            escape_html(diagram_base),
            file,
            name
        ));
    }
    html.push_str(&format!("      <div class=\"name\">{}</div>\n", name));

    let tones = label.tone_names();
    if !tones.is_empty() {
        html.push_str(&format!("      <div class=\"tones\">{}</div>\n", tones.join(" ")));
    }
    html.push_str("    </div>\n");

    html
}

/// `m:ss.s`, rounded down to tenths.
fn format_timestamp(seconds: f64) -> String {
    let tenths = (seconds.max(0.0) * 10.0).floor() as u64;
    let minutes = tenths / 600;
    let rest = tenths % 600;
    format!("{}:{:02}.{}", minutes, rest / 10, rest % 10)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Interval;

    fn progression() -> ChordTimeline {
        ChordTimeline::new(vec![
            Interval::new(0.0, 2.0, "G"),
            Interval::new(2.0, 4.0, "C"),
            Interval::new(4.0, 6.0, "G"),
            Interval::new(6.5, 8.0, "D7"),
        ])
        .unwrap()
    }

    #[test]
    fn test_sheet_lists_unique_chords_in_order() {
        let html = render_chord_sheet(&progression(), &SheetOptions::default());

        let g = html.find("<div class=\"name\">G</div>").unwrap();
        let c = html.find("<div class=\"name\">C</div>").unwrap();
        let d7 = html.find("<div class=\"name\">D7</div>").unwrap();
        assert!(g < c && c < d7);
        assert_eq!(html.matches("<div class=\"name\">G</div>").count(), 1);
        assert!(html.contains("<img src=\"chords/D7.png\""));
        assert!(html.contains("<div class=\"tones\">D F# A C</div>"));
    }

    #[test]
    fn test_unmapped_label_has_no_image() {
        let timeline = ChordTimeline::new(vec![Interval::new(0.0, 1.0, "F#m")]).unwrap();
        let html = render_chord_sheet(&timeline, &SheetOptions::default());

        assert!(html.contains("<div class=\"name\">F#m</div>"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_sheet_escapes_title_and_labels() {
        let timeline = ChordTimeline::new(vec![Interval::new(0.0, 1.0, "<b>")]).unwrap();
        let options = SheetOptions {
            title: "Tom & Jerry".to_string(),
            ..SheetOptions::default()
        };
        let html = render_chord_sheet(&timeline, &options);

        assert!(html.contains("<h1>Tom &amp; Jerry</h1>"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_progression_timestamps() {
        let html = render_chord_sheet(&progression(), &SheetOptions::default());
        assert!(html.contains("<li>D7 <span class=\"time\">0:06.5–0:08.0</span></li>"));

        let options = SheetOptions {
            include_progression: false,
            ..SheetOptions::default()
        };
        assert!(!render_chord_sheet(&progression(), &options).contains("Progression"));
    }

    #[test]
    fn test_empty_timeline_sheet() {
        let html = render_chord_sheet(&ChordTimeline::empty(), &SheetOptions::default());
        assert!(html.contains("No chords detected."));
        assert!(!html.contains("<ol"));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "0:00.0");
        assert_eq!(format_timestamp(61.27), "1:01.2");
        assert_eq!(format_timestamp(-3.0), "0:00.0");
    }
}
