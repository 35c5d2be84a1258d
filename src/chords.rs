//! Chord labels and chord tones
//!
//! The detection backend reports chords as plain strings. A fixed set of them has a
//! fingering diagram; everything else is kept verbatim and simply renders no diagram.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A chord name as reported by the detection backend.
///
/// The named variants are the chords that ship with a diagram. Any other string is
/// carried as [`ChordLabel::Other`] and is structurally valid.
///
/// # Example
/// ```
/// use track2tabs::ChordLabel;
///
/// let label: ChordLabel = "Am".parse().unwrap();
/// assert_eq!(label, ChordLabel::Am);
/// assert_eq!(label.diagram_file(), Some("Am.png"));
///
/// let odd: ChordLabel = "F#m".parse().unwrap();
/// assert!(!odd.has_diagram());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChordLabel {
    A,
    Am,
    Bm,
    C,
    C7,
    D,
    Dm,
    D7,
    E,
    Em,
    F,
    G,
    G7,
    Other(String),
}

impl ChordLabel {
    /// Every label that has a diagram, in display order.
    pub const SUPPORTED: [ChordLabel; 13] = [
        ChordLabel::A,
        ChordLabel::Am,
        ChordLabel::Bm,
        ChordLabel::C,
        ChordLabel::C7,
        ChordLabel::D,
        ChordLabel::Dm,
        ChordLabel::D7,
        ChordLabel::E,
        ChordLabel::Em,
        ChordLabel::F,
        ChordLabel::G,
        ChordLabel::G7,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ChordLabel::A => "A",
            ChordLabel::Am => "Am",
            ChordLabel::Bm => "Bm",
            ChordLabel::C => "C",
            ChordLabel::C7 => "C7",
            ChordLabel::D => "D",
            ChordLabel::Dm => "Dm",
            ChordLabel::D7 => "D7",
            ChordLabel::E => "E",
            ChordLabel::Em => "Em",
            ChordLabel::F => "F",
            ChordLabel::G => "G",
            ChordLabel::G7 => "G7",
            ChordLabel::Other(s) => s,
        }
    }

    /// File name of the fingering diagram, relative to the diagram asset directory.
    ///
    /// Returns `None` for labels outside the supported set. That is not an error:
    /// the chord is still shown, just without a picture.
    pub fn diagram_file(&self) -> Option<&'static str> {
        match self {
            ChordLabel::A => Some("A.png"),
            ChordLabel::Am => Some("Am.png"),
            ChordLabel::Bm => Some("Bm.png"),
            ChordLabel::C => Some("C.png"),
            ChordLabel::C7 => Some("C7.png"),
            ChordLabel::D => Some("D.png"),
            ChordLabel::Dm => Some("Dm.png"),
            ChordLabel::D7 => Some("D7.png"),
            ChordLabel::E => Some("E.png"),
            ChordLabel::Em => Some("Em.png"),
            ChordLabel::F => Some("F.png"),
            ChordLabel::G => Some("G.png"),
            ChordLabel::G7 => Some("G7.png"),
            ChordLabel::Other(_) => None,
        }
    }

    pub fn has_diagram(&self) -> bool {
        self.diagram_file().is_some()
    }

    /// Pitch classes (0 = C .. 11 = B) of the chord, root first.
    ///
    /// Works for any label with a recognizable root, not only the supported set.
    /// Returns an empty vec when no root can be read.
    pub fn pitch_classes(&self) -> Vec<u8> {
        chord_pitch_classes(self.as_str())
    }

    /// Note names of the chord tones, root first (e.g. `["G", "B", "D", "F"]` for G7).
    pub fn tone_names(&self) -> Vec<&'static str> {
        self.pitch_classes()
            .into_iter()
            .map(|pc| NOTE_NAMES[pc as usize])
            .collect()
    }
}

impl fmt::Display for ChordLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<&str> for ChordLabel {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        ChordLabel::SUPPORTED
            .iter()
            .find(|label| label.as_str() == trimmed)
            .cloned()
            .unwrap_or_else(|| ChordLabel::Other(trimmed.to_string()))
    }
}

impl From<String> for ChordLabel {
    fn from(s: String) -> Self {
        ChordLabel::from(s.as_str())
    }
}

impl From<ChordLabel> for String {
    fn from(label: ChordLabel) -> Self {
        match label {
            ChordLabel::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for ChordLabel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ChordLabel::from(s))
    }
}

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Parse a chord symbol into pitch classes.
///
/// # Supported Chord Types
/// - **Major**: `C`, `maj`, `M` → root, major 3rd, perfect 5th
/// - **Minor**: `m`, `min`, `-` → root, minor 3rd, perfect 5th
/// - **Dominant 7th**: `7` → root, major 3rd, perfect 5th, minor 7th
/// - **Major 7th**: `maj7`, `M7` → root, major 3rd, perfect 5th, major 7th
/// - **Minor 7th**: `m7`, `min7`, `-7` → root, minor 3rd, perfect 5th, minor 7th
/// - **Diminished**: `dim`, `°` → root, minor 3rd, diminished 5th
/// - **Augmented**: `aug`, `+` → root, major 3rd, augmented 5th
/// - **Sus4** / **Sus2** → root, 4th or 2nd, perfect 5th
///
/// Unknown qualities fall back to a major triad.
fn chord_pitch_classes(symbol: &str) -> Vec<u8> {
    let chars: Vec<char> = symbol.chars().collect();
    if chars.is_empty() {
        return vec![];
    }

    let base: i16 = match chars[0] {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return vec![],
    };

    let mut idx = 1;
    let accidental = match chars.get(1) {
        Some('#') => {
            idx += 1;
            1
        }
        Some('b') => {
            idx += 1;
            -1
        }
        _ => 0,
    };
    let root = (base + accidental).rem_euclid(12) as u8;

    let quality: String = chars[idx..].iter().collect();
    let intervals: &[u8] = match quality.as_str() {
        "" | "maj" | "M" => &[0, 4, 7],
        "m" | "min" | "-" => &[0, 3, 7],
        "7" => &[0, 4, 7, 10],
        "maj7" | "M7" => &[0, 4, 7, 11],
        "m7" | "min7" | "-7" => &[0, 3, 7, 10],
        "dim" | "°" => &[0, 3, 6],
        "aug" | "+" => &[0, 4, 8],
        "sus4" => &[0, 5, 7],
        "sus2" => &[0, 2, 7],
        _ => &[0, 4, 7],
    };

    intervals.iter().map(|i| (root + i) % 12).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_labels_round_trip_through_strings() {
        for label in ChordLabel::SUPPORTED.iter() {
            let parsed = ChordLabel::from(label.as_str());
            assert_eq!(&parsed, label);
            assert!(parsed.has_diagram());
        }
    }

    #[test]
    fn test_unknown_label_has_no_diagram() {
        let label = ChordLabel::from("F#m");
        assert_eq!(label, ChordLabel::Other("F#m".to_string()));
        assert_eq!(label.diagram_file(), None);
        assert_eq!(label.to_string(), "F#m");
    }

    #[test]
    fn test_label_matching_is_case_sensitive() {
        // "am" is not "Am"
        assert_eq!(ChordLabel::from("am"), ChordLabel::Other("am".to_string()));
    }

    #[test]
    fn test_label_serializes_as_plain_string() {
        let json = serde_json::to_string(&ChordLabel::G7).unwrap();
        assert_eq!(json, "\"G7\"");
        let back: ChordLabel = serde_json::from_str("\"Bbm\"").unwrap();
        assert_eq!(back, ChordLabel::Other("Bbm".to_string()));
    }

    #[test]
    fn test_chord_tones() {
        assert_eq!(ChordLabel::C.tone_names(), vec!["C", "E", "G"]);
        assert_eq!(ChordLabel::Dm.tone_names(), vec!["D", "F", "A"]);
        assert_eq!(ChordLabel::G7.tone_names(), vec!["G", "B", "D", "F"]);
        assert_eq!(ChordLabel::Bm.tone_names(), vec!["B", "D", "F#"]);
        assert_eq!(ChordLabel::from("Bb").pitch_classes(), vec![10, 2, 5]);
        assert!(ChordLabel::from("N").pitch_classes().is_empty());
    }
}
