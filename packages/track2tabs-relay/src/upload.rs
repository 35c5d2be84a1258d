//! Browser-side upload payload and its decoding

use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

const DEFAULT_FILENAME: &str = "audio.wav";
const DEFAULT_EXTENSION: &str = "wav";
const FALLBACK_MIME: &str = "application/octet-stream";

/// JSON body posted by the browser.
///
/// `data` is the audio file, base64-encoded. A `data:<mime>;base64,` prefix as
/// produced by `FileReader.readAsDataURL` is accepted too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub mimetype: String,
    #[serde(default)]
    pub data: String,
}

/// An upload ready to be forwarded to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedUpload {
    pub filename: String,
    pub mimetype: String,
    pub bytes: Vec<u8>,
}

impl UploadRequest {
    pub fn decode(self) -> Result<DecodedUpload, RelayError> {
        let (data_url_mime, encoded) = split_data_url(self.data.trim());
        if encoded.is_empty() {
            return Err(RelayError::InvalidRequest("No audio data provided".to_string()));
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| RelayError::InvalidRequest(format!("Invalid base64 data: {}", e)))?;
        if bytes.is_empty() {
            return Err(RelayError::InvalidRequest("Audio file is empty".to_string()));
        }

        let mimetype = pick_mimetype(&self.mimetype, data_url_mime);

        Ok(DecodedUpload {
            filename: normalize_filename(&self.filename),
            mimetype,
            bytes,
        })
    }
}

/// Split `data:audio/mpeg;base64,AAAA` into `(Some("audio/mpeg"), "AAAA")`.
fn split_data_url(data: &str) -> (Option<&str>, &str) {
    let Some(rest) = data.strip_prefix("data:") else {
        return (None, data);
    };
    match rest.split_once(',') {
        Some((header, payload)) => {
            let mime = header.split(';').next().filter(|m| !m.is_empty());
            (mime, payload)
        }
        None => (None, data),
    }
}

fn pick_mimetype(declared: &str, from_data_url: Option<&str>) -> String {
    let declared = declared.trim();
    let candidate = if declared.is_empty() {
        from_data_url.unwrap_or("")
    } else {
        declared
    };

    // type "/" subtype, no whitespace
    let well_formed = candidate
        .split_once('/')
        .map(|(t, s)| !t.is_empty() && !s.is_empty())
        .unwrap_or(false)
        && !candidate.contains(char::is_whitespace);

    if well_formed {
        candidate.to_string()
    } else {
        if !candidate.is_empty() {
            log::debug!("Ignoring malformed MIME type '{}'", candidate);
        }
        FALLBACK_MIME.to_string()
    }
}

/// Strip any directory part and make sure the name has an extension.
///
/// The backend picks its decoder from the extension and assumes `.wav` when there
/// is none, so the relay applies the same default explicitly.
fn normalize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        return DEFAULT_FILENAME.to_string();
    }

    let has_extension = Path::new(base)
        .extension()
        .map(|e| !e.is_empty())
        .unwrap_or(false);
    if has_extension {
        base.to_string()
    } else {
        format!("{}.{}", base.trim_end_matches('.'), DEFAULT_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(filename: &str, mimetype: &str, data: &str) -> UploadRequest {
        UploadRequest {
            filename: filename.to_string(),
            mimetype: mimetype.to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_decode_plain_base64() {
        let upload = request("song.mp3", "audio/mpeg", "SUQzBA==").decode().unwrap();
        assert_eq!(upload.bytes, b"ID3\x04".to_vec());
        assert_eq!(upload.filename, "song.mp3");
        assert_eq!(upload.mimetype, "audio/mpeg");
    }

    #[test]
    fn test_decode_data_url() {
        let upload = request("song.mp3", "", "data:audio/mpeg;base64,SUQzBA==").decode().unwrap();
        assert_eq!(upload.bytes, b"ID3\x04".to_vec());
        assert_eq!(upload.mimetype, "audio/mpeg");
    }

    #[test]
    fn test_declared_mimetype_wins_over_data_url() {
        let upload = request("a.ogg", "audio/ogg", "data:audio/mpeg;base64,SUQzBA==").decode().unwrap();
        assert_eq!(upload.mimetype, "audio/ogg");
    }

    #[test]
    fn test_missing_data_is_rejected() {
        let err = request("a.wav", "audio/wav", "").decode().unwrap_err();
        assert!(matches!(err, RelayError::InvalidRequest(ref m) if m == "No audio data provided"));

        let err = request("a.wav", "audio/wav", "data:audio/wav;base64,").decode().unwrap_err();
        assert!(matches!(err, RelayError::InvalidRequest(_)));
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let err = request("a.wav", "audio/wav", "not base64!!").decode().unwrap_err();
        assert!(matches!(err, RelayError::InvalidRequest(ref m) if m.starts_with("Invalid base64 data")));
    }

    #[test]
    fn test_malformed_mimetype_falls_back() {
        assert_eq!(pick_mimetype("audio", None), FALLBACK_MIME);
        assert_eq!(pick_mimetype("audio/ mpeg", None), FALLBACK_MIME);
        assert_eq!(pick_mimetype("", None), FALLBACK_MIME);
        assert_eq!(pick_mimetype(" audio/flac ", None), "audio/flac");
    }

    #[test]
    fn test_filename_normalization() {
        assert_eq!(normalize_filename("track.flac"), "track.flac");
        assert_eq!(normalize_filename(""), "audio.wav");
        assert_eq!(normalize_filename("recording"), "recording.wav");
        assert_eq!(normalize_filename("recording."), "recording.wav");
        assert_eq!(normalize_filename("C:\\music\\take 1.m4a"), "take 1.m4a");
        assert_eq!(normalize_filename("../../etc/passwd"), "passwd.wav");
        assert_eq!(normalize_filename("dir/"), "audio.wav");
    }
}
