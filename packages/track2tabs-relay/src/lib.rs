//! # Track2Tabs Upload Relay
//!
//! A single pass-through endpoint between the browser and the chord detection backend.
//!
//! The browser cannot hand raw binary to this hop, so it posts JSON with the audio
//! base64-encoded. The relay decodes it, re-sends it to the backend as a multipart file
//! upload, validates what comes back, and returns the chord timeline.
//!
//! ## Endpoints
//! - `GET /` - health check
//! - `POST /api/upload` - `{ filename, mimetype, data }` → `{ chords: [...] }`
//!
//! ## Failures
//! Every failure is answered with `{ "error": "...", "details": "..." }`:
//!
//! | Status | Cause |
//! |--------|-------|
//! | 400 | missing or undecodable audio payload |
//! | 405 | wrong method on the upload route |
//! | 413 | request body over the configured limit (backend never contacted) |
//! | 500 | backend unreachable, backend error status, malformed backend reply, or anything unexpected (including a handler panic) |
//!
//! Nothing is retried. Each request stands alone.

pub mod backend;
pub mod config;
pub mod error;
pub mod server;
pub mod upload;

pub use backend::BackendClient;
pub use config::{ConfigError, RelayConfig};
pub use error::{panic_response, ErrorBody, RelayError};
pub use server::{catch_panics, router, serve};
pub use upload::{DecodedUpload, UploadRequest};
