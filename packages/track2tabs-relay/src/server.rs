//! Router and server loop

use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use track2tabs::ChordTimeline;

use crate::backend::BackendClient;
use crate::config::{ConfigError, RelayConfig};
use crate::error::{panic_response, RelayError};
use crate::upload::UploadRequest;

#[derive(Clone)]
struct AppState {
    backend: BackendClient,
    max_body_bytes: usize,
}

/// Build the relay's routes from `config`.
pub fn router(config: &RelayConfig) -> Result<Router, ConfigError> {
    config.validate()?;
    let state = AppState {
        backend: BackendClient::new(config)?,
        max_body_bytes: config.max_body_bytes,
    };

    let routes = Router::new()
        .route("/", get(health))
        .route(
            &config.upload_path,
            post(upload).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(state);
    Ok(catch_panics(routes))
}

/// Turn handler panics into `500 { "error": "Internal server error", ... }`.
pub fn catch_panics<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(CatchPanicLayer::custom(panic_response))
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, config: &RelayConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(config)?;
    log::info!(
        "Relay listening on http://{} (upload: {}, backend: {})",
        listener.local_addr()?,
        config.upload_path,
        config.backend_url
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    log::info!("Relay shut down");
    Ok(())
}

async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "message": "Track2Tabs relay is running" })),
    )
}

async fn upload(
    State(state): State<AppState>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<ChordTimeline>, RelayError> {
    let Json(request) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RelayError::PayloadTooLarge {
                limit: state.max_body_bytes,
            }
        } else {
            RelayError::InvalidRequest(rejection.body_text())
        }
    })?;

    let upload = request.decode()?;
    let timeline = state.backend.detect_chords(upload).await?;
    Ok(Json(timeline))
}

async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}
