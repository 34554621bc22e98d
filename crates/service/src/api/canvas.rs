use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::{
    Json,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use signet_types::Raster;

/// Where a saved signature can be downloaded from.
const DOWNLOAD_URL: &str = "/download_canvas";

#[derive(Debug, Deserialize)]
pub struct SaveCanvasRequest {
    /// `data:image/png;base64,...` snapshot of the canvas
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveCanvasResponse {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RetrieveCanvasResponse {
    /// The stored signature as a data URI, `null` before the first save
    pub image: Option<String>,
}

/// Stores a canvas snapshot as the current signature
pub async fn save_canvas(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SaveCanvasRequest>, JsonRejection>,
) -> Result<Json<SaveCanvasResponse>> {
    let Json(req) = payload.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServiceError::PayloadTooLarge(state.config.body_limit())
        } else {
            ServiceError::InvalidRequest(e.body_text())
        }
    })?;

    // 1. Validate the payload before anything touches storage
    let raster = signet_capture::decode(&req.image)?;
    tracing::debug!(
        "Received {} signature {}x{}",
        raster.format(),
        raster.width(),
        raster.height()
    );

    // 2. The slot always holds PNG
    let png = raster
        .into_png()
        .map_err(|e| ServiceError::Internal(format!("PNG conversion failed: {}", e)))?
        .into_bytes();

    // 3. Persist off the async runtime
    let store = state.store.clone();
    let size = png.len();
    let key = tokio::task::spawn_blocking(move || store.save(&png)).await??;

    tracing::info!(
        "Signature saved to {} ({} bytes)",
        state.store.location(&key),
        size
    );

    Ok(Json(SaveCanvasResponse {
        url: DOWNLOAD_URL.to_string(),
    }))
}

/// Returns the current signature as a data URI
pub async fn retrieve_canvas(State(state): State<AppState>) -> Result<Json<RetrieveCanvasResponse>> {
    let store = state.store.clone();
    let stored = tokio::task::spawn_blocking(move || {
        let key = store.slot().clone();
        store.load(&key)
    })
    .await??;

    let image = match stored {
        Some(bytes) => {
            let raster = Raster::from_encoded(bytes).map_err(|e| {
                ServiceError::Internal(format!("Stored signature is unreadable: {}", e))
            })?;
            Some(signet_capture::encode_raster(&raster))
        }
        None => {
            tracing::debug!("No signature stored yet");
            None
        }
    };

    Ok(Json(RetrieveCanvasResponse { image }))
}

/// Sends the current signature as a PNG attachment
pub async fn download_canvas(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let store = state.store.clone();
    let attachment = tokio::task::spawn_blocking(move || {
        let key = store.slot().clone();
        store.export(&key)
    })
    .await??;

    tracing::info!(
        "Signature downloaded ({} bytes)",
        attachment.bytes.len()
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, attachment.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", attachment.file_name),
        )
        .body(Body::from(attachment.bytes))
        .map_err(|e| ServiceError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
