//! Image processing router.
//!
//! One route:
//!
//! ```text
//! POST /processImage?rotate=TRUE&grayscale=TRUE&blur=TRUE[&size=N][&spread=S]
//! ```
//!
//! The body is a PNG (JPEG is accepted too); the response is the processed
//! image as `image/jpeg`. A flag is enabled only by the exact value `TRUE`.
//! Decoding, the pipeline and encoding run on the blocking pool.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use pixflow_core::PixelBuffer;
use pixflow_io::Format;
use pixflow_ops::{BlurParams, OpsResult, Pipeline, TransformRequest};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Path of the processing endpoint.
pub const PROCESS_IMAGE_PATH: &str = "/processImage";

/// Shared per-server state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Stage order and schedule applied to every request.
    pub pipeline: Pipeline,
    /// Blur kernel defaults; `size` and `spread` query values override them.
    pub blur: BlurParams,
    /// Quality of the JPEG response.
    pub jpeg_quality: u8,
    /// Request body limit in bytes.
    pub max_body_bytes: usize,
}

impl AppState {
    /// Builds state from a config, validating the pipeline order and the
    /// default blur kernel.
    pub fn from_config(config: &ServerConfig) -> OpsResult<Self> {
        config.blur.kernel()?;
        Ok(Self {
            pipeline: Pipeline::new(config.pipeline.clone())?,
            blur: config.blur,
            jpeg_quality: config.jpeg_quality,
            max_body_bytes: config.max_body_bytes(),
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        let config = ServerConfig::default();
        Self {
            pipeline: Pipeline::default(),
            blur: config.blur,
            jpeg_quality: config.jpeg_quality,
            max_body_bytes: config.max_body_bytes(),
        }
    }
}

/// Query parameters of `POST /processImage`.
#[derive(Debug, Default, Deserialize)]
pub struct ProcessParams {
    /// `TRUE` enables rotation.
    pub rotate: Option<String>,
    /// `TRUE` enables grayscale.
    pub grayscale: Option<String>,
    /// `TRUE` enables blur.
    pub blur: Option<String>,
    /// Blur kernel size override.
    pub size: Option<usize>,
    /// Blur spread override.
    pub spread: Option<f64>,
}

impl ProcessParams {
    /// Resolves the request against the server's blur defaults.
    pub fn to_request(&self, defaults: BlurParams) -> TransformRequest {
        let mut request = TransformRequest::from_query_flags(
            self.rotate.as_deref(),
            self.grayscale.as_deref(),
            self.blur.as_deref(),
        );
        request.blur_params = BlurParams {
            size: self.size.unwrap_or(defaults.size),
            spread: self.spread.unwrap_or(defaults.spread),
            accumulate: defaults.accumulate,
        };
        request
    }
}

/// Builds the router.
pub fn build_router(state: AppState) -> Router {
    let limit = state.max_body_bytes;
    Router::new()
        .route(
            PROCESS_IMAGE_PATH,
            post(process_image).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(limit))
        .with_state(Arc::new(state))
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(format!("{} {}; use POST", method, PROCESS_IMAGE_PATH))
}

async fn process_image(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ProcessParams>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let body = body.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(format!("body exceeds {} bytes", state.max_body_bytes))
        } else {
            ApiError::BadRequest(e.body_text())
        }
    })?;

    let request = params.to_request(state.blur);
    debug!(?request, len = body.len(), "processImage");

    let worker_state = Arc::clone(&state);
    let jpeg = tokio::task::spawn_blocking(move || process(&worker_state, &body, &request))
        .await
        .map_err(|e| ApiError::Internal(format!("worker failed: {e}")))??;

    Ok(([(header::CONTENT_TYPE, Format::Jpeg.mime_type())], jpeg).into_response())
}

/// Decode, transform and encode one request body.
fn process(state: &AppState, body: &[u8], request: &TransformRequest) -> Result<Vec<u8>, ApiError> {
    let start = Instant::now();

    let image = pixflow_io::decode(body)?;
    let buffer = PixelBuffer::from_image(&image)?;
    let (width, height) = buffer.dimensions();

    let output = state.pipeline.execute(buffer, request)?;
    let jpeg = pixflow_io::jpeg::encode(&output.buffer.to_image(), state.jpeg_quality)?;

    info!(
        width,
        height,
        stages = ?output.applied,
        pipeline = ?output.elapsed,
        total = ?start.elapsed(),
        "processed image"
    );
    Ok(jpeg)
}
