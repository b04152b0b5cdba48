use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::batch::{BatchProcessor, BatchResponse, TranscriptRequest};
use crate::Result;

pub const INTERNAL_ERROR: &str = "An error occurred while processing the request";
pub const MALFORMED_BODY_ERROR: &str = "Malformed request body";

/// Request-level failures
#[derive(Debug)]
pub enum ApiError {
    /// Body is not JSON or does not match the request schema
    MalformedBody(String),

    /// Anything that escaped per-URL handling
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::MalformedBody(details) => (StatusCode::BAD_REQUEST, MALFORMED_BODY_ERROR, details),
            ApiError::Internal(details) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR, details),
        };

        (status, Json(BatchResponse::error(error, Some(details)))).into_response()
    }
}

/// Handler for `POST /get-transcript`
async fn get_transcript(
    State(processor): State<Arc<BatchProcessor>>,
    payload: std::result::Result<Json<TranscriptRequest>, JsonRejection>,
) -> std::result::Result<Json<BatchResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        // Non-JSON content types are treated as an empty body
        Err(JsonRejection::MissingJsonContentType(_)) => TranscriptRequest::default(),
        Err(rejection) => {
            tracing::warn!("Rejected request body: {}", rejection.body_text());
            return Err(ApiError::MalformedBody(rejection.body_text()));
        }
    };

    Ok(Json(processor.process_request(request).await))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!("General error: {}", details);
    ApiError::Internal(details).into_response()
}

/// Create the router: the transcript API plus static files for everything else
pub fn create_router(processor: Arc<BatchProcessor>, static_dir: &Path) -> Router {
    Router::new()
        .route("/get-transcript", post(get_transcript))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(processor)
}

/// Bind to `port` on all interfaces and serve until the process exits
pub async fn serve(router: Router, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server running at http://localhost:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
