//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};

use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Check the cache (`url:<code>`)
/// 2. On miss, read the code store and refill the cache in the background
/// 3. Spawn click emission (bus, then HTTP fallback)
/// 4. Return 301 Moved Permanently
///
/// The response never waits on the cache write or on click delivery.
/// `axum::response::Redirect::permanent` answers 308, so the 301 is built by hand.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist; no click is emitted.
/// Returns 500 if the stored URL is not a valid `Location` header value.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let resolution = state.redirect_service.resolve(&code).await?;

    tracing::debug!(code, source = ?resolution.source, "Redirecting");

    let location = HeaderValue::try_from(resolution.target_url.as_str()).map_err(|e| {
        tracing::error!(code, error = %e, "Stored target URL is not a valid Location header");
        AppError::internal("Invalid redirect target", json!({ "code": code }))
    })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]))
}
