//! HTTP request handlers for the link shortener
//!
//! This module implements:
//! - Redirecting a short code to its destination while recording the click
//! - Creating links with caller-supplied or generated codes
//! - Listing, fetching and deleting links
//! - A store health probe for dashboards

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::code::{self, DEFAULT_LENGTH};
use crate::database::{AppState, StoreError};
use crate::error::AppError;
use crate::model::{CreateLinkRequest, Link};
use crate::validate::{is_valid_code, is_valid_url};

/// Redirects a short code to its destination
///
/// When a visitor hits `GET /aZ3k9Q`, this handler:
/// 1. Looks up "aZ3k9Q" in the store
/// 2. Records the click (count, last-clicked time) in one atomic store operation
/// 3. Sends a 302 Found with `Location` set to the stored target URL, verbatim
///
/// The redirect is only sent once the increment has completed, so every
/// redirect a client observes has its click recorded.
///
/// # Response
///
/// - **302 Found** - Redirect to the target URL
/// - **404 Not Found** - Unknown code; the store is not touched
/// - **500 Internal Server Error** - Store failure, or a stored URL that is not a legal header value
pub async fn redirect_link(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    // Look up the short code in the store
    let Some(link) = state.store.find_by_code(&code).await? else {
        debug!(%code, "redirect for unknown code");
        return Err(AppError::NotFound("Not found".to_string()));
    };

    // The Location header must be buildable before the click is counted
    let location = HeaderValue::from_bytes(link.target_url.as_bytes()).map_err(|err| {
        AppError::Internal(format!("stored target URL for {code} is not a header value: {err}"))
    })?;

    // Record the click
    let link = match state.store.increment_click(&code).await {
        Ok(link) => link,
        // deleted between lookup and increment
        Err(StoreError::NotFound(_)) => return Err(AppError::NotFound("Not found".to_string())),
        Err(err) => return Err(err.into()),
    };

    debug!(%code, clicks = link.clicks, "redirecting");
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Creates a new link
///
/// # Request Body
///
/// ```json
/// {
///   "targetUrl": "https://example.com/very/long/url",
///   "code": "myLink1"  // Optional
/// }
/// ```
///
/// # Response
///
/// - **201 Created** - The new link record
/// - **400 Bad Request** - Missing or malformed `targetUrl`, malformed `code`, or unparseable body
/// - **409 Conflict** - Requested code is taken
/// - **500 Internal Server Error** - Store failure or code generation exhausted
pub async fn create_link(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Link>), AppError> {
    let Json(payload) = payload?;

    // Reject a missing or empty target URL
    let target_url = payload
        .target_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::BadRequest("targetUrl is required".to_string()))?;

    // Must parse as an absolute URL and be sendable as a Location header
    if !is_valid_url(&target_url) {
        return Err(AppError::BadRequest("Invalid URL format".to_string()));
    }

    // An empty code is treated the same as an omitted one
    let link = match payload.code.filter(|code| !code.is_empty()) {
        Some(code) => create_with_code(&state, &code, &target_url).await?,
        None => create_with_generated_code(&state, &target_url).await?,
    };

    info!(code = %link.code, target_url = %link.target_url, "link created");

    // Return the full record so the caller sees the assigned code
    Ok((StatusCode::CREATED, Json(link)))
}

async fn create_with_code(state: &AppState, code: &str, target_url: &str) -> Result<Link, AppError> {
    if !is_valid_code(code) {
        return Err(AppError::BadRequest(
            "Code must be 6-8 alphanumeric characters".to_string(),
        ));
    }

    // Check if the code is already taken
    if state.store.exists(code).await? {
        return Err(AppError::Conflict("Code already exists".to_string()));
    }

    // A concurrent create can still win between the check and the insert;
    // the store reports that as a conflict.
    Ok(state.store.create(code, target_url).await?)
}

/// Draws random codes until one is free, up to the configured attempt limit.
async fn create_with_generated_code(state: &AppState, target_url: &str) -> Result<Link, AppError> {
    // Config::from_env never yields 0, but the field is public and a
    // hand-built Config could; always try at least one candidate.
    let max_attempts = state.config.code_max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let candidate = code::generate(DEFAULT_LENGTH);

        // Skip candidates that are already in use
        if state.store.exists(&candidate).await? {
            debug!(%candidate, attempt, "generated code already taken");
            continue;
        }

        // Another request may claim the same candidate between check and insert
        match state.store.create(&candidate, target_url).await {
            Ok(link) => return Ok(link),
            Err(StoreError::Conflict(_)) => {
                warn!(%candidate, attempt, "generated code claimed concurrently, retrying");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(AppError::Exhausted(max_attempts))
}

/// Lists every link, newest first
///
/// # Response
///
/// - **200 OK** - JSON array of link records
/// - **500 Internal Server Error** - Store failure
pub async fn list_links(State(state): State<AppState>) -> Result<Json<Vec<Link>>, AppError> {
    Ok(Json(state.store.list().await?))
}

/// Fetches a single link with its analytics
pub async fn get_link(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Link>, AppError> {
    state
        .store
        .find_by_code(&code)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Link not found".to_string()))
}

/// Deletes a link
///
/// # Response
///
/// - **200 OK** - `{"success": true}`
/// - **404 Not Found** - Unknown code
/// - **500 Internal Server Error** - Store failure
pub async fn delete_link(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    // Removes the record and its index entry; unknown codes surface as 404
    state.store.delete(&code).await?;

    info!(%code, "link deleted");
    Ok(Json(json!({ "success": true })))
}

/// Reports whether the store answers reads
///
/// Lets a client tell "store unreachable" apart from "no links yet".
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "connected" })),
        ),
        Err(err) => {
            tracing::error!("Health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "disconnected" })),
            )
        }
    }
}
