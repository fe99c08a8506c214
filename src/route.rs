//! Route definitions for the link shortener
//!
//! This module configures all HTTP routes and maps them to their respective handlers.

use axum::routing::get;
use axum::Router;

use crate::database::AppState;
use crate::handler::{
    create_link, delete_link, get_link, health_check, list_links, redirect_link,
};

/// Creates and configures the Axum application router with all routes
///
/// # Route Definitions
///
/// - `GET /{code}` - Redirects to the target URL and records the click
/// - `GET /api/links` - Lists all links, newest first
/// - `POST /api/links` - Creates a link
/// - `GET /api/links/{code}` - Fetches one link
/// - `DELETE /api/links/{code}` - Deletes a link
/// - `GET /api/health` - Store connectivity probe
///
/// # Example Usage
///
/// ```no_run
/// # use shortlink::config::Config;
/// # use shortlink::database::{init_db, AppState};
/// # use shortlink::route::create_app;
/// # let db = init_db("data.db").unwrap();
/// let state = AppState::new(db, Config::default());
/// let app = create_app(state);
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/links", get(list_links).post(create_link))
        .route("/links/{code}", get(get_link).delete(delete_link))
        .route("/health", get(health_check));

    Router::new()
        // Public redirect endpoint
        .route("/{code}", get(redirect_link))
        .nest("/api", api_routes)
        .with_state(state)
}
