//! Route table for the linkvault API

use crate::links::handlers::{
    AppState, create_link, delete_link, export_links, get_link, import_links, list_categories,
    list_links, toggle_star, toggle_star_by_body, update_link, update_link_by_body,
};
use crate::server::session::{end_session, establish_session, session_status};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};

/// Build the API routes
///
/// - GET    /api/links              - List links (private ones only for the owner)
/// - POST   /api/links              - Create a link
/// - PUT    /api/links              - Update a link, id in the body
/// - POST   /api/links/star         - Toggle a star, id in the body
/// - GET    /api/links/{id}         - Get one link
/// - PUT    /api/links/{id}         - Update a link
/// - DELETE /api/links/{id}         - Delete a link
/// - POST   /api/links/{id}/star    - Toggle a star
/// - GET    /api/categories         - Category union
/// - GET    /api/data/export        - Download the whole collection
/// - POST   /api/data/import        - Replace the whole collection
/// - GET    /api/auth/verify        - Is the caller's credential valid
/// - POST   /api/auth/verify        - Exchange a token for the session cookie
/// - POST   /api/auth/logout        - Clear the session cookie
pub fn build_api_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/links",
            get(list_links).post(create_link).put(update_link_by_body),
        )
        .route("/api/links/star", post(toggle_star_by_body))
        .route(
            "/api/links/{id}",
            get(get_link).put(update_link).delete(delete_link),
        )
        .route("/api/links/{id}/star", post(toggle_star))
        .route("/api/categories", get(list_categories))
        .route("/api/data/export", get(export_links))
        .route("/api/data/import", post(import_links))
        .route(
            "/api/auth/verify",
            get(session_status).post(establish_session),
        )
        .route("/api/auth/logout", post(end_session))
        .with_state(state)
}

/// Build health check routes
pub fn build_health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "linkvault"
    }))
}
