//! HTTP handlers for the link collection
//!
//! Handlers assume the access gateway already ran: the [`AuthContext`] in
//! request extensions tells them whether private links may be shown.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::error::{LinkError, VaultResult};
use crate::core::{AuthContext, CredentialVerifier, JsonBody, Link, NewLink};
use crate::links::service::LinkRepository;

/// Cookie settings for credential establishment
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub max_age_secs: u64,
    pub secure: bool,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: LinkRepository,
    pub verifier: Arc<CredentialVerifier>,
    pub session: SessionSettings,
}

/// Response for list links endpoint
#[derive(Debug, Serialize)]
pub struct ListLinksResponse {
    pub links: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Body of `PUT /api/links`: the id travels with the fields
#[derive(Debug, Deserialize)]
pub struct UpdateLinkRequest {
    pub id: String,
    #[serde(flatten)]
    pub link: NewLink,
}

/// Body of `POST /api/links/star`
#[derive(Debug, Deserialize)]
pub struct StarRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub links: Vec<NewLink>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: String,
    pub count: usize,
}

/// GET /api/links
pub async fn list_links(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Json<ListLinksResponse> {
    Json(ListLinksResponse {
        links: state.repository.list_visible(ctx).await,
    })
}

/// GET /api/links/{id}
///
/// Private links are reported as missing to anonymous callers.
pub async fn get_link(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> VaultResult<Json<Link>> {
    let link = state.repository.get(&id).await?;
    if link.private && !ctx.is_owner() {
        return Err(LinkError::NotFound { id }.into());
    }
    Ok(Json(link))
}

/// POST /api/links
pub async fn create_link(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<NewLink>,
) -> VaultResult<(StatusCode, Json<Link>)> {
    let link = state.repository.add(draft).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// PUT /api/links
pub async fn update_link_by_body(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateLinkRequest>,
) -> VaultResult<Json<Link>> {
    let link = state.repository.update(&request.id, request.link).await?;
    Ok(Json(link))
}

/// PUT /api/links/{id}
pub async fn update_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(draft): JsonBody<NewLink>,
) -> VaultResult<Json<Link>> {
    let link = state.repository.update(&id, draft).await?;
    Ok(Json(link))
}

/// DELETE /api/links/{id}
pub async fn delete_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> VaultResult<Json<serde_json::Value>> {
    if state.repository.delete(&id).await? {
        Ok(Json(serde_json::json!({ "success": true })))
    } else {
        Err(LinkError::NotFound { id }.into())
    }
}

/// POST /api/links/star
pub async fn toggle_star_by_body(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<StarRequest>,
) -> VaultResult<Json<Link>> {
    Ok(Json(state.repository.toggle_star(&request.id).await?))
}

/// POST /api/links/{id}/star
pub async fn toggle_star(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> VaultResult<Json<Link>> {
    Ok(Json(state.repository.toggle_star(&id).await?))
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.repository.categories_visible(ctx).await,
    })
}

/// GET /api/data/export
///
/// Served as a file download named after the export day.
pub async fn export_links(State(state): State<AppState>) -> VaultResult<Response> {
    let document = state.repository.export().await?;
    let filename = format!(
        "links-export-{}.json",
        document.export_date.format("%Y-%m-%d")
    );
    let body = serde_json::to_string_pretty(&document)
        .map_err(|e| crate::core::VaultError::Internal(e.to_string()))?;

    Ok((
        [
            (CONTENT_TYPE, "application/json".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// POST /api/data/import
pub async fn import_links(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ImportRequest>,
) -> VaultResult<Json<ImportResponse>> {
    let count = state.repository.replace_all(request.links).await?;
    Ok(Json(ImportResponse {
        message: "Data imported successfully".to_string(),
        count,
    }))
}
