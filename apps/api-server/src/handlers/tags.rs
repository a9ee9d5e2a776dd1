//! Tag handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use quill_core::domain::Tag;
use quill_core::lookup;
use quill_core::ports::{PostFilter, PostOrder};
use quill_core::slug;
use quill_shared::ApiResponse;
use quill_shared::dto::{PostListQuery, TagRequest, UpdateTagRequest};

use super::posts::{post_page, present, public_filter};
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn find_tag(state: &AppState, param: &str) -> AppResult<Tag> {
    lookup::resolve(state.tags.as_ref(), param)
        .await
        .map_err(AppError::lookup("tag"))
}

/// GET /api/tags
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.list_all().await?;
    let data: Vec<_> = tags.iter().map(views::tag).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(data)))
}

/// POST /api/tags
pub async fn create(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<TagRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("name is required"));
    }

    let source = present(req.slug.as_deref()).unwrap_or_else(|| name.clone());
    let slug = slug::ensure_unique(state.tags.as_ref(), &source, None).await?;
    let tag = state.tags.save(Tag::new(name, slug)).await?;

    tracing::info!(tag_id = tag.id, slug = %tag.slug, "Tag created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(views::tag(&tag))))
}

/// PUT /api/tags/{id}
pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdateTagRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut tag = find_tag(&state, &path).await?;

    if let Some(name) = &req.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("name cannot be empty"));
        }
        tag.name = name.to_string();
    }
    if let Some(requested) = &req.slug {
        let source = present(Some(requested.as_str())).unwrap_or_else(|| tag.name.clone());
        tag.slug = slug::ensure_unique(state.tags.as_ref(), &source, Some(tag.id)).await?;
    }
    tag.updated_at = Utc::now();

    let tag = state.tags.save(tag).await?;

    tracing::info!(tag_id = tag.id, slug = %tag.slug, "Tag updated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::tag(&tag))))
}

/// DELETE /api/tags/{id}
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let tag = find_tag(&state, &path).await?;
    let cleared = state
        .tags
        .delete_clearing(tag.id)
        .await
        .map_err(AppError::lookup("tag"))?;

    tracing::info!(tag_id = tag.id, cleared, "Tag deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/tags/{slug}/posts - an ID works too
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let tag = find_tag(&state, &path).await?;
    let filter = PostFilter {
        tag_id: Some(tag.id),
        ..public_filter(&query)
    };

    post_page(&state, filter, PostOrder::RecentlyPublished, &query).await
}
