//! Category handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use quill_core::domain::Category;
use quill_core::lookup;
use quill_core::ports::{PostFilter, PostOrder};
use quill_core::slug;
use quill_shared::ApiResponse;
use quill_shared::dto::{CategoryRequest, PostListQuery, UpdateCategoryRequest};

use super::posts::{post_page, present, public_filter};
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn find_category(state: &AppState, param: &str) -> AppResult<Category> {
    lookup::resolve(state.categories.as_ref(), param)
        .await
        .map_err(AppError::lookup("category"))
}

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list_all().await?;
    let data: Vec<_> = categories.iter().map(views::category).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(data)))
}

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("name is required"));
    }

    let source = present(req.slug.as_deref()).unwrap_or_else(|| name.clone());
    let slug = slug::ensure_unique(state.categories.as_ref(), &source, None).await?;
    let description = req.description.unwrap_or_default().trim().to_string();

    let category = state
        .categories
        .save(Category::new(name, slug, description))
        .await?;

    tracing::info!(category_id = category.id, slug = %category.slug, "Category created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(views::category(&category))))
}

/// PUT /api/categories/{id} - accepts an ID or a slug
pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut category = find_category(&state, &path).await?;

    if let Some(name) = &req.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("name cannot be empty"));
        }
        category.name = name.to_string();
    }
    if let Some(requested) = &req.slug {
        let source = present(Some(requested.as_str())).unwrap_or_else(|| category.name.clone());
        category.slug =
            slug::ensure_unique(state.categories.as_ref(), &source, Some(category.id)).await?;
    }
    if let Some(description) = &req.description {
        category.description = description.trim().to_string();
    }
    category.updated_at = Utc::now();

    let category = state.categories.save(category).await?;

    tracing::info!(category_id = category.id, "Category updated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::category(&category))))
}

/// DELETE /api/categories/{id}
///
/// Posts in the category survive without one.
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let category = find_category(&state, &path).await?;
    let detached = state
        .categories
        .delete_detaching(category.id)
        .await
        .map_err(AppError::lookup("category"))?;

    tracing::info!(category_id = category.id, detached, "Category deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/categories/{id}/posts
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let category = find_category(&state, &path).await?;
    let filter = PostFilter {
        category_id: Some(category.id),
        ..public_filter(&query)
    };

    post_page(&state, filter, PostOrder::RecentlyPublished, &query).await
}
