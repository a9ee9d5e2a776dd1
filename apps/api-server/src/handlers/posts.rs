//! Post handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use quill_core::domain::{Category, Post, PostStatus};
use quill_core::error::DomainError;
use quill_core::lookup;
use quill_core::pagination::Pagination;
use quill_core::ports::{PostFilter, PostOrder};
use quill_core::slug;
use quill_shared::dto::{CreatePostRequest, PostListQuery, UpdatePostRequest};
use quill_shared::{ApiResponse, PageResponse};

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Trimmed value, or `None` when absent or blank.
pub(super) fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Filters shared by every listing, taken from the query string.
pub(super) fn filter_from_query(query: &PostListQuery) -> PostFilter {
    PostFilter {
        category_slug: present(query.category.as_deref()),
        tag_slug: present(query.tag.as_deref()),
        author_username: present(query.author.as_deref()),
        search: present(query.search.as_deref()),
        ..PostFilter::default()
    }
}

/// Published posts only, whatever the query asked for.
pub(super) fn public_filter(query: &PostListQuery) -> PostFilter {
    PostFilter {
        status: Some(PostStatus::Published),
        ..filter_from_query(query)
    }
}

pub(super) async fn post_page(
    state: &AppState,
    filter: PostFilter,
    order: PostOrder,
    query: &PostListQuery,
) -> AppResult<HttpResponse> {
    let pagination = Pagination::from_params(query.page.as_deref(), query.page_size.as_deref());
    let include_content = query.include_content();

    let page = state
        .posts
        .list(&filter, order, pagination)
        .await?
        .map(|details| views::post(details, include_content));

    Ok(HttpResponse::Ok().json(PageResponse::new(
        page.items,
        page.pagination.page,
        page.pagination.page_size,
        page.total,
    )))
}

pub(super) async fn find_post(state: &AppState, param: &str) -> AppResult<Post> {
    lookup::resolve(state.posts.as_ref(), param)
        .await
        .map_err(AppError::lookup("post"))
}

async fn category_by_id(state: &AppState, id: i32) -> AppResult<Category> {
    state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::bad_request("category not found"))
}

async fn category_by_slug(state: &AppState, slug: &str) -> AppResult<Category> {
    state
        .categories
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::bad_request("category not found"))
}

async fn attach_tags(state: &AppState, post_id: i32, names: &[String]) -> AppResult<()> {
    let tags = state.tags.find_or_create(names).await?;
    let ids: Vec<i32> = tags.iter().map(|t| t.id).collect();
    state.posts.replace_tags(post_id, &ids).await?;
    Ok(())
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    post_page(
        &state,
        public_filter(&query),
        PostOrder::RecentlyPublished,
        &query,
    )
    .await
}

/// GET /api/posts/{id} - accepts an ID or a slug
pub async fn get(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, &path).await?;
    post.ensure_visible_to(viewer.user_id())?;

    let details = state.posts.load_details(post, true).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post(details, true))))
}

/// GET /api/posts/slug/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_slug(path.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;
    post.ensure_visible_to(viewer.user_id())?;

    let details = state.posts.load_details(post, true).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post(details, true))))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let title = req.title.trim().to_string();
    if title.is_empty() || req.content.trim().is_empty() {
        return Err(AppError::bad_request("title and content are required"));
    }

    let author = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(DomainError::Unauthorized)?;

    let category = match (req.category_id, present(req.category_slug.as_deref())) {
        (Some(id), _) if id > 0 => Some(category_by_id(&state, id).await?),
        (_, Some(slug)) => Some(category_by_slug(&state, &slug).await?),
        _ => None,
    };

    let source = present(req.slug.as_deref()).unwrap_or_else(|| title.clone());
    let slug = slug::resolve_unique(state.posts.as_ref(), &source, None).await?;

    let mut post = Post::new(author.id, title, req.content, slug);
    post.summary = req.summary.unwrap_or_default();
    post.cover_image = req.cover_image.unwrap_or_default();
    post.category_id = category.map(|c| c.id);

    let status = req
        .status
        .as_deref()
        .map(PostStatus::sanitize)
        .unwrap_or_default();
    post.set_initial_status(status, req.published_at, Utc::now());

    let post = state.posts.save(post).await?;
    if let Some(names) = &req.tags {
        attach_tags(&state, post.id, names).await?;
    }

    tracing::info!(post_id = post.id, slug = %post.slug, status = %post.status, "Post created");

    let details = state.posts.load_details(post, true).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(views::post(details, true))))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut post = find_post(&state, &path).await?;
    post.ensure_owned_by(identity.user_id)?;

    if let Some(title) = &req.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::bad_request("title cannot be empty"));
        }
        post.title = title.to_string();
    }
    if let Some(summary) = req.summary {
        post.summary = summary;
    }
    if let Some(content) = req.content {
        if content.trim().is_empty() {
            return Err(AppError::bad_request("content cannot be empty"));
        }
        post.content = content;
    }
    if let Some(cover_image) = req.cover_image {
        post.cover_image = cover_image;
    }

    // An empty slug asks for a fresh one derived from the title
    if let Some(requested) = &req.slug {
        let source = present(Some(requested.as_str())).unwrap_or_else(|| post.title.clone());
        post.slug = slug::resolve_unique(state.posts.as_ref(), &source, Some(post.id)).await?;
    }

    // `categoryId` wins over `categorySlug`; zero or empty detaches
    if let Some(id) = req.category_id {
        post.category_id = if id > 0 {
            Some(category_by_id(&state, id).await?.id)
        } else {
            None
        };
    } else if let Some(slug) = &req.category_slug {
        post.category_id = match present(Some(slug.as_str())) {
            Some(slug) => Some(category_by_slug(&state, &slug).await?.id),
            None => None,
        };
    }

    let now = Utc::now();
    let status = req.status.as_deref().map(PostStatus::sanitize);
    post.apply_status_change(status, req.published_at, now);
    post.touch(now);

    let post = state.posts.save(post).await?;
    if let Some(names) = &req.tags {
        attach_tags(&state, post.id, names).await?;
    }

    tracing::info!(post_id = post.id, status = %post.status, "Post updated");

    let details = state.posts.load_details(post, true).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post(details, true))))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, &path).await?;
    post.ensure_owned_by(identity.user_id)?;

    state
        .posts
        .delete_with_children(post.id)
        .await
        .map_err(AppError::lookup("post"))?;

    tracing::info!(post_id = post.id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}
