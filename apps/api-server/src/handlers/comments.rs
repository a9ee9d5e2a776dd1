//! Comment handlers, nested under a post.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Comment, CommentWithUser};
use quill_core::error::DomainError;
use quill_shared::ApiResponse;
use quill_shared::dto::CommentRequest;

use super::posts::{find_post, present};
use super::views;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts/{id}/comments
///
/// Oldest first. The post's author also sees unapproved comments.
pub async fn list(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, &path).await?;
    post.ensure_visible_to(viewer.user_id())?;

    let approved_only = viewer.user_id() != Some(post.author_id);
    let comments = state.comments.list_for_post(post.id, approved_only).await?;

    let data: Vec<_> = comments.iter().map(views::comment).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(data)))
}

/// POST /api/posts/{id}/comments
pub async fn create(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = find_post(&state, &path).await?;
    post.ensure_visible_to(viewer.user_id())?;

    let text = req.body.trim();
    if text.is_empty() {
        return Err(AppError::bad_request("comment body is required"));
    }

    let (comment, user) = match viewer.user_id() {
        Some(user_id) => {
            let user = state
                .users
                .find_by_id(user_id)
                .await?
                .ok_or(DomainError::Unauthorized)?;
            (Comment::by_user(post.id, &user, text.to_string()), Some(user))
        }
        None => {
            let name = present(req.author_name.as_deref())
                .ok_or_else(|| AppError::bad_request("authorName is required for guests"))?;
            (Comment::by_guest(post.id, name, text.to_string()), None)
        }
    };

    let comment = state.comments.save(comment).await?;

    tracing::info!(
        post_id = post.id,
        comment_id = comment.id,
        guest = user.is_none(),
        "Comment added"
    );

    let created = CommentWithUser { comment, user };
    Ok(HttpResponse::Created().json(ApiResponse::ok(views::comment(&created))))
}
