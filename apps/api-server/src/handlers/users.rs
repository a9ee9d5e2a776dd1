//! Handlers for the authenticated user's own resources.

use actix_web::{HttpResponse, web};

use quill_core::domain::PostStatus;
use quill_core::ports::{PostFilter, PostOrder};
use quill_shared::ApiResponse;
use quill_shared::dto::PostListQuery;

use super::posts::{filter_from_query, post_page, present};
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::user(&user, true))))
}

/// `all` or nothing means every status.
fn status_filter(value: Option<&str>) -> AppResult<Option<PostStatus>> {
    match present(value) {
        None => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => Ok(Some(value.parse()?)),
    }
}

/// GET /api/me/posts - every status, newest first
pub async fn my_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let filter = PostFilter {
        status: status_filter(query.status.as_deref())?,
        author_id: Some(identity.user_id),
        ..filter_from_query(&query)
    };

    post_page(&state, filter, PostOrder::Newest, &query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_accepts_all_and_names() {
        assert_eq!(status_filter(None).unwrap(), None);
        assert_eq!(status_filter(Some("all")).unwrap(), None);
        assert_eq!(status_filter(Some(" ")).unwrap(), None);
        assert_eq!(
            status_filter(Some("Draft")).unwrap(),
            Some(PostStatus::Draft)
        );
        assert!(matches!(
            status_filter(Some("scheduled")),
            Err(AppError::BadRequest(_))
        ));
    }
}
