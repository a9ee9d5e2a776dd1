use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, CommentWithUser, Tag, User};
use crate::error::DomainError;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    /// Lenient conversion used for client input: anything unrecognized is a draft.
    pub fn sanitize(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(DomainError::InvalidInput(format!(
                "unknown post status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post entity - a blog post or article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub slug: String,
    pub status: PostStatus,
    pub cover_image: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft. The slug must already be unique among posts.
    pub fn new(author_id: i32, title: String, content: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            author_id,
            category_id: None,
            title,
            summary: String::new(),
            content,
            slug,
            status: PostStatus::Draft,
            cover_image: String::new(),
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the status of a post being created.
    ///
    /// Published posts get the requested publication time, or `now`.
    pub fn set_initial_status(
        &mut self,
        status: PostStatus,
        requested_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) {
        self.status = status;
        self.published_at = match status {
            PostStatus::Published => Some(requested_at.unwrap_or(now)),
            PostStatus::Draft | PostStatus::Archived => None,
        };
    }

    /// Apply the status part of an update.
    ///
    /// Entering `published` keeps an existing publication time unless one is
    /// requested, and falls back to `now`. Entering `draft` clears it.
    /// `archived` leaves it untouched. A requested time is also honoured when
    /// no status change is asked for but the post is already published.
    pub fn apply_status_change(
        &mut self,
        status: Option<PostStatus>,
        requested_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) {
        if let Some(status) = status {
            self.status = status;
            match status {
                PostStatus::Published => {
                    if requested_at.is_none() && self.published_at.is_none() {
                        self.published_at = Some(now);
                    }
                }
                PostStatus::Draft => self.published_at = None,
                PostStatus::Archived => {}
            }
        }

        if let Some(requested_at) = requested_at {
            if self.status == PostStatus::Published {
                self.published_at = Some(requested_at);
            }
        }
    }

    /// Published posts are public; anything else is visible to its author only.
    pub fn is_visible_to(&self, viewer: Option<i32>) -> bool {
        self.status == PostStatus::Published || viewer == Some(self.author_id)
    }

    /// Hidden posts are reported as missing rather than forbidden.
    pub fn ensure_visible_to(&self, viewer: Option<i32>) -> Result<(), DomainError> {
        if self.is_visible_to(viewer) {
            Ok(())
        } else {
            Err(DomainError::NotFound {
                entity_type: "post",
            })
        }
    }

    pub fn ensure_owned_by(&self, user_id: i32) -> Result<(), DomainError> {
        if self.author_id == user_id {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "only the author may modify this post".to_string(),
            ))
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// A post with its relations loaded for presentation.
#[derive(Debug, Clone)]
pub struct PostDetails {
    pub post: Post,
    pub author: User,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    /// Approved comments, oldest first. Empty in listings.
    pub comments: Vec<CommentWithUser>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn post() -> Post {
        let mut post = Post::new(1, "Title".into(), "Body".into(), "title".into());
        post.id = 10;
        post
    }

    #[test]
    fn sanitize_coerces_unknown_values_to_draft() {
        assert_eq!(PostStatus::sanitize("Published"), PostStatus::Published);
        assert_eq!(PostStatus::sanitize("ARCHIVED"), PostStatus::Archived);
        assert_eq!(PostStatus::sanitize("scheduled"), PostStatus::Draft);
        assert_eq!(PostStatus::sanitize(""), PostStatus::Draft);
    }

    #[test]
    fn strict_parse_rejects_unknown_values() {
        assert!("published".parse::<PostStatus>().is_ok());
        assert!(matches!(
            "scheduled".parse::<PostStatus>(),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn creating_published_without_time_uses_now() {
        let now = Utc::now();
        let mut post = post();
        post.set_initial_status(PostStatus::Published, None, now);
        assert_eq!(post.published_at, Some(now));
    }

    #[test]
    fn creating_published_with_time_keeps_it() {
        let now = Utc::now();
        let requested = now - TimeDelta::days(2);
        let mut post = post();
        post.set_initial_status(PostStatus::Published, Some(requested), now);
        assert_eq!(post.published_at, Some(requested));
    }

    #[test]
    fn creating_draft_leaves_publication_time_empty() {
        let now = Utc::now();
        let mut post = post();
        post.set_initial_status(PostStatus::Draft, Some(now), now);
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.published_at, None);
    }

    #[test]
    fn draft_clears_and_republish_sets_now() {
        let first = Utc::now() - TimeDelta::hours(5);
        let mut post = post();
        post.set_initial_status(PostStatus::Published, None, first);

        post.apply_status_change(Some(PostStatus::Draft), None, Utc::now());
        assert_eq!(post.published_at, None);

        let later = Utc::now();
        post.apply_status_change(Some(PostStatus::Published), None, later);
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.published_at, Some(later));
    }

    #[test]
    fn republishing_keeps_existing_publication_time() {
        let first = Utc::now() - TimeDelta::hours(5);
        let mut post = post();
        post.set_initial_status(PostStatus::Published, None, first);

        post.apply_status_change(Some(PostStatus::Published), None, Utc::now());
        assert_eq!(post.published_at, Some(first));
    }

    #[test]
    fn archiving_leaves_publication_time_untouched() {
        let first = Utc::now() - TimeDelta::hours(5);
        let mut post = post();
        post.set_initial_status(PostStatus::Published, None, first);

        post.apply_status_change(Some(PostStatus::Archived), Some(Utc::now()), Utc::now());
        assert_eq!(post.status, PostStatus::Archived);
        assert_eq!(post.published_at, Some(first));
    }

    #[test]
    fn requested_time_alone_overrides_on_published_post() {
        let now = Utc::now();
        let requested = now + TimeDelta::days(1);
        let mut post = post();
        post.set_initial_status(PostStatus::Published, None, now);

        post.apply_status_change(None, Some(requested), now);
        assert_eq!(post.published_at, Some(requested));
    }

    #[test]
    fn requested_time_alone_is_ignored_on_draft() {
        let now = Utc::now();
        let mut post = post();
        post.apply_status_change(None, Some(now), now);
        assert_eq!(post.published_at, None);
    }

    #[test]
    fn visibility_depends_on_status_and_ownership() {
        let mut post = post();
        assert!(!post.is_visible_to(None));
        assert!(!post.is_visible_to(Some(2)));
        assert!(post.is_visible_to(Some(1)));
        assert!(matches!(
            post.ensure_visible_to(Some(2)),
            Err(DomainError::NotFound { entity_type: "post" })
        ));

        post.set_initial_status(PostStatus::Published, None, Utc::now());
        assert!(post.is_visible_to(None));
    }

    #[test]
    fn only_author_owns_post() {
        let post = post();
        assert!(post.ensure_owned_by(1).is_ok());
        assert!(matches!(
            post.ensure_owned_by(2),
            Err(DomainError::Forbidden(_))
        ));
    }
}
