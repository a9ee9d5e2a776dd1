//! Mapping from domain values to response bodies.

use quill_core::domain::{Category, CommentWithUser, PostDetails, Tag, User};
use quill_shared::dto::{CategoryResponse, CommentResponse, PostResponse, TagResponse, UserResponse};

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Public profile. Email is only shown to the account owner.
pub fn user(user: &User, include_email: bool) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone().filter(|_| include_email),
        display_name: user.author_name().to_string(),
        bio: non_empty(&user.bio),
        avatar_url: non_empty(&user.avatar_url),
        created_at: user.created_at,
    }
}

pub fn category(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name.clone(),
        slug: category.slug.clone(),
        description: non_empty(&category.description),
        created_at: category.created_at,
    }
}

pub fn tag(tag: &Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        name: tag.name.clone(),
        slug: tag.slug.clone(),
        created_at: tag.created_at,
    }
}

pub fn comment(entry: &CommentWithUser) -> CommentResponse {
    let comment = &entry.comment;
    CommentResponse {
        id: comment.id,
        author_name: comment.author_name.clone(),
        body: comment.body.clone(),
        approved: comment.approved,
        created_at: comment.created_at,
        user: entry.user.as_ref().map(|u| user(u, false)),
    }
}

/// Full post view. Listings pass `include_content = false` to keep pages small.
pub fn post(details: PostDetails, include_content: bool) -> PostResponse {
    let PostDetails {
        post,
        author,
        category: post_category,
        tags,
        comments,
    } = details;

    PostResponse {
        id: post.id,
        title: post.title,
        summary: post.summary,
        content: if include_content {
            post.content
        } else {
            String::new()
        },
        slug: post.slug,
        status: post.status.to_string(),
        cover_image: non_empty(&post.cover_image),
        published_at: post.published_at,
        author: user(&author, false),
        category: post_category.as_ref().map(category),
        tags: tags.iter().map(tag).collect(),
        comments: comments.iter().map(comment).collect(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use quill_core::domain::{Comment, Post, PostStatus};

    use super::*;

    fn author() -> User {
        let mut author = User::new(
            "alice".into(),
            Some("alice@example.com".into()),
            "hash".into(),
            None,
        );
        author.id = 1;
        author
    }

    #[test]
    fn email_is_opt_in() {
        let author = author();
        assert_eq!(user(&author, false).email, None);
        assert_eq!(
            user(&author, true).email.as_deref(),
            Some("alice@example.com")
        );
    }

    #[test]
    fn listing_view_drops_content() {
        let mut post = Post::new(1, "Title".into(), "Body".into(), "title".into());
        post.status = PostStatus::Published;
        let details = PostDetails {
            post,
            author: author(),
            category: None,
            tags: vec![Tag::new("Rust".into(), "rust".into())],
            comments: vec![CommentWithUser {
                comment: Comment::by_guest(0, "Visitor".into(), "Hi".into()),
                user: None,
            }],
        };

        let listed = super::post(details.clone(), false);
        assert_eq!(listed.content, "");
        assert_eq!(listed.status, "published");
        assert_eq!(listed.tags[0].slug, "rust");
        assert_eq!(listed.author.email, None);

        let full = super::post(details, true);
        assert_eq!(full.content, "Body");
        assert_eq!(full.comments[0].author_name, "Visitor");
    }
}
