use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Comment on a post, written either by a registered user or by a guest.
///
/// There is no moderation flow yet: every comment is created approved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub user_id: Option<i32>,
    pub author_name: String,
    pub body: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Comment by an authenticated user, signed with their display name.
    pub fn by_user(post_id: i32, user: &User, body: String) -> Self {
        Self::build(post_id, Some(user.id), user.author_name().to_string(), body)
    }

    /// Comment by a guest, identified only by the name they typed.
    pub fn by_guest(post_id: i32, author_name: String, body: String) -> Self {
        Self::build(post_id, None, author_name, body)
    }

    fn build(post_id: i32, user_id: Option<i32>, author_name: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            post_id,
            user_id,
            author_name,
            body,
            approved: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A comment together with its author account, if any.
#[derive(Debug, Clone)]
pub struct CommentWithUser {
    pub comment: Comment,
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_comment_uses_display_name_and_is_approved() {
        let mut user = User::new("carol".into(), None, "hash".into(), Some("Carol".into()));
        user.id = 7;

        let comment = Comment::by_user(3, &user, "Nice post".into());

        assert_eq!(comment.user_id, Some(7));
        assert_eq!(comment.author_name, "Carol");
        assert!(comment.approved);
    }

    #[test]
    fn guest_comment_has_no_user() {
        let comment = Comment::by_guest(3, "Visitor".into(), "Hi".into());
        assert_eq!(comment.user_id, None);
        assert!(comment.approved);
    }
}
