//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase on the wire. Optional request fields follow
//! absent-means-unchanged semantics on updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub slug: Option<String>,
    pub cover_image: Option<String>,
    pub category_id: Option<i32>,
    pub category_slug: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Partial post update. `categoryId: 0` or `categorySlug: ""` detaches the
/// category; `slug: ""` re-derives the slug from the title.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub slug: Option<String>,
    pub cover_image: Option<String>,
    pub category_id: Option<i32>,
    pub category_slug: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagRequest {
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// A new comment. `authorName` is only read for guests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub author_name: Option<String>,
    #[serde(default)]
    pub body: String,
}

/// Query string of post listings. Everything stays a string so malformed
/// values fall back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub include_content: Option<String>,
}

impl PostListQuery {
    pub fn include_content(&self) -> bool {
        self.include_content.as_deref() == Some("true")
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i32,
    pub author_name: String,
    pub body: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub summary: String,
    /// Empty in listings unless `includeContent=true`.
    pub content: String,
    pub slug: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub author: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryResponse>,
    pub tags: Vec<TagResponse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response containing an access token and the account it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Service liveness report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_distinguishes_absent_from_empty() {
        let req: UpdatePostRequest =
            serde_json::from_str(r#"{"slug": "", "categoryId": 0}"#).unwrap();

        assert_eq!(req.slug.as_deref(), Some(""));
        assert_eq!(req.category_id, Some(0));
        assert!(req.title.is_none());
        assert!(req.tags.is_none());
    }

    #[test]
    fn user_response_omits_private_and_empty_fields() {
        let user = UserResponse {
            id: 1,
            username: "alice".into(),
            email: None,
            display_name: "Alice".into(),
            bio: None,
            avatar_url: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["displayName"], "Alice");
        assert!(json.get("email").is_none());
        assert!(json.get("avatarUrl").is_none());
    }

    #[test]
    fn list_query_reads_camel_case_keys() {
        let query: PostListQuery =
            serde_json::from_str(r#"{"pageSize": "5", "includeContent": "true"}"#).unwrap();

        assert_eq!(query.page_size.as_deref(), Some("5"));
        assert!(query.include_content());
    }
}
