use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - represents a registered author or commenter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, not yet persisted user.
    ///
    /// The ID is left at 0 and assigned by the database. A blank display name
    /// falls back to the username.
    pub fn new(
        username: String,
        email: Option<String>,
        password_hash: String,
        display_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let display_name = display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| username.clone());

        Self {
            id: 0,
            username,
            email,
            password_hash,
            display_name,
            bio: String::new(),
            avatar_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Name shown next to content this user writes.
    pub fn author_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}
