use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag entity. Tags are shared between posts and outlive them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            slug,
            created_at: now,
            updated_at: now,
        }
    }
}
