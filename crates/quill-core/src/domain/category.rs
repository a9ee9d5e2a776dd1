use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity - an editor-curated grouping of posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category. The slug must already be normalized and unique.
    pub fn new(name: String, slug: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            slug,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}
