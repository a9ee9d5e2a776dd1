//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    CategoryRepository, CommentRepository, PasswordService, PostRepository, TagRepository,
    TokenService, UserRepository,
};
use quill_infra::{
    DatabaseConnection, SqlCategoryRepository, SqlCommentRepository, SqlPostRepository,
    SqlTagRepository, SqlUserRepository,
};

/// Shared application state. Immutable once built; handlers only read it.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Wire the SQL repositories onto an open connection pool.
    pub fn new(
        db: DatabaseConnection,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        tracing::info!("Application state initialized");

        Self {
            users: Arc::new(SqlUserRepository::new(db.clone())),
            posts: Arc::new(SqlPostRepository::new(db.clone())),
            categories: Arc::new(SqlCategoryRepository::new(db.clone())),
            tags: Arc::new(SqlTagRepository::new(db.clone())),
            comments: Arc::new(SqlCommentRepository::new(db)),
            tokens,
            passwords,
        }
    }
}
