//! Database connection management and SeaORM repositories.

mod connections;
mod sql_base;
mod sql_repo;

pub mod entity;

pub use connections::{DatabaseConfig, connect};
pub use sea_orm::DatabaseConnection;
pub use sql_base::SqlBaseRepository;
pub(crate) use sql_base::map_db_err;
pub use sql_repo::{
    SqlCategoryRepository, SqlCommentRepository, SqlPostRepository, SqlTagRepository,
    SqlUserRepository,
};

#[cfg(test)]
mod tests;
