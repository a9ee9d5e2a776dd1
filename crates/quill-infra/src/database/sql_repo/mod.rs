//! SeaORM implementations of the repository ports.

mod category;
mod comment;
mod post;
mod tag;
mod user;

pub use category::SqlCategoryRepository;
pub use comment::SqlCommentRepository;
pub use post::SqlPostRepository;
pub use tag::SqlTagRepository;
pub use user::SqlUserRepository;
