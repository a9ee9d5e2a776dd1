//! Domain entities - the core business objects.

mod category;
mod comment;
mod post;
mod tag;
mod user;

pub use category::Category;
pub use comment::{Comment, CommentWithUser};
pub use post::{Post, PostDetails, PostStatus};
pub use tag::Tag;
pub use user::User;
