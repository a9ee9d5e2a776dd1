//! SeaORM entities, one module per table.

pub mod category;
pub mod comment;
pub mod post;
pub mod post_tag;
pub mod tag;
pub mod user;

use sea_orm::ActiveValue;

/// Unsaved domain entities carry ID 0; leave the key to the database.
pub(crate) fn key(id: i32) -> ActiveValue<i32> {
    if id == 0 {
        ActiveValue::NotSet
    } else {
        ActiveValue::Set(id)
    }
}
