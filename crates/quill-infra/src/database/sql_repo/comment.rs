use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use quill_core::domain::{CommentWithUser, User};
use quill_core::error::RepoError;
use quill_core::ports::CommentRepository;

use crate::database::entity::comment::{self, Entity as CommentEntity};
use crate::database::entity::user;
use crate::database::map_db_err;
use crate::database::sql_base::SqlBaseRepository;

/// SQL comment repository.
pub type SqlCommentRepository = SqlBaseRepository<CommentEntity>;

/// Comments of a post, oldest first, with the accounts that wrote them.
pub(crate) async fn load_comments<C>(
    db: &C,
    post_id: i32,
    approved_only: bool,
) -> Result<Vec<CommentWithUser>, RepoError>
where
    C: ConnectionTrait,
{
    let mut query = CommentEntity::find().filter(comment::Column::PostId.eq(post_id));
    if approved_only {
        query = query.filter(comment::Column::Approved.eq(true));
    }

    let comments = query
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
        .all(db)
        .await
        .map_err(map_db_err)?;

    let user_ids: BTreeSet<i32> = comments.iter().filter_map(|c| c.user_id).collect();
    let users: HashMap<i32, User> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|model| (model.id, model.into()))
            .collect()
    };

    Ok(comments
        .into_iter()
        .map(|model| {
            let user = model.user_id.and_then(|id| users.get(&id).cloned());
            CommentWithUser {
                comment: model.into(),
                user,
            }
        })
        .collect())
}

#[async_trait]
impl CommentRepository for SqlCommentRepository {
    async fn list_for_post(
        &self,
        post_id: i32,
        approved_only: bool,
    ) -> Result<Vec<CommentWithUser>, RepoError> {
        load_comments(&self.db, post_id, approved_only).await
    }
}
