use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use quill_core::domain::Category;
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, SlugLookup, SlugScope};

use crate::database::entity::category::{self, Entity as CategoryEntity};
use crate::database::entity::post;
use crate::database::map_db_err;
use crate::database::sql_base::SqlBaseRepository;

/// SQL category repository.
pub type SqlCategoryRepository = SqlBaseRepository<CategoryEntity>;

#[async_trait]
impl SlugScope for SqlCategoryRepository {
    async fn count_slug(&self, slug: &str, exclude_id: Option<i32>) -> Result<u64, RepoError> {
        let mut query = CategoryEntity::find().filter(category::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(category::Column::Id.ne(id));
        }

        query.count(&self.db).await.map_err(map_db_err)
    }
}

#[async_trait]
impl SlugLookup<Category> for SqlCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for SqlCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_detaching(&self, id: i32) -> Result<u64, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let detached = post::Entity::update_many()
            .col_expr(post::Column::CategoryId, Expr::value(Option::<i32>::None))
            .filter(post::Column::CategoryId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?
            .rows_affected;

        let deleted = CategoryEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if deleted.rows_affected == 0 {
            // Dropping the transaction rolls it back.
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(category_id = id, detached, "Category deleted");

        Ok(detached)
    }
}
