use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use quill_core::domain::Tag;
use quill_core::error::RepoError;
use quill_core::ports::{SlugLookup, SlugScope, TagRepository};
use quill_core::slug;

use crate::database::entity::post_tag;
use crate::database::entity::tag::{self, Entity as TagEntity};
use crate::database::map_db_err;
use crate::database::sql_base::SqlBaseRepository;

/// SQL tag repository.
pub type SqlTagRepository = SqlBaseRepository<TagEntity>;

/// Trim, drop blanks and collapse names that share a slug, keeping the first
/// spelling and input order.
fn distinct_by_slug(names: &[String]) -> Vec<(String, String)> {
    let mut wanted: Vec<(String, String)> = Vec::with_capacity(names.len());

    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let slug = slug::normalize(name);
        if !wanted.iter().any(|(existing, _)| *existing == slug) {
            wanted.push((slug, name.to_string()));
        }
    }

    wanted
}

#[async_trait]
impl SlugScope for SqlTagRepository {
    async fn count_slug(&self, slug: &str, exclude_id: Option<i32>) -> Result<u64, RepoError> {
        let mut query = TagEntity::find().filter(tag::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(tag::Column::Id.ne(id));
        }

        query.count(&self.db).await.map_err(map_db_err)
    }
}

#[async_trait]
impl SlugLookup<Tag> for SqlTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl TagRepository for SqlTagRepository {
    async fn list_all(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_or_create(&self, names: &[String]) -> Result<Vec<Tag>, RepoError> {
        let mut tags = Vec::new();

        for (slug, name) in distinct_by_slug(names) {
            let existing = TagEntity::find()
                .filter(tag::Column::Slug.eq(slug.as_str()))
                .one(&self.db)
                .await
                .map_err(map_db_err)?;

            let model = match existing {
                Some(model) => model,
                None => {
                    tracing::debug!(%slug, "Creating tag");
                    let active: tag::ActiveModel = Tag::new(name, slug).into();
                    active.insert(&self.db).await.map_err(map_db_err)?
                }
            };

            tags.push(model.into());
        }

        Ok(tags)
    }

    async fn delete_clearing(&self, id: i32) -> Result<u64, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let cleared = post_tag::Entity::delete_many()
            .filter(post_tag::Column::TagId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?
            .rows_affected;

        let deleted = TagEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if deleted.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(tag_id = id, cleared, "Tag deleted");

        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::distinct_by_slug;

    #[test]
    fn collapses_names_sharing_a_slug() {
        let names = vec![
            "Rust".to_string(),
            "  ".to_string(),
            "rust".to_string(),
            "Web Dev".to_string(),
            "web-dev".to_string(),
        ];

        let wanted = distinct_by_slug(&names);
        assert_eq!(
            wanted,
            vec![
                ("rust".to_string(), "Rust".to_string()),
                ("web-dev".to_string(), "Web Dev".to_string()),
            ]
        );
    }
}
