use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::sea_query::{Query, SelectStatement, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, TransactionTrait,
};

use quill_core::domain::{Category, Post, PostDetails, Tag, User};
use quill_core::error::RepoError;
use quill_core::pagination::{Page, Pagination};
use quill_core::ports::{PostFilter, PostOrder, PostRepository, SlugLookup, SlugScope};

use super::comment::load_comments;
use crate::database::entity::post::{self, Entity as PostEntity};
use crate::database::entity::{category, comment, post_tag, tag, user};
use crate::database::map_db_err;
use crate::database::sql_base::SqlBaseRepository;

/// SQL post repository.
pub type SqlPostRepository = SqlBaseRepository<PostEntity>;

fn category_ids_with_slug(slug: &str) -> SelectStatement {
    Query::select()
        .column(category::Column::Id)
        .from(category::Entity)
        .and_where(category::Column::Slug.eq(slug))
        .to_owned()
}

fn tag_ids_with_slug(slug: &str) -> SelectStatement {
    Query::select()
        .column(tag::Column::Id)
        .from(tag::Entity)
        .and_where(tag::Column::Slug.eq(slug))
        .to_owned()
}

fn post_ids_tagged(condition: SimpleExpr) -> SelectStatement {
    Query::select()
        .column(post_tag::Column::PostId)
        .from(post_tag::Entity)
        .and_where(condition)
        .to_owned()
}

fn user_ids_named(username: &str) -> SelectStatement {
    Query::select()
        .column(user::Column::Id)
        .from(user::Entity)
        .and_where(user::Column::Username.eq(username))
        .to_owned()
}

fn apply_filter(mut query: Select<PostEntity>, filter: &PostFilter) -> Select<PostEntity> {
    if let Some(status) = filter.status {
        query = query.filter(post::Column::Status.eq(status.as_str()));
    }
    if let Some(author_id) = filter.author_id {
        query = query.filter(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(post::Column::CategoryId.eq(category_id));
    }
    if let Some(slug) = &filter.category_slug {
        query = query.filter(post::Column::CategoryId.in_subquery(category_ids_with_slug(slug)));
    }
    if let Some(tag_id) = filter.tag_id {
        let tagged = post_ids_tagged(post_tag::Column::TagId.eq(tag_id));
        query = query.filter(post::Column::Id.in_subquery(tagged));
    }
    if let Some(slug) = &filter.tag_slug {
        let tagged = post_ids_tagged(post_tag::Column::TagId.in_subquery(tag_ids_with_slug(slug)));
        query = query.filter(post::Column::Id.in_subquery(tagged));
    }
    if let Some(username) = &filter.author_username {
        query = query.filter(post::Column::AuthorId.in_subquery(user_ids_named(username)));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(post::Column::Title.contains(search))
                .add(post::Column::Summary.contains(search)),
        );
    }

    query
}

fn apply_order(query: Select<PostEntity>, order: PostOrder) -> Select<PostEntity> {
    let query = match order {
        PostOrder::Newest => query.order_by_desc(post::Column::CreatedAt),
        PostOrder::RecentlyPublished => query
            .order_by_desc(post::Column::PublishedAt)
            .order_by_desc(post::Column::CreatedAt),
    };

    query.order_by_desc(post::Column::Id)
}

impl SqlPostRepository {
    /// Load authors, categories and tags for a batch of posts.
    async fn attach_relations(&self, posts: Vec<Post>) -> Result<Vec<PostDetails>, RepoError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let author_ids: BTreeSet<i32> = posts.iter().map(|p| p.author_id).collect();
        let authors: HashMap<i32, User> = user::Entity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|model| (model.id, model.into()))
            .collect();

        let category_ids: BTreeSet<i32> = posts.iter().filter_map(|p| p.category_id).collect();
        let categories: HashMap<i32, Category> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            category::Entity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(&self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|model| (model.id, model.into()))
                .collect()
        };

        let post_ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
        let links = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let tag_ids: BTreeSet<i32> = links.iter().map(|l| l.tag_id).collect();
        let tags: HashMap<i32, Tag> = if tag_ids.is_empty() {
            HashMap::new()
        } else {
            tag::Entity::find()
                .filter(tag::Column::Id.is_in(tag_ids))
                .all(&self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|model| (model.id, model.into()))
                .collect()
        };

        let mut tags_by_post: HashMap<i32, Vec<Tag>> = HashMap::new();
        for link in links {
            if let Some(tag) = tags.get(&link.tag_id) {
                tags_by_post.entry(link.post_id).or_default().push(tag.clone());
            }
        }

        posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!(
                        "author {} of post {} is missing",
                        post.author_id, post.id
                    ))
                })?;
                let category = post.category_id.and_then(|id| categories.get(&id).cloned());
                let mut tags = tags_by_post.remove(&post.id).unwrap_or_default();
                tags.sort_by(|a, b| a.name.cmp(&b.name));

                Ok(PostDetails {
                    post,
                    author,
                    category,
                    tags,
                    comments: Vec::new(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl SlugScope for SqlPostRepository {
    async fn count_slug(&self, slug: &str, exclude_id: Option<i32>) -> Result<u64, RepoError> {
        let mut query = PostEntity::find().filter(post::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(post::Column::Id.ne(id));
        }

        query.count(&self.db).await.map_err(map_db_err)
    }
}

#[async_trait]
impl SlugLookup<Post> for SqlPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for SqlPostRepository {
    async fn list(
        &self,
        filter: &PostFilter,
        order: PostOrder,
        pagination: Pagination,
    ) -> Result<Page<PostDetails>, RepoError> {
        tracing::debug!(?filter, ?order, page = pagination.page, "Listing posts");

        let query = apply_filter(PostEntity::find(), filter);
        let total = query.clone().count(&self.db).await.map_err(map_db_err)?;

        let models = apply_order(query, order)
            .offset(pagination.offset())
            .limit(pagination.page_size)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let posts = models.into_iter().map(Into::into).collect();
        let items = self.attach_relations(posts).await?;

        Ok(Page {
            items,
            total,
            pagination,
        })
    }

    async fn load_details(&self, post: Post, with_comments: bool) -> Result<PostDetails, RepoError> {
        let post_id = post.id;
        let mut details = self
            .attach_relations(vec![post])
            .await?
            .pop()
            .ok_or(RepoError::NotFound)?;

        if with_comments {
            details.comments = load_comments(&self.db, post_id, true).await?;
        }

        Ok(details)
    }

    async fn replace_tags(&self, post_id: i32, tag_ids: &[i32]) -> Result<(), RepoError> {
        let unique: BTreeSet<i32> = tag_ids.iter().copied().collect();
        let txn = self.db.begin().await.map_err(map_db_err)?;

        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if !unique.is_empty() {
            let links = unique.into_iter().map(|tag_id| post_tag::ActiveModel {
                post_id: sea_orm::Set(post_id),
                tag_id: sea_orm::Set(tag_id),
            });
            post_tag::Entity::insert_many(links)
                .exec_without_returning(&txn)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)
    }

    async fn delete_with_children(&self, id: i32) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let comments = comment::Entity::delete_many()
            .filter(comment::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?
            .rows_affected;

        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let deleted = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if deleted.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(post_id = id, comments, "Post deleted");

        Ok(())
    }
}
