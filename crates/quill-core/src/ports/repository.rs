use async_trait::async_trait;

use crate::domain::{Category, Comment, CommentWithUser, Post, PostDetails, PostStatus, Tag, User};
use crate::error::RepoError;
use crate::pagination::{Page, Pagination};

/// Generic repository trait defining standard persistence operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity. Entities without an ID are inserted, others updated.
    async fn save(&self, entity: T) -> Result<T, RepoError>;
}

/// A namespace in which slugs must be unique.
#[async_trait]
pub trait SlugScope: Send + Sync {
    /// Count rows using exactly `slug`, ignoring the row `exclude_id`.
    async fn count_slug(&self, slug: &str, exclude_id: Option<i32>) -> Result<u64, RepoError>;
}

/// Entities addressable by either primary key or slug.
#[async_trait]
pub trait SlugLookup<T>: BaseRepository<T, i32> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<T>, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: SlugLookup<Category> + SlugScope {
    /// All categories ordered by name.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;

    /// Detach the category from its posts, then delete it.
    /// Returns the number of posts that were detached.
    async fn delete_detaching(&self, id: i32) -> Result<u64, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: SlugLookup<Tag> + SlugScope {
    /// All tags ordered by name.
    async fn list_all(&self) -> Result<Vec<Tag>, RepoError>;

    /// Resolve tag names to tags, creating missing ones.
    ///
    /// Names are matched by normalized slug; blank names are skipped and
    /// names sharing a slug collapse into one tag.
    async fn find_or_create(&self, names: &[String]) -> Result<Vec<Tag>, RepoError>;

    /// Remove the tag from every post, then delete it.
    /// Returns the number of post associations removed.
    async fn delete_clearing(&self, id: i32) -> Result<u64, RepoError>;
}

/// Criteria for post listings. Unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub author_id: Option<i32>,
    pub category_id: Option<i32>,
    pub tag_id: Option<i32>,
    pub category_slug: Option<String>,
    pub tag_slug: Option<String>,
    pub author_username: Option<String>,
    /// Substring of title or summary.
    pub search: Option<String>,
}

/// Sort order of post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    /// Most recently created first.
    Newest,
    /// Most recently published first, then most recently created.
    RecentlyPublished,
}

/// Post repository.
#[async_trait]
pub trait PostRepository: SlugLookup<Post> + SlugScope {
    /// One page of posts with author, category and tags loaded.
    async fn list(
        &self,
        filter: &PostFilter,
        order: PostOrder,
        pagination: Pagination,
    ) -> Result<Page<PostDetails>, RepoError>;

    /// Load author, category, tags and optionally approved comments.
    async fn load_details(&self, post: Post, with_comments: bool) -> Result<PostDetails, RepoError>;

    /// Replace the full tag set of a post.
    async fn replace_tags(&self, post_id: i32, tag_ids: &[i32]) -> Result<(), RepoError>;

    /// Delete a post together with its comments and tag associations.
    async fn delete_with_children(&self, id: i32) -> Result<(), RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    /// Comments of a post, oldest first, with their author accounts.
    async fn list_for_post(
        &self,
        post_id: i32,
        approved_only: bool,
    ) -> Result<Vec<CommentWithUser>, RepoError>;
}
