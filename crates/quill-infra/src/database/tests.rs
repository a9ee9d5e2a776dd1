use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use quill_core::domain::{Category, Comment, Post, PostStatus, User};
use quill_core::error::RepoError;
use quill_core::pagination::Pagination;
use quill_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostFilter, PostOrder,
    PostRepository, SlugScope, TagRepository, UserRepository,
};

use super::entity::post;
use super::{
    DatabaseConfig, SqlCategoryRepository, SqlCommentRepository, SqlPostRepository,
    SqlTagRepository, SqlUserRepository, connect,
};

struct Repos {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
}

async fn setup() -> Repos {
    let db = connect(&DatabaseConfig::in_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    repos(db)
}

fn repos(db: DatabaseConnection) -> Repos {
    Repos {
        users: Arc::new(SqlUserRepository::new(db.clone())),
        posts: Arc::new(SqlPostRepository::new(db.clone())),
        categories: Arc::new(SqlCategoryRepository::new(db.clone())),
        tags: Arc::new(SqlTagRepository::new(db.clone())),
        comments: Arc::new(SqlCommentRepository::new(db)),
    }
}

async fn add_user(repos: &Repos, username: &str) -> User {
    let user = User::new(
        username.to_string(),
        Some(format!("{username}@example.com")),
        "hash".to_string(),
        None,
    );
    repos.users.save(user).await.unwrap()
}

async fn add_post(repos: &Repos, author: &User, slug: &str, status: PostStatus) -> Post {
    let mut post = Post::new(
        author.id,
        format!("Title {slug}"),
        "Body".to_string(),
        slug.to_string(),
    );
    post.set_initial_status(status, None, Utc::now());
    repos.posts.save(post).await.unwrap()
}

#[tokio::test]
async fn test_find_post_by_id_with_mock() {
    let now = Utc::now();

    // Mock the query expectation
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post::Model {
            id: 7,
            author_id: 1,
            category_id: None,
            title: "Test Post".to_owned(),
            summary: String::new(),
            content: "Content".to_owned(),
            slug: "test-post".to_owned(),
            status: "published".to_owned(),
            cover_image: String::new(),
            published_at: Some(now.into()),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = SqlPostRepository::new(db);

    let post = BaseRepository::<Post, i32>::find_by_id(&repo, 7)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, 7);
    assert_eq!(post.status, PostStatus::Published);
}

#[tokio::test]
async fn test_user_lookup_and_unique_username() {
    let repos = setup().await;
    let alice = add_user(&repos, "alice").await;
    assert!(alice.id > 0);

    let by_name = repos.users.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(by_name.id, alice.id);

    let by_email = repos
        .users
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, alice.id);

    assert!(repos.users.find_by_username("bob").await.unwrap().is_none());

    let duplicate = User::new("alice".into(), None, "hash".into(), None);
    let result = repos.users.save(duplicate).await;
    assert!(matches!(result, Err(RepoError::Constraint(_))));
}

#[tokio::test]
async fn test_updating_missing_row_is_not_found() {
    let repos = setup().await;
    let mut ghost = User::new("ghost".into(), None, "hash".into(), None);
    ghost.id = 999;

    let result = repos.users.save(ghost).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_post_slug_scope_excludes_own_row() {
    let repos = setup().await;
    let alice = add_user(&repos, "alice").await;
    let post = add_post(&repos, &alice, "hello-world", PostStatus::Draft).await;

    assert_eq!(repos.posts.count_slug("hello-world", None).await.unwrap(), 1);
    assert_eq!(
        repos.posts.count_slug("hello-world", Some(post.id)).await.unwrap(),
        0
    );
    assert_eq!(repos.posts.count_slug("other", None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_deleting_category_detaches_posts() {
    let repos = setup().await;
    let alice = add_user(&repos, "alice").await;
    let category = repos
        .categories
        .save(Category::new("Rust".into(), "rust".into(), String::new()))
        .await
        .unwrap();

    let mut ids = Vec::new();
    for slug in ["a", "b", "c"] {
        let mut post = add_post(&repos, &alice, slug, PostStatus::Published).await;
        post.category_id = Some(category.id);
        ids.push(repos.posts.save(post).await.unwrap().id);
    }

    let detached = repos.categories.delete_detaching(category.id).await.unwrap();
    assert_eq!(detached, 3);

    for id in ids {
        let post = repos.posts.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(post.category_id, None);
    }
    assert!(repos.categories.find_by_id(category.id).await.unwrap().is_none());

    let again = repos.categories.delete_detaching(category.id).await;
    assert!(matches!(again, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_deleting_tag_clears_links_and_keeps_posts() {
    let repos = setup().await;
    let alice = add_user(&repos, "alice").await;
    let tags = repos.tags.find_or_create(&["Rust".to_string()]).await.unwrap();
    let tag = &tags[0];

    let mut ids = Vec::new();
    for slug in ["a", "b", "c"] {
        let post = add_post(&repos, &alice, slug, PostStatus::Published).await;
        repos.posts.replace_tags(post.id, &[tag.id]).await.unwrap();
        ids.push(post.id);
    }

    let cleared = repos.tags.delete_clearing(tag.id).await.unwrap();
    assert_eq!(cleared, 3);

    for id in ids {
        let post = repos.posts.find_by_id(id).await.unwrap().unwrap();
        let details = repos.posts.load_details(post, false).await.unwrap();
        assert!(details.tags.is_empty());
    }
}

#[tokio::test]
async fn test_find_or_create_reuses_and_collapses() {
    let repos = setup().await;

    let first = repos
        .tags
        .find_or_create(&["Rust".to_string(), "Web Dev".to_string()])
        .await
        .unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[1].slug, "web-dev");

    let second = repos
        .tags
        .find_or_create(&[
            "rust".to_string(),
            " ".to_string(),
            "RUST".to_string(),
            "Async".to_string(),
        ])
        .await
        .unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].id, first[0].id);
    assert_eq!(second[0].name, "Rust");

    assert_eq!(repos.tags.list_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_filters_and_paginates() {
    let repos = setup().await;
    let alice = add_user(&repos, "alice").await;
    let bob = add_user(&repos, "bob").await;
    let rust = repos
        .categories
        .save(Category::new("Rust".into(), "rust".into(), String::new()))
        .await
        .unwrap();
    let tags = repos.tags.find_or_create(&["Async".to_string()]).await.unwrap();

    let base = Utc::now() - TimeDelta::days(10);
    for (i, slug) in ["one", "two", "three"].iter().enumerate() {
        let mut post = Post::new(alice.id, format!("Alice {slug}"), "Body".into(), slug.to_string());
        post.set_initial_status(
            PostStatus::Published,
            Some(base + TimeDelta::days(i as i64)),
            Utc::now(),
        );
        post.category_id = Some(rust.id);
        let post = repos.posts.save(post).await.unwrap();
        if *slug == "two" {
            repos.posts.replace_tags(post.id, &[tags[0].id]).await.unwrap();
        }
    }
    add_post(&repos, &bob, "bob-draft", PostStatus::Draft).await;
    let mut searchable = add_post(&repos, &bob, "bob-published", PostStatus::Published).await;
    searchable.summary = "all about lifetimes".into();
    repos.posts.save(searchable).await.unwrap();

    let published = PostFilter {
        status: Some(PostStatus::Published),
        ..Default::default()
    };

    let page = repos
        .posts
        .list(&published, PostOrder::RecentlyPublished, Pagination::new(Some(1), Some(2)))
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].post.slug, "bob-published");
    assert_eq!(page.items[1].post.slug, "three");
    assert_eq!(page.items[1].author.username, "alice");
    assert_eq!(page.items[1].category.as_ref().unwrap().slug, "rust");

    let by_tag = PostFilter {
        tag_slug: Some("async".into()),
        ..published.clone()
    };
    let page = repos
        .posts
        .list(&by_tag, PostOrder::RecentlyPublished, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].post.slug, "two");
    assert_eq!(page.items[0].tags[0].slug, "async");

    let by_category = PostFilter {
        category_slug: Some("rust".into()),
        ..published.clone()
    };
    let page = repos
        .posts
        .list(&by_category, PostOrder::RecentlyPublished, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);

    let by_author = PostFilter {
        author_username: Some("bob".into()),
        ..published.clone()
    };
    let page = repos
        .posts
        .list(&by_author, PostOrder::RecentlyPublished, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    let by_search = PostFilter {
        search: Some("lifetimes".into()),
        ..published
    };
    let page = repos
        .posts
        .list(&by_search, PostOrder::RecentlyPublished, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].post.slug, "bob-published");

    let bobs_own = PostFilter {
        author_id: Some(bob.id),
        ..Default::default()
    };
    let page = repos
        .posts
        .list(&bobs_own, PostOrder::Newest, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn test_comments_are_oldest_first_with_authors() {
    let repos = setup().await;
    let alice = add_user(&repos, "alice").await;
    let post = add_post(&repos, &alice, "post", PostStatus::Published).await;

    repos
        .comments
        .save(Comment::by_user(post.id, &alice, "first".into()))
        .await
        .unwrap();
    repos
        .comments
        .save(Comment::by_guest(post.id, "Visitor".into(), "second".into()))
        .await
        .unwrap();

    let comments = repos.comments.list_for_post(post.id, true).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].comment.body, "first");
    assert_eq!(comments[0].user.as_ref().unwrap().username, "alice");
    assert_eq!(comments[1].comment.author_name, "Visitor");
    assert!(comments[1].user.is_none());

    let details = repos.posts.load_details(post, true).await.unwrap();
    assert_eq!(details.comments.len(), 2);
}

#[tokio::test]
async fn test_delete_post_removes_children() {
    let repos = setup().await;
    let alice = add_user(&repos, "alice").await;
    let post = add_post(&repos, &alice, "doomed", PostStatus::Published).await;
    let tags = repos.tags.find_or_create(&["Rust".to_string()]).await.unwrap();
    repos.posts.replace_tags(post.id, &[tags[0].id]).await.unwrap();
    repos
        .comments
        .save(Comment::by_guest(post.id, "Visitor".into(), "bye".into()))
        .await
        .unwrap();

    repos.posts.delete_with_children(post.id).await.unwrap();

    assert!(repos.posts.find_by_id(post.id).await.unwrap().is_none());
    assert!(repos.comments.list_for_post(post.id, false).await.unwrap().is_empty());
    assert!(repos.tags.find_by_id(tags[0].id).await.unwrap().is_some());

    let again = repos.posts.delete_with_children(post.id).await;
    assert!(matches!(again, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_replace_tags_replaces_whole_set() {
    let repos = setup().await;
    let alice = add_user(&repos, "alice").await;
    let post = add_post(&repos, &alice, "tagged", PostStatus::Draft).await;
    let tags = repos
        .tags
        .find_or_create(&["Rust".to_string(), "Go".to_string(), "Zig".to_string()])
        .await
        .unwrap();

    repos
        .posts
        .replace_tags(post.id, &[tags[0].id, tags[1].id, tags[0].id])
        .await
        .unwrap();
    repos.posts.replace_tags(post.id, &[tags[2].id, tags[1].id]).await.unwrap();

    let details = repos.posts.load_details(post.clone(), false).await.unwrap();
    let names: Vec<_> = details.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Go", "Zig"]);

    repos.posts.replace_tags(post.id, &[]).await.unwrap();
    let details = repos.posts.load_details(post, false).await.unwrap();
    assert!(details.tags.is_empty());
}
