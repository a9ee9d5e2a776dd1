//! Resolve a path parameter that may be either a numeric ID or a slug.

use crate::error::RepoError;
use crate::ports::SlugLookup;

/// How a path parameter addresses an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Id(i32),
    Slug(String),
}

impl EntityRef {
    /// All-digit parameters are IDs, anything else is a slug.
    ///
    /// Returns `None` for blank parameters and for digit strings that do not
    /// fit an ID.
    pub fn parse(param: &str) -> Option<Self> {
        let param = param.trim();
        if param.is_empty() {
            return None;
        }

        if param.bytes().all(|b| b.is_ascii_digit()) {
            let id = param.parse::<u64>().ok()?;
            return i32::try_from(id).ok().map(EntityRef::Id);
        }

        Some(EntityRef::Slug(param.to_string()))
    }
}

/// Load the entity addressed by `param`, or [`RepoError::NotFound`].
pub async fn resolve<T, R>(repo: &R, param: &str) -> Result<T, RepoError>
where
    R: SlugLookup<T> + ?Sized,
    T: Send,
{
    let found = match EntityRef::parse(param) {
        Some(EntityRef::Id(id)) => repo.find_by_id(id).await?,
        Some(EntityRef::Slug(slug)) => repo.find_by_slug(&slug).await?,
        None => None,
    };

    found.ok_or(RepoError::NotFound)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::ports::BaseRepository;

    #[derive(Debug, Clone, PartialEq)]
    struct Thing {
        id: i32,
        slug: String,
    }

    struct Things(Vec<Thing>);

    #[async_trait]
    impl BaseRepository<Thing, i32> for Things {
        async fn find_by_id(&self, id: i32) -> Result<Option<Thing>, RepoError> {
            Ok(self.0.iter().find(|t| t.id == id).cloned())
        }

        async fn save(&self, entity: Thing) -> Result<Thing, RepoError> {
            Ok(entity)
        }
    }

    #[async_trait]
    impl SlugLookup<Thing> for Things {
        async fn find_by_slug(&self, slug: &str) -> Result<Option<Thing>, RepoError> {
            Ok(self.0.iter().find(|t| t.slug == slug).cloned())
        }
    }

    fn repo() -> Things {
        Things(vec![
            Thing { id: 1, slug: "rust".into() },
            // A slug that looks numeric can only be reached through its ID.
            Thing { id: 2, slug: "2024".into() },
        ])
    }

    #[test]
    fn parses_ids_and_slugs() {
        assert_eq!(EntityRef::parse("42"), Some(EntityRef::Id(42)));
        assert_eq!(EntityRef::parse(" 7 "), Some(EntityRef::Id(7)));
        assert_eq!(EntityRef::parse("rust"), Some(EntityRef::Slug("rust".into())));
        assert_eq!(EntityRef::parse("-1"), Some(EntityRef::Slug("-1".into())));
        assert_eq!(EntityRef::parse("12abc"), Some(EntityRef::Slug("12abc".into())));
    }

    #[test]
    fn rejects_blank_and_oversized() {
        assert_eq!(EntityRef::parse(""), None);
        assert_eq!(EntityRef::parse("   "), None);
        assert_eq!(EntityRef::parse("99999999999"), None);
        assert_eq!(EntityRef::parse("99999999999999999999999"), None);
    }

    #[tokio::test]
    async fn resolves_by_id_then_slug() {
        let repo = repo();
        assert_eq!(resolve(&repo, "1").await.unwrap().slug, "rust");
        assert_eq!(resolve(&repo, "rust").await.unwrap().id, 1);
        assert_eq!(resolve(&repo, "2024").await.ok(), None);
    }

    #[tokio::test]
    async fn missing_entities_are_not_found() {
        let repo = repo();
        assert!(matches!(resolve(&repo, "99").await, Err(RepoError::NotFound)));
        assert!(matches!(resolve(&repo, "go").await, Err(RepoError::NotFound)));
        assert!(matches!(resolve(&repo, "").await, Err(RepoError::NotFound)));
    }
}
