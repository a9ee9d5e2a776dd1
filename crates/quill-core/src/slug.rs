//! Slug normalization and per-scope uniqueness.
//!
//! Categories and tags use the strict check ([`ensure_unique`]): a taken slug
//! is reported back to the editor. Posts use [`resolve_unique`], which appends
//! `-1`, `-2`, ... until a free slug is found.
//!
//! Both checks run before the write and are not atomic with it. Two writers
//! racing for the same slug are caught by the unique index on the slug column,
//! which surfaces as [`RepoError::Constraint`].

use crate::error::{RepoError, SlugError};
use crate::ports::SlugScope;

/// Returned by [`normalize`] when nothing usable is left.
pub const FALLBACK_SLUG: &str = "item";

/// Base used for post slugs whose candidate normalizes to nothing.
pub const POST_FALLBACK_SLUG: &str = "post";

/// Lower-case `text` and collapse every run of characters outside
/// `[a-z0-9]` into a single hyphen, without leading or trailing hyphens.
///
/// May return an empty string.
pub fn normalize_raw(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    // One lower-case char per input char, so 'İ' maps to a bare 'i'
    let lowered = text
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c));

    for ch in lowered {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Turn arbitrary text into a URL-safe slug, never empty.
pub fn normalize(text: &str) -> String {
    let slug = normalize_raw(text);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Strict uniqueness check.
///
/// Returns the normalized slug when no other row in `scope` uses it.
pub async fn ensure_unique<S>(
    scope: &S,
    candidate: &str,
    exclude_id: Option<i32>,
) -> Result<String, SlugError>
where
    S: SlugScope + ?Sized,
{
    let slug = normalize_raw(candidate);
    if slug.is_empty() {
        return Err(SlugError::Invalid);
    }

    if scope.count_slug(&slug, exclusion(exclude_id)).await? > 0 {
        return Err(SlugError::Conflict);
    }

    Ok(slug)
}

/// Find the first free slug among `base`, `base-1`, `base-2`, ...
pub async fn resolve_unique<S>(
    scope: &S,
    candidate: &str,
    exclude_id: Option<i32>,
) -> Result<String, RepoError>
where
    S: SlugScope + ?Sized,
{
    let mut base = normalize_raw(candidate);
    if base.is_empty() {
        base = POST_FALLBACK_SLUG.to_string();
    }

    let exclude_id = exclusion(exclude_id);
    let mut slug = base.clone();
    let mut suffix: u64 = 0;

    while scope.count_slug(&slug, exclude_id).await? > 0 {
        suffix += 1;
        slug = format!("{base}-{suffix}");
    }

    Ok(slug)
}

/// IDs of 0 mean "nothing to exclude".
fn exclusion(exclude_id: Option<i32>) -> Option<i32> {
    exclude_id.filter(|id| *id > 0)
}
