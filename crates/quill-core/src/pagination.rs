//! Page/page-size request convention shared by every listing.

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 50;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Pagination {
    /// Build from raw values. Pages below 1 become 1, page sizes below 1 fall
    /// back to the default and page sizes above the ceiling are capped.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(page) if page >= 1 => page as u64,
            _ => DEFAULT_PAGE,
        };
        let page_size = match page_size {
            Some(size) if size >= 1 => (size as u64).min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };

        Self { page, page_size }
    }

    /// Build from query-string values; unparsable values use the defaults.
    pub fn from_params(page: Option<&str>, page_size: Option<&str>) -> Self {
        let parse = |value: Option<&str>| value.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(parse(page), parse(page_size))
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        assert_eq!(Pagination::new(None, None), Pagination::default());
        assert_eq!(Pagination::default().offset(), 0);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let p = Pagination::new(Some(0), Some(500));
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, MAX_PAGE_SIZE);

        let p = Pagination::new(Some(-3), Some(0));
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn lenient_parsing() {
        let p = Pagination::from_params(Some("3"), Some("abc"));
        assert_eq!(p.page, 3);
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(p.offset(), 20);
    }
}
