//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may ask for.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 8,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// Fill in missing values with the defaults and clamp them to valid ranges.
    ///
    /// Pages are numbered from one and a page holds at least one item.
    pub fn resolve(&self, page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
        let page = page.unwrap_or(self.default_page).max(1);
        let per_page = per_page
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1));

        (page, per_page)
    }
}

/// One page of a larger list.
#[derive(Debug, PartialEq)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// The one-based number of this page.
    pub page: u64,
    /// The maximum number of items on a page.
    pub per_page: u64,
    /// The number of non-empty pages.
    pub page_count: u64,
    /// The number of items across all pages.
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Describe page number `page` holding `items`, out of `total_count` items split into pages
    /// of `per_page`.
    pub fn new(items: Vec<T>, page: u64, per_page: u64, total_count: u64) -> Self {
        let per_page = per_page.max(1);

        Self {
            items,
            page: page.max(1),
            per_page,
            page_count: total_count.div_ceil(per_page),
            total_count,
        }
    }
}

/// The number of items that come before page number `page`.
pub fn page_offset(page: u64, per_page: u64) -> u64 {
    (page.max(1) - 1).saturating_mul(per_page)
}

#[cfg(test)]
mod tests {
    use crate::pagination::{Page, PaginationConfig, page_offset};

    #[test]
    fn page_count_rounds_up() {
        let page = Page::new(vec![17, 18, 19, 20], 3, 8, 20);

        assert_eq!(page.page_count, 3);
        assert_eq!(page.total_count, 20);
    }

    #[test]
    fn empty_list_has_no_pages() {
        let page = Page::new(Vec::<i32>::new(), 1, 8, 0);

        assert_eq!(page.page_count, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let page = Page::new(vec![1], 1, 0, 3);

        assert_eq!(page.per_page, 1);
        assert_eq!(page.page_count, 3);
    }

    #[test]
    fn offset_skips_earlier_pages() {
        assert_eq!(page_offset(1, 8), 0);
        assert_eq!(page_offset(3, 8), 16);
        assert_eq!(page_offset(0, 8), 0);
    }

    #[test]
    fn offset_saturates() {
        assert_eq!(page_offset(u64::MAX, u64::MAX), u64::MAX);
    }

    #[test]
    fn resolve_uses_defaults_and_clamps() {
        let config = PaginationConfig::default();

        assert_eq!(config.resolve(None, None), (1, 8));
        assert_eq!(config.resolve(Some(0), Some(0)), (1, 1));
        assert_eq!(config.resolve(Some(3), Some(1_000)), (3, 100));
    }
}
