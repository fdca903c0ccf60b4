use serde::Serialize;

/// Number of rows shown per page unless a caller overrides it.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 25;

/// Page/size pair applied to repository list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: usize,
    /// Number of rows per page.
    pub per_page: usize,
}

/// A page of items together with the page cursor rendered by templates.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total_pages: usize) -> Self {
        Self {
            items,
            page,
            total_pages,
        }
    }
}
