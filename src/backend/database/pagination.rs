use serde::Serialize;

/// Page size used when the request omits `size` or sends a bad one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
}

impl Pagination {
    pub fn new(page: i64, size: i64, default_size: i64) -> Self {
        let default_size = if default_size > 0 {
            default_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self {
            page: if page > 0 { page } else { 1 },
            size: if size > 0 { size } else { default_size },
        }
    }

    /// Reads raw `page` / `size` query values. Missing, non-numeric and
    /// non-positive values fall back to page 1 and the default size.
    pub fn from_params(page: Option<&str>, size: Option<&str>, default_size: i64) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(0);
        Self::new(parse(page), parse(size), default_size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }

    pub fn total_pages(&self, total_items: i64) -> i64 {
        if total_items <= 0 {
            return 0;
        }
        total_items / self.size + i64::from(total_items % self.size != 0)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE)
    }
}

/// Page envelope returned by every search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_items: i64,
    pub items: Vec<T>,
    pub total_pages: i64,
    pub current_page: i64,
}

impl<T> Page<T> {
    pub fn new(total_items: i64, items: Vec<T>, pagination: &Pagination) -> Self {
        Self {
            total_items,
            items,
            total_pages: pagination.total_pages(total_items),
            current_page: pagination.page,
        }
    }
}
