//! Pagination parameters, the upstream page envelope, and collection merging.
//!
//! Every paged fetch in the service (top-level employees, subordinates,
//! branches) goes through these types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default page number (1-based).
pub const DEFAULT_PAGE_NUMBER: u32 = 1;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum page size accepted from clients.
pub const MAX_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// PaginationParams
// ---------------------------------------------------------------------------

/// `?pageNumber=&pageSize=&search=` as sent by the UI and forwarded upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default = "default_page_number")]
    #[validate(range(min = 1, message = "pageNumber must be at least 1"))]
    pub page_number: u32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "pageSize must be between 1 and 100"))]
    pub page_size: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "search must be at most 200 characters"))]
    pub search: Option<String>,
}

fn default_page_number() -> u32 {
    DEFAULT_PAGE_NUMBER
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
        }
    }
}

impl PaginationParams {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
            search: None,
        }
    }

    /// Trim `search`, treating a blank term as no filter.
    pub fn normalized(mut self) -> Self {
        self.search = self
            .search
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty());
        self
    }

    /// Validate and return `self`, converting failures into [`CoreError`].
    pub fn validated(self) -> Result<Self, CoreError> {
        self.validate()?;
        Ok(self)
    }

    /// The parameters for the following page.
    pub fn next_page(&self) -> Self {
        Self {
            page_number: self.page_number.saturating_add(1),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// The backend's paged response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// An empty page for the given request.
    pub fn empty(params: &PaginationParams) -> Self {
        Self {
            items: Vec::new(),
            page_number: params.page_number,
            page_size: params.page_size,
            total_items: 0,
            total_pages: 0,
        }
    }

    /// Build a page from a slice of a larger collection, computing totals.
    pub fn from_items(items: Vec<T>, params: &PaginationParams, total_items: u64) -> Self {
        Self {
            items,
            page_number: params.page_number,
            page_size: params.page_size,
            total_items,
            total_pages: total_pages(total_items, params.page_size),
        }
    }

    /// True when no further page can hold items.
    pub fn is_last(&self) -> bool {
        self.items.is_empty() || self.page_number >= self.total_pages
    }

    /// The page metadata with the items replaced.
    pub fn map_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            page_number: self.page_number,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Number of pages needed for `total_items` at `page_size` per page.
pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_items.div_ceil(page_size as u64);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Collection merging
// ---------------------------------------------------------------------------

/// Anything keyed by a directory id.
pub trait HasId {
    fn id(&self) -> DbId;
}

/// Merge `incoming` into `existing`.
///
/// Items whose id is already present replace the earlier copy in place; new
/// items are appended in arrival order.
pub fn merge_by_id<T: HasId>(existing: &mut Vec<T>, incoming: impl IntoIterator<Item = T>) {
    let mut positions: std::collections::HashMap<DbId, usize> = existing
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id(), i))
        .collect();

    for item in incoming {
        match positions.get(&item.id()) {
            Some(&i) => existing[i] = item,
            None => {
                positions.insert(item.id(), existing.len());
                existing.push(item);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: DbId,
        label: &'static str,
    }

    impl HasId for Row {
        fn id(&self) -> DbId {
            self.id
        }
    }

    #[test]
    fn defaults_apply_when_query_is_empty() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PaginationParams::default());
        assert!(params.validated().is_ok());
    }

    #[test]
    fn page_size_out_of_range_is_rejected() {
        assert!(PaginationParams::new(1, 0).validated().is_err());
        assert!(PaginationParams::new(1, MAX_PAGE_SIZE + 1).validated().is_err());
        assert!(PaginationParams::new(0, 10).validated().is_err());
    }

    #[test]
    fn blank_search_normalizes_to_none() {
        let blank = PaginationParams {
            search: Some("   ".into()),
            ..PaginationParams::default()
        };
        assert_eq!(blank.normalized(), PaginationParams::default());

        let padded = PaginationParams {
            search: Some(" gab ".into()),
            ..PaginationParams::default()
        };
        assert_eq!(padded.normalized().search.as_deref(), Some("gab"));
    }

    #[test]
    fn next_page_keeps_size_and_search() {
        let mut params = PaginationParams::new(2, 25);
        params.search = Some("ana".into());
        let next = params.next_page();
        assert_eq!(next.page_number, 3);
        assert_eq!(next.page_size, 25);
        assert_eq!(next.search.as_deref(), Some("ana"));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn last_page_detection() {
        let params = PaginationParams::new(1, 2);
        let page = Page::from_items(vec![1, 2], &params, 3);
        assert!(!page.is_last());

        let page = Page::from_items(vec![3], &params.next_page(), 3);
        assert!(page.is_last());

        let page: Page<i32> = Page::empty(&params);
        assert!(page.is_last());
    }

    #[test]
    fn merge_replaces_existing_and_appends_new() {
        let mut rows = vec![Row { id: 1, label: "a" }, Row { id: 2, label: "b" }];
        merge_by_id(
            &mut rows,
            vec![Row { id: 2, label: "b2" }, Row { id: 3, label: "c" }],
        );
        assert_eq!(
            rows,
            vec![
                Row { id: 1, label: "a" },
                Row { id: 2, label: "b2" },
                Row { id: 3, label: "c" },
            ]
        );
    }

    #[test]
    fn merge_dedupes_within_incoming() {
        let mut rows = Vec::new();
        merge_by_id(
            &mut rows,
            vec![Row { id: 7, label: "x" }, Row { id: 7, label: "y" }],
        );
        assert_eq!(rows, vec![Row { id: 7, label: "y" }]);
    }
}
