//! Offset pagination envelope shared by the tracking list endpoints.

use serde::Serialize;

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Normalized page/limit pair. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Clamp raw query values into a usable range.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the envelope the dashboards expect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slice an already-filtered collection into the requested page.
    pub fn from_items(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let total_pages = total.div_ceil(u64::from(request.limit)) as u32;
        let offset = (request.page - 1) as usize * request.limit as usize;
        let items = items
            .into_iter()
            .skip(offset)
            .take(request.limit as usize)
            .collect();

        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_inputs() {
        let request = PageRequest::new(Some(0), Some(500));
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, MAX_LIMIT);
    }

    #[test]
    fn slices_the_requested_page() {
        let page = Page::from_items((1..=45).collect::<Vec<_>>(), PageRequest::new(Some(3), Some(20)));
        assert_eq!(page.items, vec![41, 42, 43, 44, 45]);
        assert_eq!(page.total, 45);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let page = Page::from_items(Vec::<u8>::new(), PageRequest::default());
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn page_past_the_end_is_empty_but_keeps_totals() {
        let page = Page::from_items(vec![1, 2, 3], PageRequest::new(Some(5), Some(2)));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
    }
}
