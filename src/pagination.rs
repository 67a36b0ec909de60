use axum::http::header::{CONTENT_RANGE, HeaderMap, HeaderValue};

use crate::errors::ApiError;
use crate::i18n::keys;

/// The slice of a collection a list request may fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
    pub total_pages: u64,
}

#[must_use]
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Validates a 1-based page request against the collection size.
///
/// The page must satisfy `1 <= page_number <= ceil(total / page_size)`.
/// An empty collection has no valid page at all, so every request against
/// it is rejected. A non-positive page size is rejected the same way.
///
/// # Errors
/// `ApiError::BadRequest` with `InvalidPageNumber` when the page is out of
/// range.
pub fn guard(total: u64, page_number: i64, page_size: i64) -> Result<PageWindow, ApiError> {
    let invalid = || ApiError::bad_request(keys::INVALID_PAGE_NUMBER);

    let page = u64::try_from(page_number).map_err(|_| invalid())?;
    let size = u64::try_from(page_size).map_err(|_| invalid())?;
    if size == 0 {
        return Err(invalid());
    }

    let pages = total_pages(total, size);
    if page < 1 || page > pages {
        return Err(invalid());
    }

    Ok(PageWindow {
        offset: (page - 1) * size,
        limit: size,
        total_pages: pages,
    })
}

/// Builds a `Content-Range: {resource} {first}-{last}/{total}` header for a
/// fetched page.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    returned: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let last = (offset + returned).saturating_sub(1).min(total_count.saturating_sub(1));
    let resource_name: String = resource_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let content_range = format!("{resource_name} {offset}-{last}/{total_count}");

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&content_range) {
        headers.insert(CONTENT_RANGE, value);
    }
    headers
}
