//! Cursor-based pagination.
//!
//! Every list endpoint of the help-center API returns a page of items plus a
//! `next_page` URL. [`paginate`] drives any such endpoint to exhaustion.

use std::future::Future;

use crate::zendesk::Page;

/// Walk a cursor-paginated stream, accumulating every item.
///
/// `step` is called with `None` for the first page and with the previous
/// page's `next_page` afterwards. The loop stops when a page has no items
/// (nothing from it is kept) or when a page has no `next_page` (its items are
/// kept). An empty first page yields an empty collection.
pub async fn paginate<T, E, F, Fut>(resource: &str, mut step: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut all_items: Vec<T> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page = 1u32;

    loop {
        let fetched = step(cursor.take()).await?;
        if fetched.is_empty() {
            tracing::debug!(resource, page, "Empty page, stopping");
            break;
        }

        let Page { items, next_page } = fetched;
        let items = items.unwrap_or_default();

        let count = items.len();
        all_items.extend(items);
        tracing::debug!(
            resource,
            page,
            count,
            total_so_far = all_items.len(),
            "Fetched page"
        );

        match next_page {
            Some(next) => {
                cursor = Some(next);
                page += 1;
            }
            None => break,
        }
    }

    Ok(all_items)
}
