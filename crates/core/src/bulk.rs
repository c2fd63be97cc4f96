//! Paginated bulk reader.
//!
//! The backing store silently truncates any single request to a fixed page
//! size, so assembling a full result set means walking offset pages until a
//! short page signals end-of-data. The reader is non-lazy (it materializes
//! the whole sequence), restartable (no cursor state survives a call), and
//! caps the assembled result at a caller-supplied ceiling.
//!
//! Pages are fetched strictly one at a time to preserve the query's
//! ordering. Dropping the returned future between page awaits cancels the
//! read; no partial result is ever surfaced.

use async_trait::async_trait;

use crate::error::CoreError;

/// A source of offset-paginated rows for one query descriptor.
///
/// Implementations bind a concrete query (filter + ordering) and translate
/// store failures into [`CoreError::DataAccess`].
#[async_trait]
pub trait PageFetcher {
    type Item: Send;

    /// Fetch up to `limit` rows starting at `offset`, in the descriptor's
    /// requested order.
    async fn fetch_page(&self, limit: i64, offset: i64) -> Result<Vec<Self::Item>, CoreError>;
}

/// Assemble at most `max_records` rows by walking `page_size`-sized pages.
///
/// Stops when a page comes back short (end-of-data) or when the
/// accumulated count reaches `max_records`, truncating to the ceiling.
/// Any page failure aborts the whole read: a clearly-failed report beats a
/// silently-incomplete one.
pub async fn read_all<F>(
    fetcher: &F,
    page_size: i64,
    max_records: usize,
) -> Result<Vec<F::Item>, CoreError>
where
    F: PageFetcher + Sync,
{
    if page_size <= 0 {
        return Err(CoreError::Validation(format!(
            "Page size must be positive, got {page_size}"
        )));
    }
    if max_records == 0 {
        return Ok(Vec::new());
    }

    let mut rows: Vec<F::Item> = Vec::new();
    let mut page_index: i64 = 0;

    loop {
        let page = fetcher.fetch_page(page_size, page_index * page_size).await?;
        let short_page = (page.len() as i64) < page_size;
        rows.extend(page);

        if rows.len() >= max_records {
            rows.truncate(max_records);
            return Ok(rows);
        }
        if short_page {
            return Ok(rows);
        }
        page_index += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
