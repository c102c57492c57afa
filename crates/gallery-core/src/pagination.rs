//! Pager
//!
//! Turns an unbounded listing into one display page plus the metadata needed to render
//! page links. The offset for pages 2 and 3 is pulled back so that those windows overlap
//! the tail of the previous page; every other page uses the plain `(page - 1) * size` offset.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;

/// A listing that can be counted and sliced, usually backed by a SQL query.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    /// Total number of rows in the listing.
    async fn count(&self) -> Result<i64, AppError>;

    /// Up to `take` rows starting at offset `skip`.
    async fn fetch(&self, skip: i64, take: i64) -> Result<Vec<T>, AppError>;
}

#[async_trait]
impl<T> PageSource<T> for Vec<T>
where
    T: Clone + Send + Sync,
{
    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.len() as i64)
    }

    async fn fetch(&self, skip: i64, take: i64) -> Result<Vec<T>, AppError> {
        let skip = usize::try_from(skip.max(0)).unwrap_or(usize::MAX);
        let take = usize::try_from(take.max(0)).unwrap_or(usize::MAX);
        Ok(self.iter().skip(skip).take(take).cloned().collect())
    }
}

/// Offset and length of the slice shown for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: i64,
    pub take: i64,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PagedResult<T> {
    pub current_page: i64,
    pub page_size: i64,
    pub row_count: i64,
    pub page_count: i64,
    pub results: Vec<T>,
}

fn validate(page: i64, page_size: i64) -> Result<(), AppError> {
    if page_size <= 0 {
        return Err(AppError::InvalidArgument(format!(
            "page_size must be positive, got {}",
            page_size
        )));
    }
    if page < 1 {
        return Err(AppError::InvalidArgument(format!(
            "page must be at least 1, got {}",
            page
        )));
    }
    Ok(())
}

/// Compute the slice shown for `page`.
pub fn page_window(page: i64, page_size: i64) -> Result<PageWindow, AppError> {
    validate(page, page_size)?;

    let mut skip = (page - 1)
        .checked_mul(page_size)
        .ok_or_else(|| AppError::InvalidArgument(format!("page {} is out of range", page)))?;

    match page {
        2 => skip -= page_size / 2,
        3 => skip -= page_size / 2 - 1,
        _ => {}
    }

    Ok(PageWindow {
        skip,
        take: page_size,
    })
}

/// `ceil(row_count / page_size)` for a positive `page_size`.
pub fn page_count(row_count: i64, page_size: i64) -> i64 {
    if row_count <= 0 {
        return 0;
    }
    (row_count - 1) / page_size + 1
}

/// Count the source, then fetch the window for `page`.
///
/// The slice query is not issued when the window starts past the last row.
pub async fn get_paged<T, S>(
    source: &S,
    page: i64,
    page_size: i64,
) -> Result<PagedResult<T>, AppError>
where
    S: PageSource<T> + ?Sized,
{
    let window = page_window(page, page_size)?;
    let row_count = source.count().await?;

    let results = if window.skip >= row_count {
        Vec::new()
    } else {
        let mut rows = source.fetch(window.skip, window.take).await?;
        rows.truncate(usize::try_from(window.take).unwrap_or(usize::MAX));
        rows
    };

    tracing::debug!(
        page = page,
        page_size = page_size,
        row_count = row_count,
        skip = window.skip,
        returned = results.len(),
        "Paged listing"
    );

    Ok(PagedResult {
        current_page: page,
        page_size,
        row_count,
        page_count: page_count(row_count, page_size),
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorMetadata;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        rows: Vec<i32>,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl PageSource<i32> for CountingSource {
        async fn count(&self) -> Result<i64, AppError> {
            Ok(self.rows.len() as i64)
        }

        async fn fetch(&self, skip: i64, take: i64) -> Result<Vec<i32>, AppError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.rows.fetch(skip, take).await
        }
    }

    fn numbers(n: i32) -> Vec<i32> {
        (1..=n).collect()
    }

    #[test]
    fn test_first_page_starts_at_zero() {
        assert_eq!(page_window(1, 5).unwrap().skip, 0);
        assert_eq!(page_window(1, 10).unwrap().skip, 0);
    }

    #[test]
    fn test_second_page_pulls_back_half_a_page() {
        assert_eq!(page_window(2, 10).unwrap().skip, 5);
        assert_eq!(page_window(2, 5).unwrap().skip, 3);
    }

    #[test]
    fn test_third_page_pulls_back_one_less_than_half() {
        assert_eq!(page_window(3, 10).unwrap().skip, 16);
        assert_eq!(page_window(3, 5).unwrap().skip, 9);
    }

    #[test]
    fn test_later_pages_are_unadjusted() {
        assert_eq!(page_window(4, 10).unwrap().skip, 30);
        assert_eq!(page_window(7, 5).unwrap().skip, 30);
    }

    #[test]
    fn test_window_take_is_page_size() {
        assert_eq!(page_window(3, 10).unwrap().take, 10);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            page_window(1, 0),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            page_window(1, -3),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            page_window(0, 10),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            page_window(i64::MAX, 10),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_page_count_is_ceiling() {
        for page_size in 1..=12i64 {
            for rows in 0..=50i64 {
                let expected = (rows as f64 / page_size as f64).ceil() as i64;
                assert_eq!(page_count(rows, page_size), expected, "{rows}/{page_size}");
            }
        }
    }

    #[tokio::test]
    async fn test_get_paged_second_page_overlaps_first() {
        let rows = numbers(23);
        let page = get_paged(&rows, 2, 10).await.unwrap();
        assert_eq!(page.current_page, 2);
        assert_eq!(page.row_count, 23);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.results, (6..=15).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_get_paged_last_page_is_short() {
        let rows = numbers(23);
        let page = get_paged(&rows, 3, 10).await.unwrap();
        assert_eq!(page.results, (17..=23).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_get_paged_never_exceeds_page_size() {
        let rows = numbers(100);
        for page_number in 1..=12 {
            let page = get_paged(&rows, page_number, 7).await.unwrap();
            assert!(page.results.len() <= 7);
        }
    }

    #[tokio::test]
    async fn test_get_paged_past_end_skips_fetch() {
        let source = CountingSource {
            rows: numbers(12),
            fetches: AtomicUsize::new(0),
        };
        let page = get_paged(&source, 4, 5).await.unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.page_count, 3);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);

        let page = get_paged(&source, 1, 5).await.unwrap();
        assert_eq!(page.results, vec![1, 2, 3, 4, 5]);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_paged_empty_source() {
        let rows: Vec<i32> = Vec::new();
        let page = get_paged(&rows, 1, 5).await.unwrap();
        assert_eq!(page.row_count, 0);
        assert_eq!(page.page_count, 0);
        assert!(page.results.is_empty());
    }

    #[tokio::test]
    async fn test_get_paged_rejects_bad_page_size_before_counting() {
        let source = CountingSource {
            rows: numbers(3),
            fetches: AtomicUsize::new(0),
        };
        let err = get_paged(&source, 1, 0).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }
}
