//! Page-number pagination for Shopify's public JSON endpoints.
//!
//! `collections.json` and `products.json` accept a 1-based `page` query
//! parameter and answer with an empty array once the listing is exhausted:
//!
//! ```text
//! GET /collections.json?page=1   {"collections": [...]}
//! GET /collections.json?page=2   {"collections": []}   <- stop
//! ```

use std::future::Future;

use futures::stream::{self, Stream, TryStreamExt};

use crate::error::ScraperError;

pub(crate) const FIRST_PAGE: u32 = 1;

/// Maximum number of pages to fetch from one endpoint before returning an
/// error. Guards against storefronts that never return an empty page.
pub(crate) const MAX_PAGES: u32 = 5_000;

/// Turns a page fetcher into a lazy stream of items.
///
/// `fetch_page` is called with page numbers `1, 2, 3, ...`. The next page is
/// only requested once every item of the current page has been pulled, and
/// the stream ends at the first empty page. `endpoint` labels log events and
/// the [`ScraperError::PaginationLimit`] error.
pub(crate) fn paginate<T, F, Fut>(
    endpoint: String,
    fetch_page: F,
) -> impl Stream<Item = Result<T, ScraperError>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ScraperError>>,
{
    paginate_with_limit(endpoint, MAX_PAGES, fetch_page)
}

fn paginate_with_limit<T, F, Fut>(
    endpoint: String,
    max_pages: u32,
    fetch_page: F,
) -> impl Stream<Item = Result<T, ScraperError>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ScraperError>>,
{
    stream::try_unfold((fetch_page, FIRST_PAGE), move |(mut fetch_page, page)| {
        let endpoint = endpoint.clone();
        async move {
            if page > max_pages {
                return Err(ScraperError::PaginationLimit {
                    url: endpoint,
                    max_pages,
                });
            }

            let items = fetch_page(page).await?;
            if items.is_empty() {
                tracing::debug!(endpoint = %endpoint, page, "empty page, end of listing");
                return Ok(None);
            }

            tracing::debug!(endpoint = %endpoint, page, items = items.len(), "fetched page");
            Ok::<_, ScraperError>(Some((items, (fetch_page, page + 1))))
        }
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, ScraperError>)))
    .try_flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::pin;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// A fetcher serving `pages[n - 1]` for page `n` and `[]` past the end.
    fn fixed_pages(
        pages: Vec<Vec<u32>>,
        calls: Arc<AtomicU32>,
    ) -> impl FnMut(u32) -> futures::future::Ready<Result<Vec<u32>, ScraperError>> {
        move |page| {
            calls.fetch_add(1, Ordering::SeqCst);
            let idx = usize::try_from(page - 1).unwrap();
            futures::future::ready(Ok(pages.get(idx).cloned().unwrap_or_default()))
        }
    }

    #[tokio::test]
    async fn stops_at_first_empty_page() {
        let calls = Arc::new(AtomicU32::new(0));
        let stream = paginate(
            "test".to_owned(),
            fixed_pages(vec![vec![1, 2, 3]], Arc::clone(&calls)),
        );
        let items: Vec<u32> = stream.try_collect().await.unwrap();
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn flattens_items_across_pages_in_order() {
        let calls = Arc::new(AtomicU32::new(0));
        let stream = paginate(
            "test".to_owned(),
            fixed_pages(vec![vec![1, 2], vec![3], vec![4, 5]], Arc::clone(&calls)),
        );
        let items: Vec<u32> = stream.try_collect().await.unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn empty_first_page_yields_nothing() {
        let calls = Arc::new(AtomicU32::new(0));
        let stream = paginate("test".to_owned(), fixed_pages(vec![], Arc::clone(&calls)));
        let items: Vec<u32> = stream.try_collect().await.unwrap();
        assert!(items.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn does_not_fetch_next_page_until_current_is_drained() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut stream = pin!(paginate(
            "test".to_owned(),
            fixed_pages(vec![vec![1, 2], vec![3]], Arc::clone(&calls)),
        ));
        assert_eq!(stream.try_next().await.unwrap(), Some(1));
        assert_eq!(stream.try_next().await.unwrap(), Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(stream.try_next().await.unwrap(), Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_when_page_limit_is_exceeded() {
        let calls = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&calls);
        let stream = paginate_with_limit("endless".to_owned(), 3, move |page| {
            cc.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Ok::<_, ScraperError>(vec![page]))
        });
        let result: Result<Vec<u32>, _> = stream.try_collect().await;
        assert!(
            matches!(result, Err(ScraperError::PaginationLimit { max_pages: 3, ref url }) if url == "endless"),
            "expected PaginationLimit, got: {result:?}"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn propagates_fetch_errors() {
        let stream = paginate("broken".to_owned(), |_page| {
            futures::future::ready(Err::<Vec<u32>, _>(ScraperError::NotFound {
                url: "https://example.com/products.json?page=1".to_owned(),
            }))
        });
        let result: Result<Vec<u32>, _> = stream.try_collect().await;
        assert!(matches!(result, Err(ScraperError::NotFound { .. })));
    }
}
