//! Catalog extraction: collections × products, filtered and deduplicated.
//!
//! A product may belong to several collections. Its variants are emitted once,
//! under the first collection (in upstream order) that lists them.

use std::collections::HashSet;

use futures::stream::{LocalBoxStream, StreamExt, TryStreamExt};
use shopcat_core::OutputRow;

use crate::client::ShopifyClient;
use crate::error::ScraperError;
use crate::normalize::normalize_row;
use crate::types::ShopifyCollection;
use crate::variants::VariantRecord;

/// Allow-list of collection handles. An empty filter allows every collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionFilter {
    handles: HashSet<String>,
}

impl CollectionFilter {
    /// A filter that allows every collection.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Parses a comma-separated list of handles, ignoring blank entries.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::from_handles(list.split(','))
    }

    #[must_use]
    pub fn from_handles<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let handles = handles
            .into_iter()
            .map(|h| h.as_ref().trim().to_owned())
            .filter(|h| !h.is_empty())
            .collect();
        Self { handles }
    }

    #[must_use]
    pub fn allows(&self, handle: &str) -> bool {
        self.handles.is_empty() || self.handles.contains(handle)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Counters for one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub collections_visited: usize,
    pub collections_skipped: usize,
    pub rows_emitted: usize,
    pub duplicates_skipped: usize,
}

struct ActiveCollection<'a> {
    title: String,
    records: LocalBoxStream<'a, Result<VariantRecord, ScraperError>>,
}

/// Pulls normalized rows from a storefront one at a time.
///
/// Requests are issued lazily: a collection's products are only fetched once
/// the previous collection is exhausted. The seen-set of variant keys lives
/// as long as the extractor.
pub struct CatalogExtractor<'a> {
    client: &'a ShopifyClient,
    base_url: &'a str,
    filter: CollectionFilter,
    collections: LocalBoxStream<'a, Result<ShopifyCollection, ScraperError>>,
    current: Option<ActiveCollection<'a>>,
    seen: HashSet<String>,
    summary: ExtractSummary,
}

impl<'a> CatalogExtractor<'a> {
    #[must_use]
    pub fn new(client: &'a ShopifyClient, base_url: &'a str, filter: CollectionFilter) -> Self {
        Self {
            client,
            base_url,
            filter,
            collections: client.collections(base_url).boxed_local(),
            current: None,
            seen: HashSet::new(),
            summary: ExtractSummary::default(),
        }
    }

    /// Returns the next row not emitted before, or `None` once every allowed
    /// collection has been exhausted.
    ///
    /// # Errors
    ///
    /// Propagates any [`ScraperError`] from the underlying page fetches.
    pub async fn next_row(&mut self) -> Result<Option<OutputRow>, ScraperError> {
        loop {
            if let Some(active) = self.current.as_mut() {
                let next = active.records.try_next().await?;
                let Some(record) = next else {
                    self.current = None;
                    continue;
                };
                if !self.seen.insert(record.variant_key.clone()) {
                    self.summary.duplicates_skipped += 1;
                    tracing::debug!(
                        variant_key = %record.variant_key,
                        collection = %active.title,
                        "variant already emitted under an earlier collection"
                    );
                    continue;
                }
                self.summary.rows_emitted += 1;
                return Ok(Some(normalize_row(&active.title, &record)));
            }

            let Some(collection) = self.collections.try_next().await? else {
                return Ok(None);
            };

            if !self.filter.allows(&collection.handle) {
                self.summary.collections_skipped += 1;
                tracing::debug!(handle = %collection.handle, "collection not in allow-list");
                continue;
            }

            self.summary.collections_visited += 1;
            tracing::info!(
                handle = %collection.handle,
                title = %collection.title,
                "extracting collection"
            );
            let records = self
                .client
                .variant_records(self.base_url, Some(collection.handle))
                .boxed_local();
            self.current = Some(ActiveCollection {
                title: collection.title,
                records,
            });
        }
    }

    /// Drains the extractor into a `Vec`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ScraperError`] from the underlying page fetches.
    pub async fn collect_rows(&mut self) -> Result<Vec<OutputRow>, ScraperError> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    #[must_use]
    pub fn summary(&self) -> ExtractSummary {
        self.summary
    }
}
