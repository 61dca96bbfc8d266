//! Lazy multi-page listings for `ShopifyClient`.

use futures::stream::{self, Stream, TryStreamExt};

use crate::error::ScraperError;
use crate::pagination::{paginate, FIRST_PAGE};
use crate::types::{ShopifyCollection, ShopifyProduct};
use crate::variants::{expand_variants, VariantRecord};

use super::ShopifyClient;

impl ShopifyClient {
    /// Streams every collection of the storefront, in upstream order.
    ///
    /// Pages are requested on demand starting at page 1; the stream ends at
    /// the first empty page. Dropping the stream and calling this again
    /// starts over from page 1.
    pub fn collections<'a>(
        &'a self,
        base_url: &'a str,
    ) -> impl Stream<Item = Result<ShopifyCollection, ScraperError>> + 'a {
        let url = format!("{base_url}/collections.json");
        paginate(url, move |page| self.paced_collections(base_url, page))
    }

    /// Streams every product of the storefront, or of one collection when
    /// `collection_handle` is set.
    pub fn products<'a>(
        &'a self,
        base_url: &'a str,
        collection_handle: Option<String>,
    ) -> impl Stream<Item = Result<ShopifyProduct, ScraperError>> + 'a {
        let endpoint = match &collection_handle {
            Some(handle) => format!("{base_url}/collections/{handle}/products.json"),
            None => format!("{base_url}/products.json"),
        };
        paginate(endpoint, move |page| {
            let handle = collection_handle.clone();
            async move {
                self.pace(page).await;
                self.fetch_products_page(base_url, page, handle.as_deref())
                    .await
            }
        })
    }

    /// Streams one [`VariantRecord`] per variant of every product in
    /// [`Self::products`], in product then variant order.
    pub fn variant_records<'a>(
        &'a self,
        base_url: &'a str,
        collection_handle: Option<String>,
    ) -> impl Stream<Item = Result<VariantRecord, ScraperError>> + 'a {
        self.products(base_url, collection_handle)
            .map_ok(move |product| {
                stream::iter(
                    expand_variants(base_url, &product)
                        .into_iter()
                        .map(Ok::<_, ScraperError>),
                )
            })
            .try_flatten()
    }

    async fn paced_collections(
        &self,
        base_url: &str,
        page: u32,
    ) -> Result<Vec<ShopifyCollection>, ScraperError> {
        self.pace(page).await;
        self.fetch_collections_page(base_url, page).await
    }

    /// Applies the inter-request delay before every page but the first.
    async fn pace(&self, page: u32) {
        if page > FIRST_PAGE && !self.inter_request_delay.is_zero() {
            self.sleeper.sleep(self.inter_request_delay).await;
        }
    }
}
