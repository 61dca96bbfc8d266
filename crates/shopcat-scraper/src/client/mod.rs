//! HTTP client for Shopify's public `collections.json` and `products.json`
//! endpoints.

mod enumerate;
mod origin;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ScraperError;
use crate::rate_limit::{retry_with_cooldown, RetryPolicy, Sleeper, TokioSleeper};
use crate::types::{
    ShopifyCollection, ShopifyCollectionsResponse, ShopifyProduct, ShopifyProductsResponse,
};

pub use origin::normalize_site_url;
// Re-export for test visibility via `use super::*`
#[cfg(test)]
use origin::extract_domain;

/// HTTP client for a storefront's public catalog endpoints.
///
/// Every non-2xx response except 404 is retried according to the configured
/// [`RetryPolicy`]; 404 is returned as [`ScraperError::NotFound`]. All requests
/// are issued one at a time.
pub struct ShopifyClient {
    pub(super) client: Client,
    pub(super) retry: RetryPolicy,
    pub(super) sleeper: Arc<dyn Sleeper>,
    /// Pause before every page request after the first of a listing.
    pub(super) inter_request_delay: Duration,
}

impl ShopifyClient {
    /// Creates a `ShopifyClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        retry: RetryPolicy,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            retry,
            sleeper: Arc::new(TokioSleeper),
            inter_request_delay: Duration::ZERO,
        })
    }

    /// Replaces the sleeper used for retry cooldowns and request pacing.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    #[must_use]
    pub fn with_inter_request_delay(mut self, delay: Duration) -> Self {
        self.inter_request_delay = delay;
        self
    }

    /// Fetches one page of `collections.json`, retrying while blocked.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Blocked`]: still blocked after the retry policy gave up.
    /// - [`ScraperError::NotFound`]: HTTP 404, the only status not retried.
    /// - [`ScraperError::Http`]: network or TLS failure (not retried).
    /// - [`ScraperError::Deserialize`]: response body is not the expected JSON.
    pub async fn fetch_collections_page(
        &self,
        base_url: &str,
        page: u32,
    ) -> Result<Vec<ShopifyCollection>, ScraperError> {
        let url = Self::collections_url(base_url, page)?;
        let context = format!("collections page {page} from {base_url}");
        let response: ShopifyCollectionsResponse =
            self.get_json_with_retry(&url, base_url, &context).await?;
        Ok(response.collections)
    }

    /// Fetches one page of `products.json`, optionally scoped to a collection,
    /// retrying while blocked.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_collections_page`].
    pub async fn fetch_products_page(
        &self,
        base_url: &str,
        page: u32,
        collection_handle: Option<&str>,
    ) -> Result<Vec<ShopifyProduct>, ScraperError> {
        let url = Self::products_url(base_url, page, collection_handle)?;
        let context = format!("products page {page} from {base_url}");
        let response: ShopifyProductsResponse =
            self.get_json_with_retry(&url, base_url, &context).await?;
        Ok(response.products)
    }

    /// Best-effort probe: does `base_url` serve a parseable `products.json`?
    ///
    /// Makes a single attempt without the retry loop so a blocked or
    /// unreachable site reports `false` instead of hanging. Never errors.
    pub async fn is_storefront(&self, base_url: &str) -> bool {
        let url = match Self::products_url(base_url, 1, None) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(base_url, error = %e, "storefront probe: invalid URL");
                return false;
            }
        };
        let context = format!("storefront probe of {base_url}");
        match self
            .get_json::<ShopifyProductsResponse>(&url, base_url, &context)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(base_url, error = %e, "storefront probe failed");
                false
            }
        }
    }

    async fn get_json_with_retry<R: DeserializeOwned>(
        &self,
        url: &str,
        base_url: &str,
        context: &str,
    ) -> Result<R, ScraperError> {
        retry_with_cooldown(self.retry, self.sleeper.as_ref(), || {
            self.get_json(url, base_url, context)
        })
        .await
    }

    /// Issues one GET and decodes the JSON body, mapping statuses to errors.
    async fn get_json<R: DeserializeOwned>(
        &self,
        url: &str,
        base_url: &str,
        context: &str,
    ) -> Result<R, ScraperError> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "application/json,text/html;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        if let Some(err) = classify_status(response.status(), url, base_url) {
            return Err(err);
        }

        let body = response.text().await?;
        serde_json::from_str::<R>(&body).map_err(|e| ScraperError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Builds `{base}/collections.json?page={page}`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidShopUrl`] if the result is not a valid URL.
    fn collections_url(base_url: &str, page: u32) -> Result<String, ScraperError> {
        Self::page_url(base_url, &format!("{base_url}/collections.json"), page)
    }

    /// Builds `{base}[/collections/{handle}]/products.json?page={page}`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidShopUrl`] if the result is not a valid URL.
    fn products_url(
        base_url: &str,
        page: u32,
        collection_handle: Option<&str>,
    ) -> Result<String, ScraperError> {
        let endpoint = match collection_handle {
            Some(handle) => format!("{base_url}/collections/{handle}/products.json"),
            None => format!("{base_url}/products.json"),
        };
        Self::page_url(base_url, &endpoint, page)
    }

    fn page_url(base_url: &str, endpoint: &str, page: u32) -> Result<String, ScraperError> {
        let mut url = reqwest::Url::parse(endpoint).map_err(|e| ScraperError::InvalidShopUrl {
            shop_url: base_url.to_owned(),
            reason: format!("\"{endpoint}\" is not a valid URL: {e}"),
        })?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url.to_string())
    }
}

/// Maps a non-success status to the matching [`ScraperError`], or `None` for 2xx.
///
/// 404 means the site has no catalog endpoint there. Every other failure
/// status, Shopify's 430 bot filter included, is treated as a block and left
/// to the retry policy.
fn classify_status(status: StatusCode, url: &str, base_url: &str) -> Option<ScraperError> {
    if status.is_success() {
        return None;
    }

    if status == StatusCode::NOT_FOUND {
        return Some(ScraperError::NotFound {
            url: url.to_owned(),
        });
    }

    Some(ScraperError::Blocked {
        domain: origin::extract_domain(base_url),
        status: status.as_u16(),
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
