pub mod client;
pub mod error;
pub mod extract;
pub mod normalize;
mod pagination;
pub mod rate_limit;
pub mod types;
pub mod variants;

pub use client::{normalize_site_url, ShopifyClient};
pub use error::ScraperError;
pub use extract::{CatalogExtractor, CollectionFilter, ExtractSummary};
pub use normalize::{normalize_row, thumbnail_url};
pub use rate_limit::{RetryPolicy, Sleeper, TokioSleeper};
pub use types::{ShopifyCollection, ShopifyImage, ShopifyProduct, ShopifyVariant};
pub use variants::{expand_variants, VariantRecord};
