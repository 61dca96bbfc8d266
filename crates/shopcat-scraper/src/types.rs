//! Shopify response types for the public `collections.json` and
//! `products.json` endpoints.
//!
//! Only the fields the catalog export reads are modelled; serde ignores the
//! rest. Nullable fields observed in the wild (`sku`, `body_html`,
//! `product_type`, `option2`/`option3`) are `Option` and flattened to empty
//! strings during normalization.

use serde::Deserialize;

/// Top-level response from `GET /collections.json?page=N`.
#[derive(Debug, Deserialize)]
pub struct ShopifyCollectionsResponse {
    pub collections: Vec<ShopifyCollection>,
}

/// A named grouping of products.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyCollection {
    /// URL slug, unique per site (e.g., `"summer-sale"`).
    pub handle: String,

    /// Display name (e.g., `"Summer Sale"`).
    #[serde(default)]
    pub title: String,
}

/// Top-level response from `GET [/collections/{handle}]/products.json?page=N`.
#[derive(Debug, Deserialize)]
pub struct ShopifyProductsResponse {
    pub products: Vec<ShopifyProduct>,
}

/// A single product from the Shopify storefront.
#[derive(Debug, Deserialize)]
pub struct ShopifyProduct {
    /// Display name of the product.
    pub title: String,

    /// URL slug for the product page (e.g., `"blue-ceramic-mug"`).
    pub handle: String,

    /// Raw HTML product description. May be `null` or absent.
    #[serde(default)]
    pub body_html: Option<String>,

    /// Product category string. May be empty or `null`.
    #[serde(default)]
    pub product_type: Option<String>,

    /// Full image gallery, in storefront order.
    #[serde(default)]
    pub images: Vec<ShopifyImage>,

    /// All purchasable variants for this product.
    pub variants: Vec<ShopifyVariant>,
}

/// A single purchasable variant of a [`ShopifyProduct`].
#[derive(Debug, Deserialize)]
pub struct ShopifyVariant {
    /// Shopify numeric variant ID.
    pub id: i64,

    /// Stock-keeping unit. Present but may be an empty string or `null`.
    #[serde(default)]
    pub sku: Option<String>,

    /// Current price as a decimal string (e.g., `"30.00"`).
    pub price: String,

    #[serde(default)]
    pub option1: Option<String>,
    #[serde(default)]
    pub option2: Option<String>,
    #[serde(default)]
    pub option3: Option<String>,

    /// Whether this variant is currently available for purchase. A missing
    /// flag is treated as out of stock.
    #[serde(default)]
    pub available: bool,
}

/// A product image from Shopify `products.json`.
#[derive(Debug, Deserialize)]
pub struct ShopifyImage {
    /// Canonical CDN URL.
    pub src: String,

    /// Variant IDs this image is attached to. Empty for gallery-only images.
    #[serde(default)]
    pub variant_ids: Vec<i64>,
}
