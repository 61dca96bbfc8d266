//! Per-variant expansion of raw Shopify products.
//!
//! Each product fans out into one [`VariantRecord`] per variant, carrying the
//! product-level fields alongside the variant's option string, stock flag,
//! and resolved image.

use crate::types::{ShopifyImage, ShopifyProduct, ShopifyVariant};

/// One variant of a product, with its product context resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub sku: String,
    pub product_type: String,
    pub title: String,
    pub option_value: String,
    pub price: String,
    pub in_stock: bool,
    pub body_html: String,
    /// Product handle followed by the variant id. Unique across the site.
    pub variant_key: String,
    pub product_url: String,
    pub image_src: String,
}

/// Expands `product` into one record per variant, in variant order.
#[must_use]
pub fn expand_variants(base_url: &str, product: &ShopifyProduct) -> Vec<VariantRecord> {
    let product_url = format!("{base_url}/products/{}", product.handle);
    let product_type = product.product_type.clone().unwrap_or_default();
    let body_html = product.body_html.clone().unwrap_or_default();

    product
        .variants
        .iter()
        .map(|variant| VariantRecord {
            sku: variant.sku.clone().unwrap_or_default(),
            product_type: product_type.clone(),
            title: product.title.clone(),
            option_value: option_value(variant),
            price: variant.price.clone(),
            in_stock: variant.available,
            body_html: body_html.clone(),
            variant_key: variant_key(&product.handle, variant.id),
            product_url: product_url.clone(),
            image_src: resolve_image_src(&product.images, variant.id),
        })
        .collect()
}

/// Joins `option1`, `option2`, `option3` with single spaces, skipping absent
/// options. `("Red", null, "Large")` becomes `"Red Large"`.
///
/// This is not a plain join of all three slots: a null or empty middle option
/// leaves no double space behind, so the result differs from
/// `"Red  Large"`.
#[must_use]
pub fn option_value(variant: &ShopifyVariant) -> String {
    [&variant.option1, &variant.option2, &variant.option3]
        .into_iter()
        .filter_map(|opt| opt.as_deref())
        .filter(|opt| !opt.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_owned()
}

/// Returns the `src` of the first image attached to `variant_id`, if any.
#[must_use]
pub fn image_for_variant(images: &[ShopifyImage], variant_id: i64) -> Option<&str> {
    images
        .iter()
        .find(|image| image.variant_ids.contains(&variant_id))
        .map(|image| image.src.as_str())
        .filter(|src| !src.is_empty())
}

/// The variant's own image, else the product's first image, else `""`.
#[must_use]
pub fn resolve_image_src(images: &[ShopifyImage], variant_id: i64) -> String {
    image_for_variant(images, variant_id)
        .or_else(|| images.first().map(|image| image.src.as_str()))
        .unwrap_or_default()
        .to_owned()
}

fn variant_key(product_handle: &str, variant_id: i64) -> String {
    format!("{product_handle}{variant_id}")
}
