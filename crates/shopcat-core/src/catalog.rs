use serde::Serialize;

/// One variant of a storefront product, flattened for export.
///
/// Every text field is whitespace-trimmed and uses an empty string where the
/// storefront returned `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    /// Variant SKU.
    pub code: String,
    /// Title of the collection the variant was first seen in.
    pub collection: String,
    /// Shopify `product_type`.
    pub category: String,
    /// Product title.
    pub name: String,
    /// `option1 option2 option3`, space-joined and trimmed.
    pub variant_name: String,
    /// Price as a decimal string, exactly as Shopify returns it, e.g. `"12.99"`.
    pub price: String,
    pub in_stock: bool,
    /// Canonical storefront URL, e.g. `"https://shop.example.com/products/blue-mug"`.
    pub url: String,
    pub image_url: String,
    /// `image_url` with a `_large` size suffix for `.jpg`/`.png` images.
    pub image_thumbnail_url: String,
    /// Raw HTML from Shopify's `body_html` field.
    pub body: String,
}

impl OutputRow {
    /// Stock flag as rendered in CSV output.
    #[must_use]
    pub fn in_stock_label(&self) -> &'static str {
        if self.in_stock {
            "Yes"
        } else {
            "No"
        }
    }
}
