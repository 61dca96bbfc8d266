//! Normalization from [`VariantRecord`]s to [`shopcat_core::OutputRow`]s.

use shopcat_core::OutputRow;

use crate::variants::VariantRecord;

/// Builds the export row for `record`, first seen in the collection titled
/// `collection_title`.
///
/// All text fields are whitespace-trimmed. The thumbnail is derived from the
/// trimmed image URL.
#[must_use]
pub fn normalize_row(collection_title: &str, record: &VariantRecord) -> OutputRow {
    let image_url = record.image_src.trim().to_owned();
    let image_thumbnail_url = thumbnail_url(&image_url);

    OutputRow {
        code: clean(&record.sku),
        collection: clean(collection_title),
        category: clean(&record.product_type),
        name: clean(&record.title),
        variant_name: clean(&record.option_value),
        price: clean(&record.price),
        in_stock: record.in_stock,
        url: clean(&record.product_url),
        image_url,
        image_thumbnail_url,
        body: clean(&record.body_html),
    }
}

/// Derives the Shopify `_large` thumbnail URL from an image URL.
///
/// Replaces the first `.jpg` with `_large.jpg`, or failing that the first
/// `.png` with `_large.png`. Any other URL is returned unchanged.
#[must_use]
pub fn thumbnail_url(image_url: &str) -> String {
    if image_url.contains(".jpg") {
        image_url.replacen(".jpg", "_large.jpg", 1)
    } else if image_url.contains(".png") {
        image_url.replacen(".png", "_large.png", 1)
    } else {
        image_url.to_owned()
    }
}

fn clean(value: &str) -> String {
    value.trim().to_owned()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
