//! Site URL canonicalization and domain extraction for the Shopify client.

/// Canonicalizes a user-supplied site address into a fetch-ready base URL.
///
/// Trims surrounding whitespace, prepends `https://` when no `http://` or
/// `https://` scheme is present, and strips trailing slashes. Given
/// `" shop.example.com/ "`, returns `"https://shop.example.com"`.
#[must_use]
pub fn normalize_site_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };
    with_scheme.trim_end_matches('/').to_owned()
}

/// Extracts the hostname from a site URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
pub(super) fn extract_domain(site_url: &str) -> String {
    reqwest::Url::parse(site_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| site_url.to_owned())
}
