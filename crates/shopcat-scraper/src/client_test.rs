use super::*;

#[test]
fn collections_url_first_page() {
    let url = ShopifyClient::collections_url("https://shop.example.com", 1).unwrap();
    assert_eq!(url, "https://shop.example.com/collections.json?page=1");
}

#[test]
fn products_url_without_collection() {
    let url = ShopifyClient::products_url("https://shop.example.com", 3, None).unwrap();
    assert_eq!(url, "https://shop.example.com/products.json?page=3");
}

#[test]
fn products_url_scoped_to_collection() {
    let url =
        ShopifyClient::products_url("https://shop.example.com", 2, Some("summer-sale")).unwrap();
    assert_eq!(
        url,
        "https://shop.example.com/collections/summer-sale/products.json?page=2"
    );
}

#[test]
fn products_url_rejects_invalid_base() {
    let result = ShopifyClient::products_url("not-a-url", 1, None);
    let err = result.unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidShopUrl { .. }),
        "expected InvalidShopUrl, got: {err:?}"
    );
}

#[test]
fn normalize_site_url_adds_https_and_strips_trailing_slash() {
    assert_eq!(normalize_site_url("example.com/"), "https://example.com");
}

#[test]
fn normalize_site_url_keeps_http_scheme() {
    assert_eq!(
        normalize_site_url("http://example.com"),
        "http://example.com"
    );
}

#[test]
fn normalize_site_url_keeps_https_scheme() {
    assert_eq!(
        normalize_site_url("https://example.com///"),
        "https://example.com"
    );
}

#[test]
fn normalize_site_url_trims_whitespace() {
    assert_eq!(
        normalize_site_url("  \texample.com/ \n"),
        "https://example.com"
    );
}

#[test]
fn normalize_site_url_keeps_path() {
    assert_eq!(
        normalize_site_url("shop.example.com/en/"),
        "https://shop.example.com/en"
    );
}

#[test]
fn extract_domain_strips_scheme() {
    assert_eq!(
        extract_domain("https://shop.example.com"),
        "shop.example.com"
    );
    assert_eq!(
        extract_domain("http://shop.example.com/en"),
        "shop.example.com"
    );
}

#[test]
fn extract_domain_fallback_no_scheme() {
    assert_eq!(extract_domain("shop.example.com"), "shop.example.com");
}

#[test]
fn classify_status_success_is_none() {
    let result = classify_status(StatusCode::OK, "u", "https://a.com");
    assert!(result.is_none());
}

#[test]
fn classify_status_failure_codes_are_blocked() {
    for code in [400u16, 401, 402, 403, 410, 429, 430, 500, 502, 503] {
        let status = StatusCode::from_u16(code).unwrap();
        match classify_status(status, "u", "https://a.com") {
            Some(ScraperError::Blocked { status, domain }) => {
                assert_eq!(status, code);
                assert_eq!(domain, "a.com");
            }
            other => panic!("expected Blocked for {code}, got: {other:?}"),
        }
    }
}

#[test]
fn classify_status_not_found() {
    let err = classify_status(StatusCode::NOT_FOUND, "https://a.com/x", "https://a.com").unwrap();
    assert!(matches!(err, ScraperError::NotFound { ref url } if url == "https://a.com/x"));
}
