/// Desktop Chrome user agent sent with every storefront request.
///
/// Some storefronts reject requests that do not look like they come from a
/// browser, so this is the default rather than a crate-identifying string.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Fixed cooldown applied after the storefront blocks a request.
pub const DEFAULT_RETRY_COOLDOWN_SECS: u64 = 180;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub retry_cooldown_secs: u64,
    /// `None` retries blocked requests forever.
    pub max_retries: Option<u32>,
    pub inter_request_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry_cooldown_secs: DEFAULT_RETRY_COOLDOWN_SECS,
            max_retries: None,
            inter_request_delay_ms: 0,
        }
    }
}
