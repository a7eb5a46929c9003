//! API endpoint configuration.
//!
//! Resolution order for the base URL:
//! 1. a runtime override set through `init_api_config()` (JS bridge),
//! 2. `API_BASE_URL` injected at build time,
//! 3. the page origin (`window.location.origin`),
//! 4. the local development backend.

use std::cell::RefCell;

const DEV_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    base_url: String,
    demo_fallback: bool,
}

impl Default for ApiConfig {
    /// Points at the local development backend.  Demo fallback follows the
    /// build profile unless `DEMO_FALLBACK` was set at build time.
    fn default() -> Self {
        Self {
            base_url: DEV_BASE_URL.to_string(),
            demo_fallback: parse_flag(option_env!("DEMO_FALLBACK"))
                .unwrap_or(cfg!(debug_assertions)),
        }
    }
}

impl ApiConfig {
    /// Create a new ApiConfig from a URL string
    pub fn from_url(url: &str) -> Self {
        Self {
            base_url: url.trim().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Get the base URL for all API calls
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether failed reads may be replaced by the demo dataset.
    pub fn demo_fallback(&self) -> bool {
        self.demo_fallback
    }

    /// Full URL for an API path such as `/transactions`.
    pub fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/api/{}", self.base_url, path)
    }
}

/// Interpret `1/true/yes/on` and `0/false/no/off`.
pub fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

thread_local! {
    static API_CONFIG: RefCell<Option<ApiConfig>> = const { RefCell::new(None) };
}

fn page_origin() -> Option<String> {
    let origin = web_sys::window()?.location().origin().ok()?;
    if origin.starts_with("http") {
        Some(origin)
    } else {
        None
    }
}

fn non_blank(url: Option<&str>) -> Option<&str> {
    url.filter(|u| !u.trim().is_empty())
}

/// Pick the base URL source in resolution order (see module docs).
/// `origin` is only consulted when nothing else is set.
pub fn resolve_config(
    runtime: Option<&str>,
    build_time: Option<&str>,
    origin: impl FnOnce() -> Option<String>,
) -> ApiConfig {
    if let Some(url) = non_blank(runtime).or_else(|| non_blank(build_time)) {
        return ApiConfig::from_url(url);
    }
    origin()
        .map(|o| ApiConfig::from_url(&o))
        .unwrap_or_default()
}

/// Install the configuration.  `url` overrides any build-time value.
pub fn init_api_config(url: Option<&str>) -> ApiConfig {
    let config = resolve_config(url, option_env!("API_BASE_URL"), page_origin);
    API_CONFIG.with(|c| *c.borrow_mut() = Some(config.clone()));
    config
}

/// Current configuration, initialising it lazily on first use.
pub fn api_config() -> ApiConfig {
    let existing = API_CONFIG.with(|c| c.borrow().clone());
    existing.unwrap_or_else(|| init_api_config(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joining_strips_slashes() {
        let cfg = ApiConfig::from_url("https://api.example.com/ ");
        assert_eq!(cfg.base_url(), "https://api.example.com");
        assert_eq!(cfg.url("/transactions/4"), "https://api.example.com/api/transactions/4");
        assert_eq!(cfg.url("auth/me"), "https://api.example.com/api/auth/me");
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag(Some(" TRUE ")), Some(true));
        assert_eq!(parse_flag(Some("off")), Some(false));
        assert_eq!(parse_flag(Some("maybe")), None);
        assert_eq!(parse_flag(None), None);
    }

    #[test]
    fn base_url_resolution_order() {
        let origin = || Some("https://app.example.com".to_string());
        let no_origin = || None;

        let cfg = resolve_config(
            Some("https://runtime.example.com/"),
            Some("https://build.example.com"),
            origin,
        );
        assert_eq!(cfg.base_url(), "https://runtime.example.com");

        let cfg = resolve_config(Some("  "), Some("https://build.example.com"), origin);
        assert_eq!(cfg.base_url(), "https://build.example.com");

        let cfg = resolve_config(None, None, origin);
        assert_eq!(cfg.base_url(), "https://app.example.com");

        let cfg = resolve_config(None, Some(""), no_origin);
        assert_eq!(cfg.base_url(), DEV_BASE_URL);
    }

    #[test]
    fn from_url_keeps_the_default_fallback_policy() {
        let cfg = ApiConfig::from_url("http://x");
        assert_eq!(cfg.demo_fallback(), ApiConfig::default().demo_fallback());
    }
}
