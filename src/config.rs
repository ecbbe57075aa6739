use dotenvy::dotenv;
use std::env;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.linkup.so/v1/search";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Upstream search thoroughness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    #[default]
    Standard,
    Deep,
}

impl Depth {
    pub fn parse(value: &str) -> Option<Depth> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Depth::Standard),
            "deep" => Some(Depth::Deep),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Standard => "standard",
            Depth::Deep => "deep",
        }
    }
}

/// Shape of the upstream document: a flat result list or an answer with cited sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputType {
    #[default]
    SearchResults,
    SourcedAnswer,
}

impl OutputType {
    /// Anything that is not (case-insensitively) `sourcedAnswer` selects search results.
    pub fn parse(value: &str) -> OutputType {
        if value.trim().eq_ignore_ascii_case("sourcedanswer") {
            OutputType::SourcedAnswer
        } else {
            OutputType::SearchResults
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::SearchResults => "searchResults",
            OutputType::SourcedAnswer => "sourcedAnswer",
        }
    }
}

/// Process-wide settings. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub upstream_url: String,
    pub default_depth: Depth,
    pub default_output_type: OutputType,
    pub debug_attach_original: bool,
    pub enable_cors: bool,
    pub expose_error_detail: bool,
    pub static_include_domains: Option<Vec<String>>,
    pub static_exclude_domains: Option<Vec<String>>,
    pub static_from_date: Option<String>,
    pub static_to_date: Option<String>,
    pub static_include_images: bool,
    pub request_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            default_depth: Depth::Standard,
            default_output_type: OutputType::SearchResults,
            debug_attach_original: false,
            enable_cors: false,
            expose_error_detail: false,
            static_include_domains: None,
            static_exclude_domains: None,
            static_from_date: None,
            static_to_date: None,
            static_include_images: false,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Config {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Never fails: bad or missing values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_depth = match get("LINKUP_DEFAULT_DEPTH") {
            Some(raw) => Depth::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("unknown LINKUP_DEFAULT_DEPTH {raw:?}, using standard");
                Depth::Standard
            }),
            None => Depth::Standard,
        };

        let config = Config {
            api_key: get("LINKUP_API_KEY").map(|k| k.trim().to_string()),
            upstream_url: get("LINKUP_API_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            default_depth,
            default_output_type: get("LINKUP_DEFAULT_OUTPUT_TYPE")
                .map(|raw| OutputType::parse(&raw))
                .unwrap_or_default(),
            debug_attach_original: parse_bool(get("DEBUG_ATTACH_ORIGINAL")),
            enable_cors: parse_bool(get("ENABLE_CORS")),
            expose_error_detail: parse_bool(get("EXPOSE_ERROR_DETAIL")),
            static_include_domains: parse_domain_list(
                "LINKUP_STATIC_INCLUDE_DOMAINS",
                get("LINKUP_STATIC_INCLUDE_DOMAINS"),
            ),
            static_exclude_domains: parse_domain_list(
                "LINKUP_STATIC_EXCLUDE_DOMAINS",
                get("LINKUP_STATIC_EXCLUDE_DOMAINS"),
            ),
            static_from_date: get("LINKUP_STATIC_FROM_DATE").map(|d| d.trim().to_string()),
            static_to_date: get("LINKUP_STATIC_TO_DATE").map(|d| d.trim().to_string()),
            static_include_images: parse_bool(get("LINKUP_STATIC_INCLUDE_IMAGES")),
            request_timeout_ms: parse_positive_int(
                get("REQUEST_TIMEOUT_MS"),
                DEFAULT_REQUEST_TIMEOUT_MS,
            ),
        };

        if config.api_key.is_none() {
            tracing::warn!("LINKUP_API_KEY is not set, search requests will be rejected");
        }

        config
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// `true`, `1` and `yes` (any case) are true. Everything else is false.
pub fn parse_bool(value: Option<String>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes")
    )
}

pub fn parse_positive_int(value: Option<String>, default: u64) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

fn parse_domain_list(key: &str, value: Option<String>) -> Option<Vec<String>> {
    let raw = value?;
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(domains) => Some(domains),
        Err(e) => {
            tracing::warn!("ignoring {key}: not a JSON array of strings ({e})");
            None
        }
    }
}
