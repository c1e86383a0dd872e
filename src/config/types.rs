use serde::Deserialize;

/// Main configuration structure for the archiver
///
/// Every section is optional; a missing file or a missing key falls back to
/// the defaults used against the public VK API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL that method names are appended to
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// API version, sent as the `v` query parameter when present
    pub version: Option<String>,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Issue a HEAD request before each photo download
    #[serde(rename = "probe-before-download")]
    pub probe_before_download: bool,

    /// Per-request timeout in seconds (no timeout when absent)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.vk.com/method".to_string(),
            version: None,
            user_agent: format!("vk-wall-archive/{}", env!("CARGO_PKG_VERSION")),
            probe_before_download: true,
            timeout_secs: None,
        }
    }
}

/// Pagination configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Page size of the first call, used only to learn the total count
    #[serde(rename = "discovery-count")]
    pub discovery_count: u32,

    /// Page size of every subsequent call
    #[serde(rename = "page-size")]
    pub page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            discovery_count: 1,
            page_size: 100,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the raw batch cache
    #[serde(rename = "cache-dir")]
    pub cache_dir: String,

    /// Root of the materialized archive
    #[serde(rename = "result-dir")]
    pub result_dir: String,

    /// Maximum number of concurrent filesystem operations
    #[serde(rename = "max-open-files")]
    pub max_open_files: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cache_dir: "./tmp".to_string(),
            result_dir: "./result".to_string(),
            max_open_files: 100,
        }
    }
}

/// What to archive: the wall owner and the authors to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTarget {
    /// Wall owner id (negative for communities)
    pub group_id: i64,

    /// Author ids whose display names are resolved before materialization
    pub author_ids: Vec<i64>,
}
