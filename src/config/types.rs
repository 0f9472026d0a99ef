use serde::Deserialize;

/// Default listing page of the catalog
pub const DEFAULT_LISTING_URL: &str = "https://www.imdb.com/chart/top/";

/// Default origin that relative listing links are resolved against
pub const DEFAULT_SITE_ORIGIN: &str = "https://www.imdb.com";

/// Default size of the worker pool
pub const DEFAULT_WORKER_COUNT: usize = 40;

/// Default bound of the work queue and result channel
pub const DEFAULT_QUEUE_CAPACITY: usize = 250;

/// Default path of the bulk-load document
pub const DEFAULT_BULK_PATH: &str = "./movies.json";

/// Main configuration structure for Catalog-Harvest
///
/// Every section is optional; a missing section takes its defaults, so an
/// empty file is equivalent to running without one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub pipeline: PipelineConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Where the catalog lives
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// The single page enumerating every catalog item
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Origin prefixed to relative detail-page links
    #[serde(rename = "site-origin")]
    pub site_origin: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
        }
    }
}

/// Worker pool settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of concurrent workers
    #[serde(rename = "worker-count")]
    pub worker_count: usize,

    /// Bound of the work queue and of the result channel
    #[serde(rename = "queue-capacity")]
    pub queue_capacity: usize,

    /// Leave records with missing fields out of the output file
    #[serde(rename = "drop-incomplete")]
    pub drop_incomplete: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            drop_incomplete: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// Optional URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) if !url.is_empty() => {
                format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url)
            }
            _ => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// HTTP client timeouts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the bulk-load document, overwritten on each run
    #[serde(rename = "bulk-path")]
    pub bulk_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bulk_path: DEFAULT_BULK_PATH.to_string(),
        }
    }
}
