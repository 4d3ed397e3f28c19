use chrono::NaiveDate;
use serde::Deserialize;

/// Main configuration structure for News-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    pub content: ContentConfig,
    pub dates: DateRangeConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Search query and pagination configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Search engine endpoint the query string is appended to
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Keywords every result must contain (sent quoted)
    #[serde(rename = "required-keywords")]
    pub required_keywords: Vec<String>,

    /// Keywords appended unquoted to widen the search
    #[serde(rename = "optional-keywords", default)]
    pub optional_keywords: Vec<String>,

    /// Maximum result pages collected per day
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum collection attempts per day before giving up
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Keywords scored against fetched page text
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    pub keywords: Vec<String>,
}

/// Inclusive date range to sweep
#[derive(Debug, Clone, Deserialize)]
pub struct DateRangeConfig {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Page load timeout (seconds)
    #[serde(rename = "page-load-timeout", default = "default_timeout_secs")]
    pub page_load_timeout: u64,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    #[serde(rename = "chrome-executable", default)]
    pub chrome_executable: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            page_load_timeout: default_timeout_secs(),
            chrome_executable: None,
        }
    }
}

/// Page fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout: u64,

    /// Maximum pages fetched and scored at once within a day
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout_secs(),
            concurrency: default_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

/// Randomized pause ranges, each `[min, max]` in seconds
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PacingConfig {
    #[serde(rename = "between-pages", default = "default_between_pages")]
    pub between_pages: [u64; 2],

    #[serde(rename = "restart-cooldown", default = "default_restart_cooldown")]
    pub restart_cooldown: [u64; 2],

    #[serde(rename = "renavigate-cooldown", default = "default_renavigate_cooldown")]
    pub renavigate_cooldown: [u64; 2],

    #[serde(rename = "between-days", default = "default_between_days")]
    pub between_days: [u64; 2],
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            between_pages: default_between_pages(),
            restart_cooldown: default_restart_cooldown(),
            renavigate_cooldown: default_renavigate_cooldown(),
            between_days: default_between_days(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Folder receiving the report CSV and its metadata sidecar
    #[serde(default = "default_output_folder")]
    pub folder: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            folder: default_output_folder(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.google.com/search".to_string()
}

fn default_max_pages() -> u32 {
    3
}

fn default_max_attempts() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_concurrency() -> u32 {
    4
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36".to_string()
}

fn default_between_pages() -> [u64; 2] {
    [3, 7]
}

fn default_restart_cooldown() -> [u64; 2] {
    [5, 10]
}

fn default_renavigate_cooldown() -> [u64; 2] {
    [7, 12]
}

fn default_between_days() -> [u64; 2] {
    [7, 15]
}

fn default_output_folder() -> String {
    "./data".to_string()
}
