// Configuration for the history fetcher:
// - API base URL and key (from environment variables or command line)
// - HTTP timeout and inter-request delay
// - Row cap and transaction page size

use dotenv::dotenv;
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://pro-api.solscan.io";
pub const DEFAULT_MAX_ROWS: usize = 20_000;
pub const BALANCE_CHANGE_PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: Option<String>,
    pub http_timeout: Duration,
    pub request_delay: Duration,
    pub max_rows: usize,
    pub tx_page_limit: u32,
    pub strict_row_cap: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let api_url = env::var("SOLSCAN_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_key = env::var("SOLSCAN_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let http_timeout = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));
        let request_delay = env::var("REQUEST_DELAY_MS")
            .unwrap_or_else(|_| "120".to_string())
            .parse()
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(120));
        let max_rows = env::var("MAX_ROWS")
            .map(|v| v.parse().unwrap_or(DEFAULT_MAX_ROWS))
            .unwrap_or(DEFAULT_MAX_ROWS);
        let tx_page_limit = env::var("TX_PAGE_LIMIT")
            .map(|v| v.parse().unwrap_or(40))
            .unwrap_or(40);
        let strict_row_cap = env::var("STRICT_ROW_CAP")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            api_url,
            api_key,
            http_timeout,
            request_delay,
            max_rows,
            tx_page_limit,
            strict_row_cap,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            http_timeout: Duration::from_secs(30),
            request_delay: Duration::from_millis(120),
            max_rows: DEFAULT_MAX_ROWS,
            tx_page_limit: 40,
            strict_row_cap: false,
        }
    }
}

// Keeps the key out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("http_timeout", &self.http_timeout)
            .field("request_delay", &self.request_delay)
            .field("max_rows", &self.max_rows)
            .field("tx_page_limit", &self.tx_page_limit)
            .field("strict_row_cap", &self.strict_row_cap)
            .finish()
    }
}
