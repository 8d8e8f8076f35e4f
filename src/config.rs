use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROVIDER_URL: &str = "https://www.ted.com";

/// Runtime settings for fetching and caching subtitles.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding `static/{srt,vtt,txt}`.
    pub base_dir: PathBuf,
    /// Scheme and host of the caption provider, without a trailing slash.
    pub provider_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("talksub/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_provider_url(mut self, provider_url: impl Into<String>) -> Self {
        self.provider_url = provider_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
