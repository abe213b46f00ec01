use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the season fetcher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Stats provider endpoints
    pub provider: ProviderConfig,

    /// HTTP client configuration
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Season schedule URL, `{season}` is replaced by the season token (e.g. "20172018")
    pub schedule_url_template: String,

    /// Game feed URL, `{game_id}` is replaced by the game id
    pub feed_url_template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            schedule_url_template: "http://live.nhl.com/GameData/SeasonSchedule-{season}.json"
                .to_string(),
            feed_url_template: "http://statsapi.web.nhl.com/api/v1/game/{game_id}/feed/live"
                .to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("faceoff-ratio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn schedule_url(&self, season: &str) -> String {
        self.schedule_url_template.replace("{season}", season)
    }

    pub fn feed_url(&self, game_id: u64) -> String {
        self.feed_url_template.replace("{game_id}", &game_id.to_string())
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FetcherConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> anyhow::Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: FetcherConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.with_env_overrides()
    }

    fn with_env_overrides(self) -> anyhow::Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FACEOFF_SCHEDULE_URL") {
            self.provider.schedule_url_template = url;
        }

        if let Some(url) = lookup("FACEOFF_FEED_URL") {
            self.provider.feed_url_template = url;
        }

        if let Some(timeout) = lookup("FACEOFF_HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = timeout
                .parse()
                .with_context(|| format!("Invalid FACEOFF_HTTP_TIMEOUT_SECS: {timeout:?}"))?;
        }

        if let Some(agent) = lookup("FACEOFF_USER_AGENT") {
            self.http.user_agent = agent;
        }

        Ok(self)
    }
}
