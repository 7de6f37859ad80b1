use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Default remote sheet CSV export URL
    #[serde(default)]
    pub sheet_url: Option<String>,

    /// Fallback text encoding for the sheet body
    #[serde(default = "default_sheet_encoding")]
    pub sheet_encoding: String,

    /// Upper bound on the remote sheet fetch, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum PriorityWatch votes kept per movie
    #[serde(default = "default_highpriority_limit")]
    pub highpriority_limit: usize,

    /// Population copies contributed by one PriorityWatch vote
    #[serde(default = "default_priority_copies")]
    pub priority_copies: usize,

    /// Stop ingesting at the first row with a blank movie name
    #[serde(default)]
    pub stop_at_first_empty: bool,

    /// Ratio between consecutive weights of the exponential schedule
    #[serde(default = "default_decay_ratio")]
    pub decay_ratio: f64,

    /// Weight multiplier applied per Skip vote when lowering probability
    #[serde(default = "default_skip_penalty")]
    pub skip_penalty: f64,

    /// Movies drawn when a request does not say how many
    #[serde(default = "default_num_movies")]
    pub default_num_movies: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_sheet_encoding() -> String {
    "utf-8".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_highpriority_limit() -> usize {
    5
}

fn default_priority_copies() -> usize {
    3
}

fn default_decay_ratio() -> f64 {
    0.8
}

fn default_skip_penalty() -> f64 {
    0.5
}

fn default_num_movies() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: None,
            sheet_encoding: default_sheet_encoding(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            highpriority_limit: default_highpriority_limit(),
            priority_copies: default_priority_copies(),
            stop_at_first_empty: false,
            decay_ratio: default_decay_ratio(),
            skip_penalty: default_skip_penalty(),
            default_num_movies: default_num_movies(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Settings consumed by sheet ingestion
    pub fn ingestion(&self) -> IngestionConfig {
        IngestionConfig {
            highpriority_limit: self.highpriority_limit,
            stop_at_first_empty: self.stop_at_first_empty,
            ..IngestionConfig::default()
        }
    }

    /// Settings consumed by the selection pipeline
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            ingestion: self.ingestion(),
            default_sheet_url: self.sheet_url.clone(),
            default_num_movies: self.default_num_movies,
            priority_copies: self.priority_copies,
            decay_ratio: self.decay_ratio,
            skip_penalty: self.skip_penalty,
        }
    }
}

/// Explicit ingestion parameters, passed into the sheet parser
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionConfig {
    pub highpriority_limit: usize,
    pub stop_at_first_empty: bool,
    pub default_preference: crate::models::MoviePreference,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            highpriority_limit: default_highpriority_limit(),
            stop_at_first_empty: false,
            default_preference: crate::models::MoviePreference::Watch,
        }
    }
}

/// Parameters for one selection run beyond what the request carries
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub ingestion: IngestionConfig,
    pub default_sheet_url: Option<String>,
    pub default_num_movies: usize,
    pub priority_copies: usize,
    pub decay_ratio: f64,
    pub skip_penalty: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Config::default().pipeline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sheet_encoding, "utf-8");
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.highpriority_limit, 5);
        assert_eq!(config.priority_copies, 3);
        assert!(!config.stop_at_first_empty);
    }

    #[test]
    fn test_envy_overrides() {
        let vars = vec![
            ("SHEET_URL".to_string(), "http://sheet.local/export".to_string()),
            ("HIGHPRIORITY_LIMIT".to_string(), "2".to_string()),
            ("STOP_AT_FIRST_EMPTY".to_string(), "true".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(
            config.sheet_url.as_deref(),
            Some("http://sheet.local/export")
        );
        assert_eq!(config.highpriority_limit, 2);
        assert_eq!(config.port, 3000);

        let ingestion = config.ingestion();
        assert_eq!(ingestion.highpriority_limit, 2);
        assert!(ingestion.stop_at_first_empty);
        assert_eq!(ingestion.default_preference, crate::models::MoviePreference::Watch);
    }

    #[test]
    fn test_pipeline_carries_sheet_url() {
        let config = Config {
            sheet_url: Some("http://sheet.local".to_string()),
            ..Config::default()
        };
        let pipeline = config.pipeline();
        assert_eq!(pipeline.default_sheet_url.as_deref(), Some("http://sheet.local"));
        assert_eq!(pipeline.priority_copies, 3);
    }
}
