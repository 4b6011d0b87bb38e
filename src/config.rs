use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_GAME_LOG_BATCH_DELAY_MS,
    DEFAULT_INJURY_BATCH_DELAY_MS, DEFAULT_RANKINGS_TIMEOUT_MS, DEFAULT_REQUEST_DELAY_MS,
    RANKINGS_URL, STAT_SITE_BASE,
};
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub batch_size: usize,
    pub injury_batch_delay_ms: u64,
    pub game_log_batch_delay_ms: u64,
    pub request_delay_ms: u64,
    pub fetch_timeout_ms: u64,
    pub rankings_timeout_ms: u64,
    pub output_path: String,
    pub stat_site_base: String,
    pub rankings_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            injury_batch_delay_ms: DEFAULT_INJURY_BATCH_DELAY_MS,
            game_log_batch_delay_ms: DEFAULT_GAME_LOG_BATCH_DELAY_MS,
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            rankings_timeout_ms: DEFAULT_RANKINGS_TIMEOUT_MS,
            output_path: "output/run_result.json".to_string(),
            stat_site_base: STAT_SITE_BASE.to_string(),
            rankings_url: RANKINGS_URL.to_string(),
        }
    }
}

impl Config {
    /// Loads `config.toml` from the working directory, falling back to the
    /// compiled-in defaults when the file is absent.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        if config.batch_size == 0 {
            return Err(ScraperError::Config("batch_size must be positive".into()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_from("does_not_exist.toml").unwrap();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.request_delay_ms, DEFAULT_REQUEST_DELAY_MS);
    }

    #[test]
    fn partial_file_keeps_defaults_for_omitted_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "batch_size = 3\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.fetch_timeout_ms, DEFAULT_FETCH_TIMEOUT_MS);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "batch_size = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
