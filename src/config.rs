use std::{env, path::PathBuf};

use crate::constants;

/// Deployment settings. Everything that shapes the requested data stays in `constants`.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,  // API base URL, without trailing slash.
    pub data_dir: PathBuf, // Root of the output tree.
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: constants::BASE_URL.to_string(),
            data_dir: PathBuf::from(constants::DATA_DIR),
        }
    }
}

impl Config {
    /// Reads `coinbase_base_url` and `data_dir` from the environment, falling back to defaults.
    /// Callers load `.env` first.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();

        let base_url = lookup("coinbase_base_url")
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let data_dir = lookup("data_dir")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        Config { base_url, data_dir }
    }
}
