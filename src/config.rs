// Process configuration, read once from the environment (and an optional
// `.env` file) at start-up.

use crate::api::DEFAULT_OMDB_URL;
use crate::storage::StorageKind;
use std::env;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub storage: StorageKind,
    pub data_dir: PathBuf,
    pub template_dir: PathBuf,
}

impl Config {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset:
    ///
    /// - `OMDB_API_KEY`: no default; adding movies fails without it
    /// - `OMDB_API_URL`: `http://www.omdbapi.com/`
    /// - `MOVIES_STORAGE`: `json` (or `csv`)
    /// - `MOVIES_DATA_DIR`: `<user data dir>/movie-shelf`
    /// - `MOVIES_TEMPLATE_DIR`: `templates`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let storage = match lookup("MOVIES_STORAGE") {
            Some(value) => value.parse::<StorageKind>().unwrap_or_else(|e| {
                warn!("{}, using json", e);
                StorageKind::Json
            }),
            None => StorageKind::default(),
        };
        let data_dir = lookup("MOVIES_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Config {
            api_key: lookup("OMDB_API_KEY").filter(|k| !k.trim().is_empty()),
            api_url: lookup("OMDB_API_URL").unwrap_or_else(|| DEFAULT_OMDB_URL.into()),
            storage,
            data_dir,
            template_dir: lookup("MOVIES_TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("templates")),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("movie-shelf"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_url, DEFAULT_OMDB_URL);
        assert_eq!(config.storage, StorageKind::Json);
        assert_eq!(config.template_dir, PathBuf::from("templates"));
        assert!(config.data_dir.ends_with("movie-shelf") || config.data_dir == PathBuf::from("data"));
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("OMDB_API_KEY", "abc123"),
            ("MOVIES_STORAGE", "CSV"),
            ("MOVIES_DATA_DIR", "/tmp/shelf"),
            ("MOVIES_TEMPLATE_DIR", "site"),
        ]);
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.storage, StorageKind::Csv);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/shelf"));
        assert_eq!(config.template_dir, PathBuf::from("site"));
    }

    #[test]
    fn unknown_backend_and_blank_key_fall_back() {
        let config = config_from(&[("MOVIES_STORAGE", "sqlite"), ("OMDB_API_KEY", " ")]);
        assert_eq!(config.storage, StorageKind::Json);
        assert_eq!(config.api_key, None);
    }
}
