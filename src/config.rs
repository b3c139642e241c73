use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MATCH_COUNT: usize = 20;
pub const DEFAULT_DETAIL_LIMIT: usize = 5;
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOCALE: &str = "en_US";

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` puts every data command into the "configuration required" state.
    pub api_key: Option<String>,
    /// Explicit region override. When unset the saved preference applies.
    pub region: Option<String>,
    pub match_count: usize,
    pub detail_limit: usize,
    /// `None` retries 429 responses for as long as the upstream keeps sending them.
    pub max_retries: Option<u32>,
    pub requests_per_second: u32,
    pub timeout: Duration,
    pub locale: String,
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            region: None,
            match_count: DEFAULT_MATCH_COUNT,
            detail_limit: DEFAULT_DETAIL_LIMIT,
            max_retries: None,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            locale: DEFAULT_LOCALE.to_string(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Config {
            api_key: get("RIOT_API_KEY"),
            region: get("RIOT_REGION").map(|r| r.to_lowercase()),
            match_count: parse_var(&get, "RIOT_MATCH_COUNT")?.unwrap_or(defaults.match_count),
            detail_limit: parse_var(&get, "RIOT_MATCH_DETAIL_LIMIT")?
                .unwrap_or(defaults.detail_limit),
            max_retries: parse_var(&get, "RIOT_MAX_RETRIES")?,
            requests_per_second: parse_var(&get, "RIOT_REQUESTS_PER_SECOND")?
                .unwrap_or(defaults.requests_per_second),
            timeout: parse_var(&get, "RIOT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            locale: get("DDRAGON_LOCALE").unwrap_or(defaults.locale),
            data_dir: get("LEAGUE_INSIGHT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", key, raw))),
        None => Ok(None),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".league_insight")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.api_key.is_none());
        assert!(!config.has_credential());
        assert_eq!(config.region, None);
        assert_eq!(config.match_count, 20);
        assert_eq!(config.detail_limit, 5);
        assert_eq!(config.max_retries, None);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = Config::from_lookup(lookup(&[("RIOT_API_KEY", "   ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("RIOT_API_KEY", "RGAPI-test"),
            ("RIOT_REGION", "NA1"),
            ("RIOT_MATCH_COUNT", "40"),
            ("RIOT_MATCH_DETAIL_LIMIT", "8"),
            ("RIOT_MAX_RETRIES", "3"),
            ("DDRAGON_LOCALE", "fr_FR"),
            ("LEAGUE_INSIGHT_DIR", "/tmp/li"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("RGAPI-test"));
        assert_eq!(config.region.as_deref(), Some("na1"));
        assert_eq!(config.match_count, 40);
        assert_eq!(config.detail_limit, 8);
        assert_eq!(config.max_retries, Some(3));
        assert_eq!(config.locale, "fr_FR");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/li"));
    }

    #[test]
    fn test_bad_number_is_config_error() {
        let err = Config::from_lookup(lookup(&[("RIOT_MATCH_COUNT", "lots")])).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("RIOT_MATCH_COUNT")));
    }
}
