use crate::domain::model::Platform;
use crate::domain::policy::{RetryPolicy, ScoringPolicy, SearchSettings};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{validate_provider, Validate};
use std::str::FromStr;
use std::time::Duration;

/// Configuration read from environment variables, for the Lambda handler.
///
/// | variable                  | default                         |
/// |---------------------------|---------------------------------|
/// | `SEARCH_ENDPOINT`         | `https://duckduckgo.com/html/`  |
/// | `SEARCH_PROVIDER_DOMAIN`  | `duckduckgo.com`                |
/// | `REQUEST_TIMEOUT_SECONDS` | `15`                            |
/// | `RETRY_ATTEMPTS`          | `2`                             |
/// | `RETRY_BACKOFF_MS`        | `400`                           |
/// | `MAX_CANDIDATES`          | `6`                             |
/// | `SURE_SIMILARITY`         | `0.3`                           |
/// | `DEADLINE_SECONDS`        | `20` (`0` disables)             |
/// | `PLATFORMS`               | `toogoodtogo=toogoodtogo.com,…` |
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub search: SearchSettings,
    pub retry: RetryPolicy,
    pub scoring: ScoringPolicy,
    pub deadline: Option<Duration>,
    pub platforms: Vec<Platform>,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let search_defaults = SearchSettings::default();
        let retry_defaults = RetryPolicy::default();
        let scoring_defaults = ScoringPolicy::default();

        let search = SearchSettings {
            endpoint: lookup("SEARCH_ENDPOINT").unwrap_or(search_defaults.endpoint.clone()),
            provider_domain: lookup("SEARCH_PROVIDER_DOMAIN")
                .unwrap_or(search_defaults.provider_domain.clone()),
            timeout: parse_var(&lookup, "REQUEST_TIMEOUT_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or(search_defaults.timeout),
            ..search_defaults
        };

        let retry = RetryPolicy {
            max_attempts: parse_var(&lookup, "RETRY_ATTEMPTS")?
                .unwrap_or(retry_defaults.max_attempts),
            backoff: parse_var(&lookup, "RETRY_BACKOFF_MS")?
                .map(Duration::from_millis)
                .unwrap_or(retry_defaults.backoff),
        };

        let scoring = ScoringPolicy {
            max_candidates: parse_var(&lookup, "MAX_CANDIDATES")?
                .unwrap_or(scoring_defaults.max_candidates),
            sure_similarity: parse_var(&lookup, "SURE_SIMILARITY")?
                .unwrap_or(scoring_defaults.sure_similarity),
            ..scoring_defaults
        };

        let deadline = match parse_var::<u64, _>(&lookup, "DEADLINE_SECONDS")? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(20)),
        };

        let platforms = match lookup("PLATFORMS") {
            Some(list) => list
                .split(',')
                .filter(|entry| !entry.trim().is_empty())
                .map(str::parse::<Platform>)
                .collect::<Result<Vec<Platform>>>()?,
            None => Platform::defaults(),
        };

        Ok(Self {
            search,
            retry,
            scoring,
            deadline,
            platforms,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| CheckError::InvalidConfigValueError {
                field: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

impl ConfigProvider for EnvConfig {
    fn search_settings(&self) -> SearchSettings {
        self.search.clone()
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn scoring_policy(&self) -> ScoringPolicy {
        self.scoring
    }

    fn platforms(&self) -> Vec<Platform> {
        self.platforms.clone()
    }

    fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

impl Validate for EnvConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = EnvConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.search, SearchSettings::default());
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.platforms, Platform::defaults());
        assert_eq!(config.deadline, Some(Duration::from_secs(20)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = EnvConfig::from_lookup(lookup(&[
            ("SEARCH_ENDPOINT", "http://localhost:9000/html/"),
            ("RETRY_ATTEMPTS", "3"),
            ("DEADLINE_SECONDS", "0"),
            ("PLATFORMS", "flashfood=flashfood.com, foodhero=foodhero.com,"),
        ]))
        .unwrap();

        assert_eq!(config.search.endpoint, "http://localhost:9000/html/");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.deadline, None);
        assert_eq!(config.platforms.len(), 2);
        assert_eq!(config.platforms[1].key, "foodhero");
    }

    #[test]
    fn test_unparsable_number_is_rejected() {
        let err = EnvConfig::from_lookup(lookup(&[("RETRY_ATTEMPTS", "twice")])).unwrap_err();
        assert!(matches!(
            err,
            CheckError::InvalidConfigValueError { ref field, .. } if field == "RETRY_ATTEMPTS"
        ));
    }
}
