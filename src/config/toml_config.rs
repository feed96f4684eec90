use crate::app::batch::{BatchSettings, OutputFormat};
use crate::domain::model::Platform;
use crate::domain::policy::{RetryPolicy, ScoringPolicy, SearchSettings};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{validate_positive_number, validate_provider, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// File-based configuration. Every table is optional; omitted values fall
/// back to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub check: CheckConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub platforms: Option<Vec<Platform>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    pub endpoint: Option<String>,
    pub provider_domain: Option<String>,
    pub redirect_param: Option<String>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: Option<u32>,
    pub backoff_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub max_candidates: Option<usize>,
    pub domain_weight: Option<f64>,
    pub similarity_weight: Option<f64>,
    pub sure_similarity: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Overall limit per place; 0 disables it.
    pub deadline_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    pub default_city: Option<String>,
    pub max_places: Option<usize>,
    pub pause_ms: Option<u64>,
    pub output_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CheckError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SEARCH_ENDPOINT})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CheckError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn batch_settings(&self) -> Result<BatchSettings> {
        let defaults = BatchSettings::default();
        let output_format = match &self.batch.output_format {
            Some(format) => format.parse::<OutputFormat>()?,
            None => defaults.output_format,
        };

        Ok(BatchSettings {
            default_city: self.batch.default_city.clone().unwrap_or(defaults.default_city),
            max_places: self.batch.max_places.unwrap_or(defaults.max_places),
            pause: self
                .batch
                .pause_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.pause),
            output_format,
        })
    }
}

impl ConfigProvider for TomlConfig {
    fn search_settings(&self) -> SearchSettings {
        let defaults = SearchSettings::default();
        let search = &self.search;
        SearchSettings {
            endpoint: search.endpoint.clone().unwrap_or(defaults.endpoint),
            provider_domain: search
                .provider_domain
                .clone()
                .unwrap_or(defaults.provider_domain),
            redirect_param: search
                .redirect_param
                .clone()
                .unwrap_or(defaults.redirect_param),
            user_agent: search.user_agent.clone().unwrap_or(defaults.user_agent),
            accept: defaults.accept,
            accept_language: search
                .accept_language
                .clone()
                .unwrap_or(defaults.accept_language),
            timeout: search
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.retry.max_attempts.unwrap_or(defaults.max_attempts),
            backoff: self
                .retry
                .backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.backoff),
        }
    }

    fn scoring_policy(&self) -> ScoringPolicy {
        let defaults = ScoringPolicy::default();
        ScoringPolicy {
            max_candidates: self.scoring.max_candidates.unwrap_or(defaults.max_candidates),
            domain_weight: self.scoring.domain_weight.unwrap_or(defaults.domain_weight),
            similarity_weight: self
                .scoring
                .similarity_weight
                .unwrap_or(defaults.similarity_weight),
            sure_similarity: self
                .scoring
                .sure_similarity
                .unwrap_or(defaults.sure_similarity),
        }
    }

    fn platforms(&self) -> Vec<Platform> {
        self.platforms.clone().unwrap_or_else(Platform::defaults)
    }

    fn deadline(&self) -> Option<Duration> {
        match self.check.deadline_seconds {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(20)),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        let batch = self.batch_settings()?;
        validate_positive_number("batch.max_places", batch.max_places, 1)
    }
}
