use crate::domain::model::Platform;
use crate::domain::policy::{
    RetryPolicy, ScoringPolicy, SearchSettings, DEFAULT_PROVIDER_DOMAIN,
    DEFAULT_SEARCH_ENDPOINT,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_provider, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "deal-check")]
#[command(about = "Check whether a place is listed on food deal platforms")]
pub struct CliConfig {
    /// Name of the place, e.g. "Fresh Mart"
    #[arg(long, default_value = "")]
    pub name: String,

    /// City the place is in
    #[arg(long, default_value = "")]
    pub city: String,

    #[arg(long, default_value = DEFAULT_SEARCH_ENDPOINT)]
    pub search_endpoint: String,

    #[arg(long, default_value = DEFAULT_PROVIDER_DOMAIN)]
    pub provider_domain: String,

    #[arg(long, default_value = "15")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "2")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "400")]
    pub retry_backoff_ms: u64,

    #[arg(long, default_value = "6")]
    pub max_candidates: usize,

    #[arg(long, default_value = "0.3")]
    pub sure_similarity: f64,

    /// Overall time limit for one check; 0 disables it
    #[arg(long, default_value = "20")]
    pub deadline_seconds: u64,

    /// Platform to probe as key=domain (repeatable)
    #[arg(long = "platform", default_values_t = Platform::defaults())]
    pub platforms: Vec<Platform>,

    #[arg(long, help = "Pretty-print the JSON result")]
    pub pretty: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            endpoint: self.search_endpoint.clone(),
            provider_domain: self.provider_domain.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
            ..SearchSettings::default()
        }
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }

    fn scoring_policy(&self) -> ScoringPolicy {
        ScoringPolicy {
            max_candidates: self.max_candidates,
            sure_similarity: self.sure_similarity,
            ..ScoringPolicy::default()
        }
    }

    fn platforms(&self) -> Vec<Platform> {
        self.platforms.clone()
    }

    fn deadline(&self) -> Option<Duration> {
        (self.deadline_seconds > 0).then(|| Duration::from_secs(self.deadline_seconds))
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
