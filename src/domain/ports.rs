use crate::domain::model::{Platform, SearchCandidate};
use crate::domain::policy::{RetryPolicy, ScoringPolicy, SearchSettings};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Fetches a page body as text. Implementations own their retry behaviour.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Turns a provider's results page into candidates, in document order.
///
/// This is the only place that knows the provider's markup; swapping
/// providers means adding another implementation.
pub trait ResultExtractor: Send + Sync {
    fn extract(&self, markup: &str) -> Vec<SearchCandidate>;
}

pub trait ConfigProvider: Send + Sync {
    fn search_settings(&self) -> SearchSettings;
    fn retry_policy(&self) -> RetryPolicy;
    fn scoring_policy(&self) -> ScoringPolicy;
    fn platforms(&self) -> Vec<Platform>;
    /// Upper bound on a whole fan-out; `None` waits for every platform.
    fn deadline(&self) -> Option<Duration>;
}
