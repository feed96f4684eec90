use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://duckduckgo.com/html/";
pub const DEFAULT_PROVIDER_DOMAIN: &str = "duckduckgo.com";
pub const DEFAULT_REDIRECT_PARAM: &str = "uddg";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124 Safari/537.36";
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Where and how the search provider is queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub endpoint: String,
    pub provider_domain: String,
    pub redirect_param: String,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            provider_domain: DEFAULT_PROVIDER_DOMAIN.to_string(),
            redirect_param: DEFAULT_REDIRECT_PARAM.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Fixed-interval retry: no exponential growth, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Pause between two consecutive attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(400),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed `attempt` (1-based), or `None` once the
    /// attempts are used up.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            None
        } else {
            Some(self.backoff)
        }
    }
}

/// Weights and thresholds used to rank candidates and pick a tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Only the first N extracted candidates are scored.
    pub max_candidates: usize,
    pub domain_weight: f64,
    pub similarity_weight: f64,
    /// Minimum title similarity for a domain-matching candidate to be "sure".
    pub sure_similarity: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            max_candidates: 6,
            domain_weight: 0.5,
            similarity_weight: 0.5,
            sure_similarity: 0.3,
        }
    }
}

impl ScoringPolicy {
    pub fn score(&self, domain_match: bool, similarity: f64) -> f64 {
        let domain = if domain_match { self.domain_weight } else { 0.0 };
        domain + similarity * self.similarity_weight
    }

    pub fn is_sure(&self, domain_match: bool, similarity: f64) -> bool {
        domain_match && similarity >= self.sure_similarity
    }
}
