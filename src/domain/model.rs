use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::CheckError;

/// The place being looked up. Values are trimmed before verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub city: String,
}

impl Place {
    pub fn new(name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
        }
    }

    pub fn trimmed(&self) -> Self {
        Self::new(self.name.trim(), self.city.trim())
    }

    /// `"<name> <city>"`, the text candidate titles are compared against.
    pub fn identity(&self) -> String {
        format!("{} {}", self.name, self.city)
    }
}

/// One deal platform probed for a place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub key: String,
    pub domain: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl Platform {
    pub fn new(key: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            domain: domain.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn defaults() -> Vec<Platform> {
        vec![
            Platform::new("toogoodtogo", "toogoodtogo.com").with_label("Too Good To Go"),
            Platform::new("flashfood", "flashfood.com").with_label("Flashfood"),
            Platform::new("foodhero", "foodhero.com").with_label("FoodHero"),
        ]
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    /// Where a user should go for this platform: the verified listing when the
    /// verdict is sure, otherwise a plain web search for the place on it.
    pub fn deep_link(&self, place: &Place, verdict: &PlatformVerdict) -> String {
        if let Some(url) = verdict.sure_url() {
            return url.to_string();
        }

        let query = format!("{} {} {}", self.display_name(), place.name, place.city);
        let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
        url::Url::parse_with_params("https://www.google.com/search", &[("q", query.as_str())])
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("https://www.google.com/search?q={}", query))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.domain)
    }
}

impl FromStr for Platform {
    type Err = CheckError;

    /// Parses `key=domain`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CheckError::InvalidConfigValueError {
            field: "platform".to_string(),
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (key, domain) = s.split_once('=').ok_or_else(|| invalid("expected key=domain"))?;
        let (key, domain) = (key.trim(), domain.trim());
        if key.is_empty() || domain.is_empty() {
            return Err(invalid("key and domain must both be non-empty"));
        }

        let known = Platform::defaults().into_iter().find(|p| p.key == key);
        let mut platform = Platform::new(key, domain);
        platform.label = known.and_then(|p| p.label);
        Ok(platform)
    }
}

/// One scraped search result. `url` is already redirect-unwrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub title: String,
    pub url: String,
}

impl SearchCandidate {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: SearchCandidate,
    pub similarity: f64,
    pub domain_match: bool,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Sure,
    Unknown,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Sure => f.write_str("sure"),
            VerificationStatus::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformVerdict {
    pub status: VerificationStatus,
    pub confidence: f64,
    pub sample: Option<ScoredCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlatformVerdict {
    pub fn unknown() -> Self {
        Self {
            status: VerificationStatus::Unknown,
            confidence: 0.0,
            sample: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::unknown()
        }
    }

    pub fn timed_out() -> Self {
        Self::failed("timeout")
    }

    pub fn is_sure(&self) -> bool {
        self.status == VerificationStatus::Sure
    }

    pub fn sure_url(&self) -> Option<&str> {
        if !self.is_sure() {
            return None;
        }
        self.sample.as_ref().map(|s| s.candidate.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub place: Place,
    pub platforms: BTreeMap<String, PlatformVerdict>,
}

impl VerificationResult {
    /// Every platform reported as unknown, with no network work done.
    pub fn all_unknown(place: Place, platforms: &[Platform]) -> Self {
        let platforms = platforms
            .iter()
            .map(|p| (p.key.clone(), PlatformVerdict::unknown()))
            .collect();
        Self { place, platforms }
    }

    pub fn sure_count(&self) -> usize {
        self.platforms.values().filter(|v| v.is_sure()).count()
    }
}
