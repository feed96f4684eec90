use futures::future::join_all;
use std::time::Duration;
use tokio::time::Instant;

use crate::core::extract::DuckDuckGoExtractor;
use crate::core::fetch::HttpFetcher;
use crate::core::links::LinkNormalizer;
use crate::core::verifier::PlatformVerifier;
use crate::domain::model::{Place, Platform, PlatformVerdict, VerificationResult};
use crate::domain::ports::{ConfigProvider, PageFetcher, ResultExtractor};
use crate::utils::error::{CheckError, Result};

/// Runs the platform verifier for every configured platform at once and
/// merges the verdicts.
pub struct DealChecker<F: PageFetcher, E: ResultExtractor> {
    verifier: PlatformVerifier<F, E>,
    platforms: Vec<Platform>,
    deadline: Option<Duration>,
}

impl DealChecker<HttpFetcher, DuckDuckGoExtractor> {
    /// Wires the HTTP fetcher and DuckDuckGo extractor from a config source.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let platforms = config.platforms();
        if platforms.is_empty() {
            return Err(CheckError::MissingConfigError {
                field: "platforms".to_string(),
            });
        }

        let search = config.search_settings();
        let fetcher = HttpFetcher::from_settings(&search, config.retry_policy())?;
        let extractor = DuckDuckGoExtractor::new(LinkNormalizer::from_settings(&search))?;
        let verifier =
            PlatformVerifier::new(fetcher, extractor, search.endpoint, config.scoring_policy());

        Ok(Self::new(verifier, platforms).with_deadline(config.deadline()))
    }
}

impl<F: PageFetcher, E: ResultExtractor> DealChecker<F, E> {
    pub fn new(verifier: PlatformVerifier<F, E>, platforms: Vec<Platform>) -> Self {
        Self {
            verifier,
            platforms,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Verifies `place` on every platform within the configured deadline.
    pub async fn verify_all(&self, place: &Place) -> VerificationResult {
        self.verify_all_within(place, self.deadline).await
    }

    /// Like [`verify_all`](Self::verify_all) with an explicit deadline for the
    /// whole fan-out. Platforms still pending when it expires report
    /// `unknown` with error `"timeout"`.
    ///
    /// The result always has one entry per platform. An empty place name
    /// short-circuits to all-unknown without any network call.
    pub async fn verify_all_within(
        &self,
        place: &Place,
        deadline: Option<Duration>,
    ) -> VerificationResult {
        let place = place.trimmed();
        if place.name.is_empty() {
            tracing::info!("Empty place name, skipping verification");
            return VerificationResult::all_unknown(place, &self.platforms);
        }

        // A deadline too far out to represent is no deadline.
        let expires_at = deadline.and_then(|d| Instant::now().checked_add(d));
        let started = Instant::now();
        let target = &place;

        let checks = self.platforms.iter().map(|platform| async move {
            let check = self.verifier.verify(target, &platform.domain);
            let verdict = match expires_at {
                Some(at) => match tokio::time::timeout_at(at, check).await {
                    Ok(verdict) => verdict,
                    Err(_) => {
                        tracing::warn!("{} on {} timed out", target.name, platform.domain);
                        PlatformVerdict::timed_out()
                    }
                },
                None => check.await,
            };
            (platform.key.clone(), verdict)
        });

        let platforms = join_all(checks).await.into_iter().collect();
        let result = VerificationResult { place, platforms };

        tracing::info!(
            "Checked {:?} on {} platforms in {:?}: {} sure",
            result.place.name,
            result.platforms.len(),
            started.elapsed(),
            result.sure_count()
        );
        result
    }
}
