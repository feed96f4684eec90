use url::Url;

use crate::core::links::host_contains;
use crate::core::similarity::similarity;
use crate::domain::model::{
    Place, PlatformVerdict, ScoredCandidate, SearchCandidate, VerificationStatus,
};
use crate::domain::policy::ScoringPolicy;
use crate::domain::ports::{PageFetcher, ResultExtractor};
use crate::utils::error::Result;

/// Checks one place against one platform domain via a site-restricted search.
pub struct PlatformVerifier<F: PageFetcher, E: ResultExtractor> {
    fetcher: F,
    extractor: E,
    search_endpoint: String,
    scoring: ScoringPolicy,
}

impl<F: PageFetcher, E: ResultExtractor> PlatformVerifier<F, E> {
    pub fn new(
        fetcher: F,
        extractor: E,
        search_endpoint: impl Into<String>,
        scoring: ScoringPolicy,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            search_endpoint: search_endpoint.into(),
            scoring,
        }
    }

    /// Never fails: fetch and parse problems come back as an unknown verdict.
    pub async fn verify(&self, place: &Place, domain: &str) -> PlatformVerdict {
        let markup = match self.search(place, domain).await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Search for {:?} on {} failed: {}", place.name, domain, e);
                return PlatformVerdict::failed(e.to_string());
            }
        };

        let candidates: Vec<SearchCandidate> = self
            .extractor
            .extract(&markup)
            .into_iter()
            .take(self.scoring.max_candidates)
            .collect();

        let verdict = self.judge(place, domain, candidates);
        tracing::info!(
            "{} on {}: {} (confidence {:.3})",
            place.name,
            domain,
            verdict.status,
            verdict.confidence
        );
        verdict
    }

    async fn search(&self, place: &Place, domain: &str) -> Result<String> {
        let url = search_url(&self.search_endpoint, &site_query(place, domain))?;
        self.fetcher.fetch_text(url.as_str()).await
    }

    /// Scores each candidate and classifies the best one. Ties keep the
    /// earliest candidate.
    pub fn judge(
        &self,
        place: &Place,
        domain: &str,
        candidates: Vec<SearchCandidate>,
    ) -> PlatformVerdict {
        let identity = place.identity();
        let mut best: Option<ScoredCandidate> = None;

        for candidate in candidates {
            let scored = self.score(&identity, domain, candidate);
            tracing::debug!(
                "candidate {:?} ({}) similarity={:.3} domain_match={} score={:.3}",
                scored.candidate.title,
                scored.candidate.url,
                scored.similarity,
                scored.domain_match,
                scored.score
            );
            if best.as_ref().map_or(true, |b| scored.score > b.score) {
                best = Some(scored);
            }
        }

        match best {
            Some(best) => {
                let status = if self.scoring.is_sure(best.domain_match, best.similarity) {
                    VerificationStatus::Sure
                } else {
                    VerificationStatus::Unknown
                };
                PlatformVerdict {
                    status,
                    confidence: best.score,
                    sample: Some(best),
                    error: None,
                }
            }
            None => PlatformVerdict::unknown(),
        }
    }

    fn score(&self, identity: &str, domain: &str, candidate: SearchCandidate) -> ScoredCandidate {
        let similarity = similarity(identity, &candidate.title);
        let domain_match = host_contains(&candidate.url, domain);
        let score = self.scoring.score(domain_match, similarity);
        ScoredCandidate {
            candidate,
            similarity,
            domain_match,
            score,
        }
    }
}

/// `"<name> <city> site:<domain>"`, skipping empty parts.
pub fn site_query(place: &Place, domain: &str) -> String {
    let site = format!("site:{}", domain);
    [place.name.as_str(), place.city.as_str(), site.as_str()]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn search_url(endpoint: &str, query: &str) -> Result<Url> {
    Ok(Url::parse_with_params(endpoint, &[("q", query)])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::DuckDuckGoExtractor;
    use crate::core::links::LinkNormalizer;
    use crate::utils::error::CheckError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Hands out a canned page (or a canned failure) and counts calls.
    #[derive(Clone)]
    struct StubFetcher {
        page: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    impl StubFetcher {
        fn page(markup: &str) -> Self {
            Self {
                page: Some(markup.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                page: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.page.clone().ok_or_else(|| CheckError::Status {
                status: 503,
                url: url.to_string(),
            })
        }
    }

    fn verifier(fetcher: StubFetcher) -> PlatformVerifier<StubFetcher, DuckDuckGoExtractor> {
        let extractor =
            DuckDuckGoExtractor::new(LinkNormalizer::new("duckduckgo.com", "uddg")).unwrap();
        PlatformVerifier::new(
            fetcher,
            extractor,
            "https://duckduckgo.com/html/",
            ScoringPolicy::default(),
        )
    }

    fn result_link(title: &str, href: &str) -> String {
        format!(r#"<div class="result"><a class="result__a" href="{}">{}</a></div>"#, href, title)
    }

    fn fresh_mart() -> Place {
        Place::new("Fresh Mart", "Mississauga")
    }

    #[test]
    fn test_site_query() {
        assert_eq!(
            site_query(&fresh_mart(), "toogoodtogo.com"),
            "Fresh Mart Mississauga site:toogoodtogo.com"
        );
        assert_eq!(
            site_query(&Place::new("Fresh Mart", ""), "flashfood.com"),
            "Fresh Mart site:flashfood.com"
        );
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = search_url(
            "https://duckduckgo.com/html/",
            "Fresh & Co Mississauga site:toogoodtogo.com",
        )
        .unwrap();
        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(q, "Fresh & Co Mississauga site:toogoodtogo.com");
        assert!(search_url("not a url", "q").is_err());
    }

    #[tokio::test]
    async fn test_matching_title_on_platform_domain_is_sure() {
        let page = result_link(
            "Fresh Mart Mississauga - Too Good To Go",
            "https://toogoodtogo.com/item/123",
        );
        let verdict = verifier(StubFetcher::page(&page))
            .verify(&fresh_mart(), "toogoodtogo.com")
            .await;

        assert_eq!(verdict.status, VerificationStatus::Sure);
        let sample = verdict.sample.unwrap();
        assert!(sample.domain_match);
        assert!(sample.similarity >= 0.3);
        assert!((verdict.confidence - (0.5 + 0.5 * sample.similarity)).abs() < 1e-9);
        assert!(verdict.error.is_none());
    }

    #[tokio::test]
    async fn test_matching_title_on_foreign_domain_is_unknown() {
        let page = result_link(
            "Fresh Mart Mississauga - Too Good To Go",
            "https://example.com/fresh-mart",
        );
        let verdict = verifier(StubFetcher::page(&page))
            .verify(&fresh_mart(), "toogoodtogo.com")
            .await;

        assert_eq!(verdict.status, VerificationStatus::Unknown);
        let sample = verdict.sample.unwrap();
        assert!(!sample.domain_match);
        assert!(verdict.confidence <= 0.5 * sample.similarity + 1e-9);
    }

    #[tokio::test]
    async fn test_platform_domain_with_weak_title_is_unknown() {
        let page = result_link("Careers at Too Good To Go", "https://toogoodtogo.com/careers");
        let verdict = verifier(StubFetcher::page(&page))
            .verify(&fresh_mart(), "toogoodtogo.com")
            .await;

        assert_eq!(verdict.status, VerificationStatus::Unknown);
        assert_eq!(verdict.confidence, 0.5);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_unknown() {
        let fetcher = StubFetcher::failing();
        let calls = fetcher.calls.clone();
        let verdict = verifier(fetcher).verify(&fresh_mart(), "flashfood.com").await;

        assert_eq!(verdict.status, VerificationStatus::Unknown);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.sample.is_none());
        assert!(!verdict.error.unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_results_is_not_an_error() {
        let verdict = verifier(StubFetcher::page("<html><body>No results</body></html>"))
            .verify(&fresh_mart(), "foodhero.com")
            .await;

        assert_eq!(verdict, PlatformVerdict::unknown());
    }

    #[tokio::test]
    async fn test_only_first_candidates_are_scored() {
        let mut page = String::new();
        for i in 0..6 {
            page.push_str(&result_link(&format!("Unrelated {}", i), "https://example.com/"));
        }
        page.push_str(&result_link(
            "Fresh Mart Mississauga",
            "https://toogoodtogo.com/item/1",
        ));

        let verdict = verifier(StubFetcher::page(&page))
            .verify(&fresh_mart(), "toogoodtogo.com")
            .await;

        assert_eq!(verdict.status, VerificationStatus::Unknown);
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let v = verifier(StubFetcher::page(""));
        let verdict = v.judge(
            &fresh_mart(),
            "toogoodtogo.com",
            vec![
                SearchCandidate::new("Fresh Mart", "https://toogoodtogo.com/a"),
                SearchCandidate::new("Fresh Mart", "https://toogoodtogo.com/b"),
            ],
        );
        assert_eq!(
            verdict.sample.unwrap().candidate.url,
            "https://toogoodtogo.com/a"
        );
    }

    #[test]
    fn test_best_score_wins_over_order() {
        let v = verifier(StubFetcher::page(""));
        let verdict = v.judge(
            &fresh_mart(),
            "toogoodtogo.com",
            vec![
                SearchCandidate::new("Fresh Mart Mississauga", "https://example.com/a"),
                SearchCandidate::new("Fresh Mart", "https://toogoodtogo.com/b"),
            ],
        );
        assert_eq!(verdict.status, VerificationStatus::Sure);
        assert_eq!(
            verdict.sample.unwrap().candidate.url,
            "https://toogoodtogo.com/b"
        );
    }
}
