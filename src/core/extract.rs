use scraper::{Html, Selector};

use crate::core::links::LinkNormalizer;
use crate::domain::model::SearchCandidate;
use crate::domain::ports::ResultExtractor;
use crate::utils::error::{CheckError, Result};

/// Result-title anchors in DuckDuckGo's HTML results template.
pub const DUCKDUCKGO_RESULT_SELECTORS: &str = "a.result__a, a.result__title";

/// Extractor for DuckDuckGo's no-JavaScript results page.
pub struct DuckDuckGoExtractor {
    selector: Selector,
    normalizer: LinkNormalizer,
}

impl DuckDuckGoExtractor {
    pub fn new(normalizer: LinkNormalizer) -> Result<Self> {
        Self::with_selectors(DUCKDUCKGO_RESULT_SELECTORS, normalizer)
    }

    /// Same extraction with a different anchor selector list, for when the
    /// provider reshuffles its template.
    pub fn with_selectors(selectors: &str, normalizer: LinkNormalizer) -> Result<Self> {
        let selector = Selector::parse(selectors).map_err(|e| CheckError::InvalidConfigValueError {
            field: "search.result_selectors".to_string(),
            value: selectors.to_string(),
            reason: format!("Invalid CSS selector: {}", e),
        })?;
        Ok(Self {
            selector,
            normalizer,
        })
    }
}

impl ResultExtractor for DuckDuckGoExtractor {
    fn extract(&self, markup: &str) -> Vec<SearchCandidate> {
        let document = Html::parse_document(markup);

        document
            .select(&self.selector)
            .filter_map(|anchor| {
                let title = anchor.text().collect::<String>();
                let title = title.trim();
                let href = anchor.value().attr("href").unwrap_or("").trim();
                if title.is_empty() || href.is_empty() {
                    return None;
                }
                Some(SearchCandidate::new(title, self.normalizer.normalize(href)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> DuckDuckGoExtractor {
        DuckDuckGoExtractor::new(LinkNormalizer::new("duckduckgo.com", "uddg")).unwrap()
    }

    const RESULTS_PAGE: &str = r#"
<html><body>
  <div class="results">
    <div class="result results_links">
      <h2 class="result__title">
        <a rel="nofollow" class="result__a"
           href="//duckduckgo.com/l/?uddg=https%3A%2F%2Ftoogoodtogo.com%2Fitem%2F123&amp;rut=x">
          Fresh Mart <b>Mississauga</b> - Too Good To Go
        </a>
      </h2>
      <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Ftoogoodtogo.com">snippet</a>
    </div>
    <div class="result">
      <a class="result__a" href="https://flashfood.com/stores/fresh-mart">Fresh Mart | Flashfood</a>
    </div>
    <div class="result">
      <a class="result__a" href="">No link here</a>
      <a class="result__a" href="https://example.com/blank">   </a>
      <a class="result__a">Missing href</a>
    </div>
    <div class="result">
      <a class="result__title" href="https://foodhero.com/">FoodHero</a>
    </div>
  </div>
</body></html>
"#;

    #[test]
    fn test_extracts_in_document_order() {
        let candidates = extractor().extract(RESULTS_PAGE);

        assert_eq!(candidates.len(), 3);
        assert_eq!(
            candidates[0],
            SearchCandidate::new(
                "Fresh Mart Mississauga - Too Good To Go",
                "https://toogoodtogo.com/item/123"
            )
        );
        assert_eq!(candidates[1].url, "https://flashfood.com/stores/fresh-mart");
        assert_eq!(candidates[2].title, "FoodHero");
    }

    #[test]
    fn test_never_returns_empty_fields() {
        for candidate in extractor().extract(RESULTS_PAGE) {
            assert!(!candidate.title.is_empty());
            assert!(!candidate.url.is_empty());
        }
    }

    #[test]
    fn test_garbage_markup_yields_nothing() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("<<<>>> not html <a").is_empty());
        assert!(extractor()
            .extract("<html><body><p>No results.</p></body></html>")
            .is_empty());
    }

    #[test]
    fn test_custom_selectors() {
        let custom = DuckDuckGoExtractor::with_selectors(
            "a.result-link",
            LinkNormalizer::new("duckduckgo.com", "uddg"),
        )
        .unwrap();
        let markup = r#"<a class="result-link" href="https://foodhero.com/x">FoodHero X</a>
                        <a class="result__a" href="https://foodhero.com/y">FoodHero Y</a>"#;
        let candidates = custom.extract(markup);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "https://foodhero.com/x");
    }

    #[test]
    fn test_invalid_selector_is_a_config_error() {
        let result = DuckDuckGoExtractor::with_selectors(
            "a[[",
            LinkNormalizer::new("duckduckgo.com", "uddg"),
        );
        assert!(matches!(
            result,
            Err(CheckError::InvalidConfigValueError { .. })
        ));
    }
}
