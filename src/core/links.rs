use url::Url;

use crate::domain::policy::SearchSettings;

/// Unwraps the search provider's click-tracking links to their destination.
#[derive(Debug, Clone)]
pub struct LinkNormalizer {
    base: Option<Url>,
    provider_domain: String,
    redirect_param: String,
}

impl LinkNormalizer {
    pub fn new(provider_domain: impl Into<String>, redirect_param: impl Into<String>) -> Self {
        let provider_domain = provider_domain.into();
        let base = Url::parse(&format!("https://{}/", provider_domain)).ok();
        Self {
            base,
            provider_domain,
            redirect_param: redirect_param.into(),
        }
    }

    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self::new(&settings.provider_domain, &settings.redirect_param)
    }

    /// Returns the decoded redirect target when `href` is a provider redirect
    /// link, and `href` unchanged in every other case (including unparsable
    /// input).
    pub fn normalize(&self, href: &str) -> String {
        self.redirect_target(href)
            .unwrap_or_else(|| href.to_string())
    }

    fn redirect_target(&self, href: &str) -> Option<String> {
        let parsed = match &self.base {
            Some(base) => base.join(href).ok()?,
            None => Url::parse(href).ok()?,
        };

        let host = parsed.host_str()?;
        if !is_same_or_subdomain(host, &self.provider_domain) {
            return None;
        }

        parsed
            .query_pairs()
            .find(|(key, _)| key == self.redirect_param.as_str())
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }
}

fn is_same_or_subdomain(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Whether `url` points somewhere on `domain`.
///
/// Parsable URLs are judged by their host alone; anything that fails to
/// parse falls back to a plain substring test on the raw text.
pub fn host_contains(url: &str, domain: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.contains(domain))
            .unwrap_or(false),
        Err(_) => url.contains(domain),
    }
}
