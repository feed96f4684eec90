use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;

use crate::domain::policy::{RetryPolicy, SearchSettings};
use crate::domain::ports::PageFetcher;
use crate::utils::error::{CheckError, Result};

/// HTTP GET with browser-like headers and a fixed-interval retry.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    pub fn from_settings(settings: &SearchSettings, retry: RetryPolicy) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value("search.user_agent", &settings.user_agent)?);
        headers.insert(ACCEPT, header_value("search.accept", &settings.accept)?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("search.accept_language", &settings.accept_language)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self::new(client, retry))
    }

    async fn attempt(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("GET {} -> {}", url, status);

        if !status.is_success() {
            return Err(CheckError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| CheckError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.attempt(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() => match self.retry.delay_after(attempt) {
                    Some(delay) => {
                        tracing::warn!(
                            "Attempt {}/{} failed: {}; retrying in {:?}",
                            attempt,
                            self.retry.max_attempts,
                            e,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(e),
                },
                Err(e) => return Err(e),
            }
        }
    }
}
