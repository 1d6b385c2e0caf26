// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};
use url::Url;

pub mod index;
pub mod pdf;
pub mod profile;

pub const DEFAULT_BASE_URL: &str = "https://www.europarl.europa.eu";

/// How often and how patiently a GET is retried.
#[derive(Debug, Clone, Copy)]
pub struct Retry {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl Default for Retry {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 500,
        }
    }
}

async fn get_text_core(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))
}

/// GET `url` as text, backing off exponentially between failed attempts.
pub async fn get_text_with_retry(client: &Client, url: &Url, retry: Retry) -> Result<String> {
    let mut attempts = 0;
    loop {
        match get_text_core(client, url).await {
            Ok(t) => return Ok(t),
            Err(e) if attempts < retry.max_retries => {
                attempts += 1;
                let backoff = retry.initial_backoff_ms * 2u64.pow(attempts - 1);
                warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                sleep(Duration::from_millis(backoff)).await;
            }
            Err(e) => {
                error!(%url, error = %e, "Exhausted retries");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn retries_until_success() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/flaky", server.uri()))?;
        let retry = Retry {
            max_retries: 3,
            initial_backoff_ms: 1,
        };
        let body = get_text_with_retry(&Client::new(), &url, retry).await?;
        assert_eq!(body, "ok");
        Ok(())
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/down", server.uri()))?;
        let retry = Retry {
            max_retries: 2,
            initial_backoff_ms: 1,
        };
        assert!(get_text_with_retry(&Client::new(), &url, retry)
            .await
            .is_err());
        Ok(())
    }
}
