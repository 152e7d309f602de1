use std::time::Duration;

use reqwest::Client;

use crate::csv_export::{decode_body, parse_csv};
use crate::error::LoaderError;
use crate::retry::retry_with_backoff;
use crate::types::RawRow;

/// HTTP client for published CSV exports.
///
/// Handles rate limiting (429), not-found (404), other non-2xx responses and
/// HTML pages served in place of CSV as typed errors. Transient errors are
/// retried with exponential backoff up to `max_retries` additional attempts.
#[derive(Debug, Clone)]
pub struct CsvExportClient {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl CsvExportClient {
    /// Creates a client with the given timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, LoaderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Downloads `url` and returns the decoded body.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::RateLimited`]: HTTP 429 after all retries.
    /// - [`LoaderError::NotFound`]: HTTP 404 (not retried).
    /// - [`LoaderError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`LoaderError::UnexpectedContent`]: the server answered with an HTML
    ///   page, which is what unpublished spreadsheets return.
    /// - [`LoaderError::Http`]: network or TLS failure after all retries.
    pub async fn fetch_text(&self, url: &str) -> Result<String, LoaderError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(LoaderError::RateLimited {
                    url: url.to_owned(),
                    retry_after_secs,
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(LoaderError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(LoaderError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_owned();
            if content_type.starts_with("text/html") {
                return Err(LoaderError::UnexpectedContent {
                    url: url.to_owned(),
                    content_type,
                });
            }

            let bytes = response.bytes().await?;
            Ok(decode_body(&bytes))
        })
        .await
    }

    /// Downloads and parses a CSV export into raw rows.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::fetch_text`] errors, plus [`LoaderError::Csv`] and
    /// [`LoaderError::MissingColumn`] from parsing.
    pub async fn fetch_rows(&self, url: &str) -> Result<Vec<RawRow>, LoaderError> {
        let body = self.fetch_text(url).await?;
        let rows = parse_csv(&body, url)?;
        tracing::debug!(url, rows = rows.len(), "parsed CSV export");
        Ok(rows)
    }
}
