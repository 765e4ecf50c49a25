//! HTTP client for the egov processing-times REST API.
//!
//! Wraps `reqwest` with the header set the upstream expects from a browser
//! session and typed response deserialization. The processing-time endpoint
//! is surfaced as raw JSON so the collector can archive payloads verbatim.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};

use crate::error::EgovError;
use crate::types::{FormOfficesResponse, Office};

/// The upstream rejects requests that do not look like same-origin browser
/// traffic from the processing-times page, so the referer and `sec-fetch-*`
/// headers are mandatory.
const REFERER_URL: &str = "https://egov.uscis.gov/processing-times/";

/// Client for the egov processing-times REST API.
///
/// The base URL comes from configuration, which is also how tests point it
/// at a wiremock server. There is no retry layer: upstream failures
/// propagate immediately and the caller decides whether to abort.
pub struct EgovClient {
    client: Client,
    base_url: Url,
}

impl EgovClient {
    /// Creates a new client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`EgovError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`EgovError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, EgovError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(default_headers())
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // appended path segments extend the path rather than replacing the
        // last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| EgovError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches the published form descriptors from `GET /api/forms`.
    ///
    /// Returned as raw JSON: the operational catalog is configured locally,
    /// so this payload is only surfaced for inspection.
    ///
    /// # Errors
    ///
    /// - [`EgovError::UnexpectedStatus`] on a non-2xx response.
    /// - [`EgovError::Http`] on network failure.
    /// - [`EgovError::Deserialize`] if the body is not valid JSON.
    pub async fn get_forms(&self) -> Result<serde_json::Value, EgovError> {
        let url = self.api_url(&["forms"])?;
        self.request_json(&url).await
    }

    /// Lists the offices currently serving a form, in response order.
    ///
    /// # Errors
    ///
    /// - [`EgovError::UnexpectedStatus`] on a non-2xx response.
    /// - [`EgovError::Http`] on network failure.
    /// - [`EgovError::Deserialize`] if the body is not valid JSON or lacks
    ///   the `data.form_offices.offices` structure.
    pub async fn list_offices(&self, form_code: &str) -> Result<Vec<Office>, EgovError> {
        let url = self.api_url(&["formoffices", form_code])?;
        let body = self.request_json(&url).await?;

        let envelope: FormOfficesResponse =
            serde_json::from_value(body).map_err(|e| EgovError::Deserialize {
                context: format!("formoffices({form_code})"),
                source: e,
            })?;

        Ok(envelope.data.form_offices.offices)
    }

    /// Fetches the current processing-time payload for one (form, office)
    /// pair, as raw JSON suitable for verbatim archiving.
    ///
    /// # Errors
    ///
    /// - [`EgovError::UnexpectedStatus`] on a non-2xx response.
    /// - [`EgovError::Http`] on network failure.
    /// - [`EgovError::Deserialize`] if the body is not valid JSON.
    pub async fn get_processing_time(
        &self,
        form_code: &str,
        office_code: &str,
    ) -> Result<serde_json::Value, EgovError> {
        let url = self.api_url(&["processingtime", form_code, office_code])?;
        self.request_json(&url).await
    }

    /// Builds `{base}/api/{segments...}` with percent-encoded path segments.
    fn api_url(&self, segments: &[&str]) -> Result<Url, EgovError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                EgovError::InvalidBaseUrl {
                    base_url: self.base_url.to_string(),
                    reason: "URL cannot be a base".to_string(),
                }
            })?;
            path.pop_if_empty();
            path.push("api");
            path.extend(segments);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the
    /// response body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, EgovError> {
        tracing::debug!(url = %url, "requesting");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EgovError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| EgovError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        reqwest::header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache"),
    );
    headers.insert(
        reqwest::header::PRAGMA,
        HeaderValue::from_static("no-cache"),
    );
    headers.insert(
        reqwest::header::REFERER,
        HeaderValue::from_static(REFERER_URL),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    headers
}
