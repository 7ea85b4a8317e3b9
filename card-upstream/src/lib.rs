use std::time::Duration;

use card_error::{CardError, Result};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

const DEFAULT_API_BASE: &str = "https://www.duolingo.com";
const DEFAULT_FLAG_BASE: &str = "https://d35aaqx5ub95lt.cloudfront.net/vendor/flags";
const PROFILE_PATH: &str = "2017-06-30/users";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Where profile JSON and binary assets are fetched from.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_base: Url,
    pub flag_base: Url,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base is valid"),
            flag_base: Url::parse(DEFAULT_FLAG_BASE).expect("default flag base is valid"),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// HTTP client for the learning platform.
///
/// Both calls are idempotent GETs; the caller may retry. The client's
/// timeout bounds every request, and dropping an in-flight future aborts
/// the underlying request.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "User-Agent",
            HeaderValue::from_static(
                "Mozilla/5.0 (X11; Linux x86_64; rv:102.0) Gecko/20100101 Firefox/102.0",
            ),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn flag_base(&self) -> &Url {
        &self.config.flag_base
    }

    /// Fetches the raw profile payload for `identifier`.
    ///
    /// The payload is returned verbatim; validating its shape is the
    /// normalizer's job. Non-success statuses map to typed failures.
    pub async fn fetch_profile(&self, identifier: &str) -> Result<Value> {
        let mut url = self.config.api_base.join(PROFILE_PATH)?;
        url.query_pairs_mut().append_pair("username", identifier);
        log::debug!("upstream: fetching profile for \"{identifier}\"");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            Err(CardError::NotFound(identifier.to_string()))
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Err(CardError::RateLimited)
        } else if !status.is_success() {
            Err(CardError::Upstream {
                status: status.as_u16(),
                message: upstream_message(response).await,
            })
        } else {
            Ok(response.json().await?)
        }
    }

    /// Fetches a binary asset, returning its bytes and the Content-Type
    /// header when the server sent one.
    pub async fn fetch_bytes(&self, url: &str) -> Result<(Vec<u8>, Option<String>)> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CardError::Upstream {
                status: status.as_u16(),
                message: None,
            });
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());
        let bytes = response.bytes().await?.to_vec();
        Ok((bytes, content_type))
    }
}

/// Pulls a human-readable message out of an upstream error body, if the
/// body is JSON carrying one.
async fn upstream_message(response: reqwest::Response) -> Option<String> {
    let body: Value = response.json().await.ok()?;
    ["error", "message"]
        .iter()
        .find_map(|f| body.get(f).and_then(Value::as_str))
        .map(str::to_string)
}
