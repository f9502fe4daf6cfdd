use crate::error::FetchError;
use crate::user_agents::get_user_agent;
use async_trait::async_trait;
use colored::Colorize;
use reqwest::{header, Proxy, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

/// waits never grow past 2^5 = 32s
const MAX_BACKOFF_SHIFT: u32 = 5;

/// anything that can turn a url into a response body
/// the http client implements it, tests swap in a canned one
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    retries: u32,
}

impl HttpFetcher {
    /// builds the shared client
    /// every request is bounded by `timeout`, throttled responses (429/503)
    /// are retried `retries` times with 1s, 2s, 4s... (at most 32s) in between
    pub fn new(
        timeout: Duration,
        retries: u32,
        proxy: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(timeout);

        if let Some(pxy) = proxy.and_then(setup_proxy) {
            builder = builder.proxy(Proxy::all(pxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            retries,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            let response = self
                .client
                .get(url)
                .header(header::USER_AGENT, get_user_agent())
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return Ok(response.text().await?);
            }

            let throttled =
                status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE;
            if throttled && attempt < self.retries {
                let wait = backoff(attempt);
                warn!("{} answered {}, retrying in {}s", url, status.as_u16(), wait.as_secs());
                sleep(wait).await;
                attempt += 1;
                continue;
            }

            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
    }
}

/// pause before retry number `attempt + 1`
pub fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(MAX_BACKOFF_SHIFT))
}

/// adds https:// when the url has no scheme
pub fn ensure_scheme(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") {
        return url.to_string();
    }
    format!("https://{}", url)
}

/// joins a base and path eg www.domain.com/ + /api/v1  -> https://www.domain.com/api/v1
/// never produces a double slash at the seam
pub fn urljoin(url: &str, path: &str) -> String {
    let url = ensure_scheme(url);

    if path.is_empty() {
        return url;
    }

    match (url.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", url, &path[1..]),
        (false, false) => format!("{}/{}", url, path),
        _ => format!("{}{}", url, path),
    }
}

/// you can pass in a proxy with or without a scheme
/// http:// is assumed when none is given
/// # example
/// ```rust
/// let x = setup_proxy("127.0.0.1:8095".to_string());
/// assert_eq!(x, Some("http://127.0.0.1:8095".to_string()));
/// ```
pub fn setup_proxy(proxy: String) -> Option<String> {
    let proxy = proxy.trim().to_string();
    if proxy.is_empty() {
        return None;
    }

    let protocols = ["http://", "https://", "socks4://", "socks5://"];
    if protocols.iter().any(|p| proxy.starts_with(p)) {
        return Some(proxy);
    }
    Some(format!("http://{proxy}"))
}
