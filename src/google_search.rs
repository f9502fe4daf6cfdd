use crate::error::FetchError;
use crate::request::{ensure_scheme, PageFetcher};
use crate::waybackmachine::{ArchiveProvider, Snapshot};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;

pub const SEARCH_URL: &str = "https://www.google.com/search";

/// wayback resolves /web/2/<url> to the newest capture. a fixed value keeps
/// the snapshot url of a search hit the same from one run to the next
pub const LATEST_TIMESTAMP: &str = "2";

/// last resort when the archive indexes won't talk to us:
/// ask a search engine for `site:<domain> <keyword>` and let the archive
/// redirect each hit to its most recent capture
pub struct SearchProvider {
    keywords: Vec<String>,
    delay: Duration,
}

impl SearchProvider {
    pub fn new(keywords: Vec<String>, delay: Duration) -> Self {
        Self { keywords, delay }
    }

    pub fn query_url(domain: &str, keyword: &str) -> String {
        let term = format!("site:{} {}", domain, keyword);
        format!(
            "{}?q={}&num=20&hl=de",
            SEARCH_URL,
            urlencoding::encode(term.trim())
        )
    }
}

/// result links are either plain or wrapped as /url?q=<target>&sa=...
fn unwrap_result_link(href: &str) -> Option<String> {
    if let Some(rest) = href.strip_prefix("/url?") {
        let target = rest
            .split('&')
            .find_map(|pair| pair.strip_prefix("q=").or_else(|| pair.strip_prefix("url=")))?;
        return urlencoding::decode(target).ok().map(|t| t.into_owned());
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    None
}

fn on_domain(url: &str, domain: &str) -> bool {
    match reqwest::Url::parse(&ensure_scheme(url)) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => {
                let host = host.to_lowercase();
                host == domain || host.ends_with(&format!(".{}", domain))
            }
            None => false,
        },
        Err(_) => false,
    }
}

/// every link of a result page that points into `domain`, in page order
pub fn extract_result_links(html: &str, domain: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let link_selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    document
        .select(&link_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(unwrap_result_link)
        .filter(|link| on_domain(link, domain))
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

#[async_trait]
impl ArchiveProvider for SearchProvider {
    fn name(&self) -> &str {
        "search"
    }

    async fn lookup(
        &self,
        fetcher: &dyn PageFetcher,
        domain: &str,
    ) -> Result<Vec<Snapshot>, FetchError> {
        let mut found = Vec::new();
        let mut failures = 0;
        let mut last_error = None;

        for (i, keyword) in self.keywords.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                sleep(self.delay).await;
            }

            match fetcher.fetch_text(&Self::query_url(domain, keyword)).await {
                Ok(html) => found.extend(
                    extract_result_links(&html, domain)
                        .into_iter()
                        .map(|link| Snapshot::new(link, LATEST_TIMESTAMP)),
                ),
                Err(e) => {
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if failures == self.keywords.len() => Err(e),
            _ => Ok(found),
        }
    }
}
