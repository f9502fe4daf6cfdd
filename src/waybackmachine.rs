use crate::config::{ProviderKind, Settings};
use crate::error::FetchError;
use crate::google_search::SearchProvider;
use crate::request::{ensure_scheme, urljoin, PageFetcher};
use async_trait::async_trait;
use colored::Colorize;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::time::sleep;

pub const AVAILABILITY_API: &str = "https://archive.org/wayback/available";

/// an archived page: the url as it was crawled plus the capture timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub original: String,
    pub timestamp: String,
}

impl Snapshot {
    pub fn new(original: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// one way of asking which archived pages exist for a domain
#[async_trait]
pub trait ArchiveProvider: Send + Sync {
    fn name(&self) -> &str;

    /// candidates for `domain`, unfiltered
    async fn lookup(
        &self,
        fetcher: &dyn PageFetcher,
        domain: &str,
    ) -> Result<Vec<Snapshot>, FetchError>;
}

/// asks the providers in order, the first one with relevant candidates wins
/// a failing provider counts as one that found nothing
pub struct ArchiveLookup {
    providers: Vec<Box<dyn ArchiveProvider>>,
    keywords: Vec<String>,
    limit: usize,
}

impl ArchiveLookup {
    pub fn new(providers: Vec<Box<dyn ArchiveProvider>>, keywords: Vec<String>, limit: usize) -> Self {
        Self {
            providers,
            keywords,
            limit,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let keywords = settings.vocabulary.keywords.clone();
        let providers = settings
            .providers
            .iter()
            .map(|kind| -> Box<dyn ArchiveProvider> {
                match kind {
                    ProviderKind::Cdx => Box::new(CdxProvider::new(&settings.cdx_base)),
                    ProviderKind::Memento => Box::new(MementoProvider::new(&settings.archive_host)),
                    ProviderKind::Availability => {
                        Box::new(AvailabilityProvider::new(keywords.clone(), settings.delay))
                    }
                    ProviderKind::Search => {
                        Box::new(SearchProvider::new(keywords.clone(), settings.delay))
                    }
                }
            })
            .collect();

        Self::new(providers, keywords, settings.max_candidates)
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// candidates for which `is_known` holds are dropped before the cap, so pages
    /// scanned on earlier runs don't crowd out new ones.
    /// a provider with relevant candidates still wins when all of them are known
    pub async fn lookup<F>(
        &self,
        fetcher: &dyn PageFetcher,
        domain: &str,
        is_known: F,
    ) -> Vec<Snapshot>
    where
        F: Fn(&Snapshot) -> bool,
    {
        for provider in &self.providers {
            match provider.lookup(fetcher, domain).await {
                Ok(found) => {
                    let total = found.len();
                    let relevant = self.relevant(found);
                    if relevant.is_empty() {
                        info!("{}: nothing relevant for {}", provider.name(), domain);
                        continue;
                    }

                    let seen_before = relevant.iter().filter(|s| is_known(*s)).count();
                    let picked: Vec<Snapshot> = relevant
                        .into_iter()
                        .filter(|s| !is_known(s))
                        .take(self.limit)
                        .collect();
                    info!(
                        "{}: {} of {} archived urls for {} look relevant, {} already scanned",
                        provider.name(),
                        picked.len(),
                        total,
                        domain,
                        seen_before
                    );
                    return picked;
                }
                Err(e) => info!("{}: lookup for {} failed ({})", provider.name(), domain, e),
            }
        }
        Vec::new()
    }

    /// keyword filter and dedup by original url, uncapped
    fn relevant(&self, found: Vec<Snapshot>) -> Vec<Snapshot> {
        let mut seen: HashSet<String> = HashSet::new();
        found
            .into_iter()
            .filter(|s| is_relevant(&s.original, &self.keywords))
            .filter(|s| seen.insert(s.original.clone()))
            .collect()
    }
}

/// true when the url path mentions one of the keywords
/// no keywords means everything is relevant
pub fn is_relevant(url: &str, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let path = match reqwest::Url::parse(&ensure_scheme(url)) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => url.to_lowercase(),
    };
    let path = urlencoding::decode(&path)
        .map(|p| p.into_owned())
        .unwrap_or(path);
    keywords.iter().any(|k| path.contains(k.as_str()))
}

fn is_timestamp(ts: &str) -> bool {
    (4..=14).contains(&ts.len()) && ts.bytes().all(|b| b.is_ascii_digit())
}

/// parses the `output=json` row format shared by the cdx and timemap apis:
/// a header row naming the fields, then one row per capture
pub fn parse_capture_rows(provider: &str, body: &str) -> Result<Vec<Snapshot>, FetchError> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<Vec<String>> =
        serde_json::from_str(body).map_err(|e| FetchError::parse(provider, e))?;

    let mut rows = rows.into_iter();
    let header = match rows.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };

    let column = |field: &str| header.iter().position(|h| h == field);
    let (original_at, timestamp_at) = match (column("original"), column("timestamp")) {
        (Some(o), Some(t)) => (o, t),
        _ => return Err(FetchError::parse(provider, "header row without original/timestamp")),
    };

    Ok(rows
        .filter_map(|row| {
            let original = row.get(original_at)?;
            let timestamp = row.get(timestamp_at)?;
            if original.is_empty() || !is_timestamp(timestamp) {
                return None;
            }
            Some(Snapshot::new(original.as_str(), timestamp.as_str()))
        })
        .collect())
}

/// the wayback cdx server, or anything speaking its protocol (mirrors, proxies)
pub struct CdxProvider {
    base: String,
}

impl CdxProvider {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn query_url(&self, domain: &str) -> String {
        format!(
            "{}?url={}/*&output=json&fl=original,timestamp&filter=statuscode:200&collapse=urlkey&limit=1000",
            urljoin(&self.base, "/cdx/search/cdx"),
            domain
        )
    }
}

#[async_trait]
impl ArchiveProvider for CdxProvider {
    fn name(&self) -> &str {
        "cdx"
    }

    async fn lookup(
        &self,
        fetcher: &dyn PageFetcher,
        domain: &str,
    ) -> Result<Vec<Snapshot>, FetchError> {
        let body = fetcher.fetch_text(&self.query_url(domain)).await?;
        parse_capture_rows(self.name(), &body)
    }
}

/// the memento timemap endpoint, same data behind a different front door
pub struct MementoProvider {
    base: String,
}

impl MementoProvider {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn query_url(&self, domain: &str) -> String {
        format!(
            "{}?url={}/&matchType=prefix&collapse=urlkey&output=json&fl=original,timestamp&filter=statuscode:200&limit=1000",
            urljoin(&self.base, "/web/timemap/json"),
            domain
        )
    }
}

#[async_trait]
impl ArchiveProvider for MementoProvider {
    fn name(&self) -> &str {
        "memento"
    }

    async fn lookup(
        &self,
        fetcher: &dyn PageFetcher,
        domain: &str,
    ) -> Result<Vec<Snapshot>, FetchError> {
        let body = fetcher.fetch_text(&self.query_url(domain)).await?;
        parse_capture_rows(self.name(), &body)
    }
}

#[derive(Deserialize, Debug)]
struct ApiResponse {
    #[serde(default)]
    archived_snapshots: ArchivedSnapshots,
}

#[derive(Deserialize, Debug, Default)]
struct ArchivedSnapshots {
    closest: Option<Closest>,
}

#[derive(Deserialize, Debug)]
struct Closest {
    #[serde(default)]
    available: bool,
    url: String,
    timestamp: String,
}

fn snapshot_url_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://[^/]+/web/(\d{4,14})[a-z_]*/(.+)$").ok())
        .as_ref()
}

/// splits http://web.archive.org/web/<ts>/<original> back into its parts
pub fn split_snapshot_url(url: &str) -> Option<Snapshot> {
    let caps = snapshot_url_regex()?.captures(url)?;
    Some(Snapshot::new(caps.get(2)?.as_str(), caps.get(1)?.as_str()))
}

/// the availability api only knows the closest capture of one url,
/// so it is asked once per keyword path (domain/familienrecht, ...)
pub struct AvailabilityProvider {
    keywords: Vec<String>,
    delay: Duration,
}

impl AvailabilityProvider {
    pub fn new(keywords: Vec<String>, delay: Duration) -> Self {
        Self { keywords, delay }
    }

    pub fn query_url(domain: &str, keyword: &str) -> String {
        format!(
            "{}?url={}",
            AVAILABILITY_API,
            urlencoding::encode(&format!("{}/{}", domain, keyword))
        )
    }
}

#[async_trait]
impl ArchiveProvider for AvailabilityProvider {
    fn name(&self) -> &str {
        "availability"
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

            let body = match fetcher.fetch_text(&Self::query_url(domain, keyword)).await {
                Ok(body) => body,
                Err(e) => {
                    failures += 1;
                    last_error = Some(e);
                    continue;
                }
            };

            let response: ApiResponse = match serde_json::from_str(&body) {
                Ok(response) => response,
                Err(e) => {
                    failures += 1;
                    last_error = Some(FetchError::parse(self.name(), e));
                    continue;
                }
            };

            let closest = match response.archived_snapshots.closest {
                Some(closest) if closest.available && is_timestamp(&closest.timestamp) => closest,
                _ => continue,
            };

            let original = split_snapshot_url(&closest.url)
                .map(|s| s.original)
                .unwrap_or_else(|| format!("https://{}/{}", domain, keyword));
            found.push(Snapshot::new(original, closest.timestamp));
        }

        // every single request failing is a failed lookup, not an empty one
        match last_error {
            Some(e) if failures == self.keywords.len() => Err(e),
            _ => Ok(found),
        }
    }
}
