use crate::request::{ensure_scheme, PageFetcher};
use crate::waybackmachine::Snapshot;
use colored::Colorize;

/// characters kept on each side of a match
pub const CONTEXT_RADIUS: usize = 150;
/// longest context stored, in characters, before the ellipsis
pub const MAX_CONTEXT: usize = 300;
pub const ELLIPSIS: &str = "…";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    pub phrase: String,
    pub context: String,
}

/// a match on a fetched snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHit {
    pub phrase: String,
    pub context: String,
    pub quelle: String,
}

pub struct PhraseScanner {
    phrases: Vec<String>,
    archive_host: String,
    context_radius: usize,
    max_context: usize,
}

impl PhraseScanner {
    pub fn new(phrases: &[String], archive_host: &str) -> Self {
        Self {
            phrases: phrases
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            archive_host: archive_host.trim().trim_end_matches('/').to_string(),
            context_radius: CONTEXT_RADIUS,
            max_context: MAX_CONTEXT,
        }
    }

    /// https://<archive-host>/web/<timestamp>/<original>
    pub fn snapshot_url(&self, snapshot: &Snapshot) -> String {
        format!(
            "{}/web/{}/{}",
            ensure_scheme(&self.archive_host),
            snapshot.timestamp,
            snapshot.original
        )
    }

    /// first phrase (in list order) contained in the lower-cased body.
    /// the raw body is searched, markup included
    pub fn find_phrase(&self, body: &str) -> Option<PhraseMatch> {
        let lowered = body.to_lowercase();
        self.phrases.iter().find_map(|phrase| {
            let at = lowered.find(phrase.as_str())?;
            Some(PhraseMatch {
                phrase: phrase.clone(),
                context: extract_context(
                    &lowered,
                    at,
                    phrase.len(),
                    self.context_radius,
                    self.max_context,
                ),
            })
        })
    }

    /// fetches the snapshot and looks for a phrase
    /// a failed fetch is reported and treated as no match
    pub async fn scan(&self, fetcher: &dyn PageFetcher, snapshot: &Snapshot) -> Option<ScanHit> {
        let quelle = self.snapshot_url(snapshot);
        let body = match fetcher.fetch_text(&quelle).await {
            Ok(body) => body,
            Err(e) => {
                info!("skipping {} ({})", quelle, e);
                return None;
            }
        };

        let found = self.find_phrase(&body)?;
        Some(ScanHit {
            phrase: found.phrase,
            context: found.context,
            quelle,
        })
    }
}

/// `radius` characters around text[start..start + len], whitespace collapsed,
/// cut to `max` characters with a trailing ellipsis.
/// `start` and `len` are byte offsets on char boundaries
pub fn extract_context(text: &str, start: usize, len: usize, radius: usize, max: usize) -> String {
    let end = (start + len).min(text.len());
    let start = start.min(end);

    let mut before: Vec<char> = text[..start].chars().rev().take(radius).collect();
    before.reverse();
    let before: String = before.into_iter().collect();
    let after: String = text[end..].chars().take(radius).collect();

    let window = format!("{}{}{}", before, &text[start..end], after);
    let collapsed = window.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&collapsed, max)
}

pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str(ELLIPSIS);
    cut
}
