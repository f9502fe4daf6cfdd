use crate::cli::Cli;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// checked in order, the first one found in a page wins
pub const DEFAULT_PHRASES: &[&str] = &[
    "wechselmodell verhindern",
    "umgang verweigern",
    "umgang verhindern",
    "umgangsboykott",
    "residenzmodell durchsetzen",
    "alleiniges sorgerecht durchsetzen",
    "kontakt zum vater unterbinden",
    "kontakt zur mutter unterbinden",
];

/// a candidate url is only scanned when its path contains one of these
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "familienrecht",
    "umgang",
    "sorgerecht",
    "wechselmodell",
    "residenzmodell",
    "kindschaft",
    "scheidung",
];

/// upper bound for --retries, the same limit clap enforces
pub const MAX_RETRIES: u32 = 10;

/// the matching vocabulary, kept out of the control flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default)]
    pub phrases: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_PHRASES.iter().map(|p| p.to_string()).collect(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl Vocabulary {
    /// reads a vocabulary file, an empty list in the file keeps the built-in one
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Vocabulary(format!("cannot read {}: {}", path, e)))?;
        let parsed: Vocabulary = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Vocabulary(format!("cannot parse {}: {}", path, e)))?;

        let defaults = Vocabulary::default();
        Vocabulary {
            phrases: if parsed.phrases.is_empty() { defaults.phrases } else { parsed.phrases },
            keywords: if parsed.keywords.is_empty() { defaults.keywords } else { parsed.keywords },
        }
        .normalized()
    }

    /// lower-cases, trims and drops blank entries
    /// order is kept since the phrase order decides which one wins
    pub fn normalized(self) -> Result<Self, ConfigError> {
        let clean = |list: Vec<String>| -> Vec<String> {
            let mut out: Vec<String> = Vec::with_capacity(list.len());
            for item in list {
                let item = item.trim().to_lowercase();
                if !item.is_empty() && !out.contains(&item) {
                    out.push(item);
                }
            }
            out
        };

        let vocabulary = Vocabulary {
            phrases: clean(self.phrases),
            keywords: clean(self.keywords),
        };

        if vocabulary.phrases.is_empty() {
            return Err(ConfigError::Vocabulary("no phrases to look for".to_string()));
        }
        Ok(vocabulary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Cdx,
    Memento,
    Availability,
    Search,
}

impl ProviderKind {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_lowercase().as_str() {
            "cdx" => Ok(ProviderKind::Cdx),
            "memento" | "timemap" => Ok(ProviderKind::Memento),
            "availability" | "available" => Ok(ProviderKind::Availability),
            "search" | "google" => Ok(ProviderKind::Search),
            other => Err(ConfigError::Provider(format!("unknown provider `{}`", other))),
        }
    }
}

/// everything a run needs, resolved from the command line
#[derive(Debug, Clone)]
pub struct Settings {
    pub findings_path: PathBuf,
    pub report_path: PathBuf,
    pub findings_href: String,
    pub title: String,
    pub vocabulary: Vocabulary,
    pub archive_host: String,
    pub cdx_base: String,
    pub providers: Vec<ProviderKind>,
    pub max_candidates: usize,
    pub timeout: Duration,
    pub delay: Duration,
    pub retries: u32,
    pub proxy: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            findings_path: PathBuf::from("data/findings.json"),
            report_path: PathBuf::from("docs/index.html"),
            findings_href: "../data/findings.json".to_string(),
            title: "Anwalt-Monitor".to_string(),
            vocabulary: Vocabulary::default(),
            archive_host: "web.archive.org".to_string(),
            cdx_base: "https://web.archive.org".to_string(),
            providers: vec![
                ProviderKind::Cdx,
                ProviderKind::Memento,
                ProviderKind::Availability,
                ProviderKind::Search,
            ],
            max_candidates: 40,
            timeout: Duration::from_secs(30),
            delay: Duration::from_millis(1500),
            retries: 2,
            proxy: None,
        }
    }
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let vocabulary = match &cli.vocabulary {
            Some(path) => Vocabulary::from_file(path)?,
            None => Vocabulary::default(),
        };

        let mut providers = Vec::new();
        for name in cli.providers.iter().filter(|n| !n.trim().is_empty()) {
            let kind = ProviderKind::parse(name)?;
            if !providers.contains(&kind) {
                providers.push(kind);
            }
        }
        if providers.is_empty() {
            return Err(ConfigError::Provider("none selected".to_string()));
        }

        Ok(Self {
            findings_path: PathBuf::from(&cli.findings),
            report_path: PathBuf::from(&cli.report),
            findings_href: cli.findings_href.clone(),
            title: cli.title.clone(),
            vocabulary,
            archive_host: cli.archive_host.trim().trim_end_matches('/').to_string(),
            cdx_base: cli.cdx_base.trim().trim_end_matches('/').to_string(),
            providers,
            max_candidates: cli.max_candidates as usize,
            timeout: Duration::from_secs(cli.timeout_secs.max(1)),
            delay: Duration::from_millis(cli.delay_ms),
            retries: cli.retries.min(MAX_RETRIES),
            proxy: cli.proxy.clone(),
        })
    }
}
