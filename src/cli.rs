use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    author = "potato",
    version,
    about = "Scans archived law-firm pages for watched phrases and publishes the hits.",
    long_about = None
)]
pub struct Cli {
    /// Base64 encoded JSON list of targets
    #[arg(long, env = "TARGETS_ENCRYPTED", hide_env_values = true)]
    pub targets: Option<String>,

    /// Findings log, read and rewritten on every run
    #[arg(long, default_value = "data/findings.json")]
    pub findings: String,

    /// Generated report page
    #[arg(long, default_value = "docs/index.html")]
    pub report: String,

    /// Where the report page fetches the findings from (relative to the page)
    #[arg(long, default_value = "../data/findings.json")]
    pub findings_href: String,

    /// Report page title
    #[arg(long, default_value = "Anwalt-Monitor")]
    pub title: String,

    /// JSON file with {"phrases": [...], "keywords": [...]} replacing the built-in lists
    #[arg(long)]
    pub vocabulary: Option<String>,

    /// Host serving the snapshots
    #[arg(long, default_value = "web.archive.org")]
    pub archive_host: String,

    /// CDX endpoint base, point it at a mirror or proxy if the archive blocks you
    #[arg(long, default_value = "https://web.archive.org")]
    pub cdx_base: String,

    /// Lookup providers, tried in order until one returns candidates
    #[arg(long, value_delimiter = ',', default_value = "cdx,memento,availability,search")]
    pub providers: Vec<String>,

    /// Maximum snapshots scanned per target
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u16).range(1..=50))]
    pub max_candidates: u16,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Pause between requests in milliseconds
    #[arg(long, default_value_t = 1500)]
    pub delay_ms: u64,

    /// Retries for throttled requests (429/503)
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(0..=crate::config::MAX_RETRIES as i64))]
    pub retries: u32,

    /// Proxy for all requests, eg 127.0.0.1:8080 or socks5://host:port
    #[arg(long)]
    pub proxy: Option<String>,

    /// Disable colorized output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
