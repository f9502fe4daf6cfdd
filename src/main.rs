use {
    clap::Parser,
    cli::Cli,
    colored::Colorize,
    config::Settings,
    error::{ConfigError, RunError},
    monitor::RunSummary,
    request::HttpFetcher,
    scanner::PhraseScanner,
    waybackmachine::ArchiveLookup,
};

// should be first, the macros are used everywhere
mod logging;

mod cli;
mod config;
mod error;
mod file_util;
mod findings;
mod google_search;
mod monitor;
mod report;
mod request;
mod scanner;
mod targets;
mod user_agents;
mod waybackmachine;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run_cli(&cli).await {
        Ok(summary) => info!(
            "done: {} targets, {} candidates, {} hits, {} new",
            summary.targets_scanned, summary.candidates, summary.hits, summary.added
        ),
        Err(e) => err!("{}", e),
    }
}

/// everything main does except exiting
async fn run_cli(cli: &Cli) -> Result<RunSummary, RunError> {
    // before anything touches the disk
    let targets = targets::load_targets(cli.targets.as_deref())?;

    let settings = Settings::from_cli(cli)?;
    let fetcher = HttpFetcher::new(settings.timeout, settings.retries, settings.proxy.clone())
        .map_err(ConfigError::from)?;
    let lookup = ArchiveLookup::from_settings(&settings);
    let scanner = PhraseScanner::new(&settings.vocabulary.phrases, &settings.archive_host);

    Ok(monitor::run(&settings, &targets, &fetcher, &lookup, &scanner).await?)
}
