use crate::config::Settings;
use crate::findings::{self, Finding};
use crate::report;
use crate::request::PageFetcher;
use crate::scanner::PhraseScanner;
use crate::targets::Target;
use crate::waybackmachine::ArchiveLookup;
use chrono::Local;
use colored::Colorize;
use std::collections::HashSet;
use std::io;
use tokio::time::sleep;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub targets_scanned: usize,
    pub candidates: usize,
    pub hits: usize,
    pub added: usize,
    pub total: usize,
}

/// one pass over all targets. only a failure to write the outputs is an error,
/// everything that goes wrong on the network just means "nothing found here"
pub async fn run(
    settings: &Settings,
    targets: &[Target],
    fetcher: &dyn PageFetcher,
    lookup: &ArchiveLookup,
    scanner: &PhraseScanner,
) -> io::Result<RunSummary> {
    let mut summary = RunSummary::default();
    let datum = Local::now().format("%Y-%m-%d").to_string();

    // read once, the same log is merged into at the end
    let existing = findings::load_findings(&settings.findings_path);
    let known: HashSet<String> = existing.iter().map(|f| f.quelle.clone()).collect();

    info!(
        "{} targets, providers: {}",
        targets.len(),
        lookup.provider_names().join(" -> ")
    );

    let mut new_findings: Vec<Finding> = Vec::new();
    let mut requested = false;

    for target in targets {
        if !target.aktiv {
            info!("{}: inactive, skipped", target.name);
            continue;
        }
        let domain = match target.domain() {
            Some(domain) => domain,
            None => {
                warn!("{}: no usable kanzlei_url ({:?})", target.name, target.kanzlei_url);
                continue;
            }
        };

        summary.targets_scanned += 1;
        info!("{} ({})", target.name, domain);

        let candidates = lookup
            .lookup(fetcher, &domain, |s| known.contains(&scanner.snapshot_url(s)))
            .await;
        info!("{}: {} candidates", domain, candidates.len());
        summary.candidates += candidates.len();

        for snapshot in &candidates {
            if requested && !settings.delay.is_zero() {
                sleep(settings.delay).await;
            }
            requested = true;

            if let Some(found) = scanner.scan(fetcher, snapshot).await {
                hit!("{} \"{}\" {}", target.name, found.phrase, found.quelle);
                summary.hits += 1;
                new_findings.push(Finding {
                    anwalt: target.name.clone(),
                    kanzlei: target.kanzlei_name.clone(),
                    ort: target.ort.clone(),
                    phrase: found.phrase,
                    context: found.context,
                    quelle: found.quelle,
                    datum: datum.clone(),
                });
            }
        }
    }

    let merged = findings::merge_and_persist(&settings.findings_path, existing, new_findings)?;
    summary.added = merged.added;
    summary.total = merged.findings.len();
    info!(
        "{} new findings written to {} ({} total)",
        summary.added,
        settings.findings_path.display(),
        summary.total
    );

    let html = report::render(&settings.findings_href, &settings.title);
    report::write_report(&settings.report_path, &html)?;
    info!("{} updated", settings.report_path.display());

    Ok(summary)
}
