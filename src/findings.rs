use crate::file_util::{file_exists, write_atomic};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io;
use std::path::Path;

/// the log keeps only this many of the newest findings
pub const MAX_FINDINGS: usize = 500;

/// one hit on one archived page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub anwalt: String,
    pub kanzlei: String,
    pub ort: String,
    pub phrase: String,
    pub context: String,
    /// snapshot url, the identity of a finding
    pub quelle: String,
    pub datum: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub findings: Vec<Finding>,
    /// how many of the new findings made it in
    pub added: usize,
}

/// a missing, unreadable or corrupt log reads as empty
pub fn load_findings(path: &Path) -> Vec<Finding> {
    if !file_exists(path) {
        return Vec::new();
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("cannot read {} ({}), starting empty", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Finding>>(&raw) {
        Ok(findings) => findings,
        Err(e) => {
            warn!("{} is not a findings log ({}), starting empty", path.display(), e);
            Vec::new()
        }
    }
}

/// appends the findings whose `quelle` isn't known yet, in discovery order,
/// then keeps only the last MAX_FINDINGS
pub fn merge(existing: Vec<Finding>, new: Vec<Finding>) -> Merged {
    let mut known: HashSet<String> = existing.iter().map(|f| f.quelle.clone()).collect();
    let mut findings = existing;

    let mut added = 0;
    for finding in new {
        if known.insert(finding.quelle.clone()) {
            findings.push(finding);
            added += 1;
        }
    }

    if findings.len() > MAX_FINDINGS {
        let overflow = findings.len() - MAX_FINDINGS;
        findings.drain(..overflow);
    }

    Merged { findings, added }
}

/// pretty printed, umlauts stay umlauts
pub fn to_json(findings: &[Finding]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(findings)
}

pub fn persist(path: &Path, findings: &[Finding]) -> io::Result<()> {
    let json = to_json(findings).map_err(io::Error::other)?;
    write_atomic(path, &json)
}

/// merges into `existing`, the log as the caller loaded it at the start of the run,
/// and writes the result back. the file isn't read again.
/// there is no lock, two overlapping runs lose one run's additions
pub fn merge_and_persist(path: &Path, existing: Vec<Finding>, new: Vec<Finding>) -> io::Result<Merged> {
    let merged = merge(existing, new);
    persist(path, &merged.findings)?;
    Ok(merged)
}
