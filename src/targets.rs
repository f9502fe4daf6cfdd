use crate::error::ConfigError;
use crate::request::ensure_scheme;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// a monitored lawyer and the firm website the archive is searched for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    #[serde(default)]
    pub kanzlei_url: String,
    #[serde(default)]
    pub kanzlei_name: String,
    #[serde(default)]
    pub ort: String,
    #[serde(default = "active_by_default")]
    pub aktiv: bool,
}

fn active_by_default() -> bool {
    true
}

impl Target {
    /// host of the firm website without a leading www.
    /// `None` when the url can't be made sense of
    pub fn domain(&self) -> Option<String> {
        if self.kanzlei_url.trim().is_empty() {
            return None;
        }
        let url = reqwest::Url::parse(&ensure_scheme(&self.kanzlei_url)).ok()?;
        let host = url.host_str()?.to_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);
        if host.is_empty() {
            return None;
        }
        Some(host.to_string())
    }
}

/// base64 -> utf-8 -> json list of targets
pub fn decode_targets(encoded: &str) -> Result<Vec<Target>, ConfigError> {
    let compact: String = encoded.split_whitespace().collect();
    let raw = STANDARD.decode(compact.as_bytes())?;
    let text = String::from_utf8(raw)?;
    Ok(serde_json::from_str(&text)?)
}

/// the targets value comes from TARGETS_ENCRYPTED (or --targets)
/// a missing or blank value is a configuration error
pub fn load_targets(value: Option<&str>) -> Result<Vec<Target>, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => decode_targets(v),
        _ => Err(ConfigError::MissingTargets),
    }
}
