use crate::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Window size the run uses; matches the layout the subject form was styled
/// for so screenshots are comparable across runs.
pub const WINDOW_WIDTH: u32 = 1400;
pub const WINDOW_HEIGHT: u32 = 900;

/// Run-wide configuration, assembled once by the CLI and passed to the
/// orchestrator and the evidence writer at construction time. There is no
/// implicit global output directory.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    /// Target URL of the subject form (file:// or http(s)://).
    pub url: String,
    /// Launch Chrome without a visible window.
    pub headless: bool,
    /// Directory all evidence artifacts are written into. Artifacts are
    /// overwritten on re-run, not versioned.
    pub evidence_dir: PathBuf,
    /// Budget for bounded waits on subject-produced oracles (inline error,
    /// success banner).
    pub wait_budget: Duration,
    /// Pause after a value change so the subject's own event listeners can
    /// run before the next step reads derived state. A pragmatic trade-off,
    /// not a correctness guarantee.
    pub settle: Duration,
}

impl HarnessConfig {
    pub fn new(url: impl Into<String>, headless: bool, evidence_dir: PathBuf) -> Result<Self> {
        let url = url.into();
        // Reject obviously unusable targets before a browser is launched.
        let parsed = url::Url::parse(&url)
            .map_err(|e| Error::InvalidConfig(format!("invalid target URL '{}': {}", url, e)))?;
        match parsed.scheme() {
            "file" | "http" | "https" => {}
            other => {
                return Err(Error::InvalidConfig(format!(
                    "unsupported URL scheme '{}': expected file, http, or https",
                    other
                )));
            }
        }

        Ok(Self {
            url,
            headless,
            evidence_dir,
            wait_budget: Duration::from_secs(5),
            settle: Duration::from_millis(120),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_file_and_http_urls() {
        for url in [
            "file:///tmp/index.html",
            "http://localhost:8000/index.html",
            "https://example.com/form",
        ] {
            let config = HarnessConfig::new(url, true, PathBuf::from("out")).unwrap();
            assert_eq!(config.url, url);
        }
    }

    #[test]
    fn test_rejects_non_url_target() {
        let err = HarnessConfig::new("not a url", true, PathBuf::from("out")).unwrap_err();
        assert!(err.to_string().contains("invalid target URL"));
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        let err = HarnessConfig::new("ftp://host/form", true, PathBuf::from("out")).unwrap_err();
        assert!(err.to_string().contains("unsupported URL scheme"));
    }

    #[test]
    fn test_defaults_match_documented_budgets() {
        let config =
            HarnessConfig::new("file:///tmp/index.html", false, PathBuf::from("out")).unwrap();
        assert_eq!(config.wait_budget, Duration::from_secs(5));
        assert_eq!(config.settle, Duration::from_millis(120));
    }
}
