//! Error-line scanning for cluster daemon logs.
//!
//! The benchmark's last assertion: the scaling daemons on the head node
//! must not have logged errors during the run. The scan is pure — the
//! caller fetches log contents however it reaches the cluster.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static DEFAULT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\bERROR\b").unwrap(),
        Regex::new(r"\bCRITICAL\b").unwrap(),
        Regex::new(r"\bTraceback\b").unwrap(),
    ]
});

/// One error line found in a scanned log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFinding {
    pub file: String,
    /// 1-based line number within the scanned content.
    pub line_no: usize,
    pub line: String,
}

/// Scans log contents line-by-line against a set of error patterns.
pub struct LogScan {
    patterns: Vec<Regex>,
}

impl LogScan {
    /// Scanner with the default error patterns (`ERROR`, `CRITICAL`,
    /// `Traceback`).
    pub fn new() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.clone(),
        }
    }

    /// Scanner with caller-supplied patterns.
    pub fn with_patterns(patterns: &[String]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Scan `content` (attributed to `file`) and return every line that
    /// matches any pattern.
    pub fn scan(&self, file: &str, content: &str) -> Vec<LogFinding> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| self.patterns.iter().any(|p| p.is_match(line)))
            .map(|(i, line)| LogFinding {
                file: file.to_string(),
                line_no: i + 1,
                line: line.to_string(),
            })
            .collect()
    }
}

impl Default for LogScan {
    fn default() -> Self {
        Self::new()
    }
}
