//! Attack-signature classification for proxy log lines.
//!
//! The signature list is fixed and ordered by priority; a line is reported
//! under the first signature that matches it, so a request like
//! `GET /../etc/passwd` counts once (directory traversal), not twice.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::snapshot::LogMatch;

/// Known attack categories, in detection-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureKind {
    DirectoryTraversal,
    ScriptInjection,
    SqlInjection,
    SensitiveFile,
    CommandInjection,
    CodeEvaluation,
    InfoDisclosure,
    CmsProbe,
}

impl SignatureKind {
    pub fn label(&self) -> &'static str {
        match self {
            SignatureKind::DirectoryTraversal => "directory traversal",
            SignatureKind::ScriptInjection => "script injection",
            SignatureKind::SqlInjection => "SQL injection",
            SignatureKind::SensitiveFile => "sensitive file access",
            SignatureKind::CommandInjection => "command injection",
            SignatureKind::CodeEvaluation => "code evaluation",
            SignatureKind::InfoDisclosure => "info disclosure",
            SignatureKind::CmsProbe => "CMS admin probe",
        }
    }
}

struct Signature {
    kind: SignatureKind,
    pattern: Regex,
}

static SIGNATURES: Lazy<Vec<Signature>> = Lazy::new(|| {
    let sig = |kind, pattern: &str| Signature {
        kind,
        pattern: Regex::new(pattern).expect("signature pattern must compile"),
    };

    vec![
        sig(SignatureKind::DirectoryTraversal, r"(?i)\.\./"),
        sig(SignatureKind::ScriptInjection, r"(?i)<script"),
        sig(SignatureKind::SqlInjection, r"(?i)union.*select"),
        sig(SignatureKind::SensitiveFile, r"(?i)etc/passwd"),
        sig(SignatureKind::CommandInjection, r"(?i)cmd="),
        sig(SignatureKind::CodeEvaluation, r"(?i)eval\("),
        sig(SignatureKind::InfoDisclosure, r"(?i)phpinfo"),
        sig(SignatureKind::CmsProbe, r"(?i)wp-admin"),
    ]
});

/// Default number of log lines inspected per cycle.
pub const DEFAULT_SCAN_WINDOW: usize = 1000;

/// Classify the last `window` lines of raw log text.
///
/// Returns matches in input order, at most one per line. Empty and
/// whitespace-only lines are skipped. Deterministic for a given input.
pub fn scan(text: &str, window: usize) -> Vec<LogMatch> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(window);
    let timestamp = Utc::now().timestamp();

    lines[start..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let signature = classify(line)?;
            Some(LogMatch {
                ip: source_ip(line),
                signature,
                raw_line: line.to_string(),
                timestamp,
            })
        })
        .collect()
}

/// First matching signature for a single line, if any.
pub fn classify(line: &str) -> Option<SignatureKind> {
    SIGNATURES
        .iter()
        .find(|sig| sig.pattern.is_match(line))
        .map(|sig| sig.kind)
}

/// The client IP is the first whitespace-delimited field of a combined-format
/// access log line.
fn source_ip(line: &str) -> String {
    line.split_whitespace()
        .next()
        .unwrap_or("unknown")
        .to_string()
}
