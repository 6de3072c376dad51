//! Core data models for the swift-idiom-linter

use crate::declaration::DeclarationRecord;
use crate::suppression::offset_to_line;
use crate::version::SwiftVersion;
use serde::{Deserialize, Serialize};

/// Where a violation was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub byte_offset: usize,
}

/// A violation detected by a lint rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule_id: String,
    pub message: String,
    pub severity: Severity,
    pub location: Location,
}

/// Severity level of a violation, ordered `Warning < Error`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Warning,
    Error,
}

impl Violation {
    pub fn new(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        file: impl Into<String>,
        byte_offset: usize,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            message: message.into(),
            severity,
            location: Location {
                file: file.into(),
                byte_offset,
            },
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Severity setting shared by rules whose only option is their severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeverityConfiguration {
    pub severity: Severity,
}

impl SeverityConfiguration {
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }
}

/// Context passed to each rule for checking
pub struct RuleContext<'a> {
    pub declaration: &'a DeclarationRecord,
    pub file_path: &'a str,
    pub source: &'a str,
    pub swift_version: SwiftVersion,
}

/// Result of linting a single file
#[derive(Debug, Default)]
pub struct LintResult {
    pub file_path: String,
    pub source: String,
    pub violations: Vec<Violation>,
    pub error: Option<String>,
}

impl LintResult {
    pub fn new(file_path: String, source: String) -> Self {
        Self {
            file_path,
            source,
            violations: Vec::new(),
            error: None,
        }
    }

    pub fn with_error(file_path: String, error: String) -> Self {
        Self {
            file_path,
            source: String::new(),
            violations: Vec::new(),
            error: Some(error),
        }
    }

    /// 1-indexed line of a violation in this file
    pub fn line_of(&self, violation: &Violation) -> usize {
        offset_to_line(&self.source, violation.location.byte_offset)
    }

    /// Trimmed source text of a 1-indexed line, empty when out of range
    pub fn source_line(&self, line: usize) -> &str {
        self.source
            .lines()
            .nth(line.saturating_sub(1))
            .map(str::trim)
            .unwrap_or_default()
    }
}
