//! Run log for swift-idiom-linter
//!
//! Appends one JSON Lines record per lint run to a file for later analysis.

use crate::models::{LintResult, Severity};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const MAX_SOURCE_LINE: usize = 200;

/// A single log entry representing one lint run
#[derive(Debug, Serialize, Deserialize)]
pub struct LintLogEntry {
    /// Unix timestamp of when the lint was run
    pub timestamp: i64,
    /// ISO 8601 formatted date string
    pub datetime: String,
    pub files_scanned: usize,
    pub total_violations: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub violations: Vec<ViolationLogEntry>,
    /// Swift version the run was evaluated against
    pub swift_version: String,
    /// Run mode (normal, verify)
    pub run_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_rules: Option<Vec<String>>,
}

/// Log entry for a single violation
#[derive(Debug, Serialize, Deserialize)]
pub struct ViolationLogEntry {
    pub rule_id: String,
    pub file_path: String,
    pub byte_offset: usize,
    pub line: usize,
    pub severity: Severity,
    pub message: String,
    /// Source line content (truncated if too long)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,
}

impl LintLogEntry {
    /// Create a new log entry from lint results
    pub fn from_results(
        results: &[LintResult],
        swift_version: &str,
        run_mode: &str,
        enabled_rules: Option<Vec<String>>,
    ) -> Self {
        let now = chrono::Utc::now();

        let violations: Vec<ViolationLogEntry> = results
            .iter()
            .flat_map(|result| {
                result.violations.iter().map(move |v| {
                    let line = result.line_of(v);
                    let source_line = result.source_line(line);
                    ViolationLogEntry {
                        rule_id: v.rule_id.clone(),
                        file_path: v.location.file.clone(),
                        byte_offset: v.location.byte_offset,
                        line,
                        severity: v.severity,
                        message: v.message.clone(),
                        source_line: (!source_line.is_empty())
                            .then(|| truncate_source_line(source_line, MAX_SOURCE_LINE)),
                    }
                })
            })
            .collect();

        let error_count = violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();

        Self {
            timestamp: now.timestamp(),
            datetime: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            files_scanned: results.len(),
            total_violations: violations.len(),
            error_count,
            warning_count: violations.len() - error_count,
            violations,
            swift_version: swift_version.to_string(),
            run_mode: run_mode.to_string(),
            enabled_rules,
        }
    }
}

/// Logger that appends lint runs to a file
pub struct LintLogger {
    writer: BufWriter<File>,
    log_path: PathBuf,
}

impl LintLogger {
    /// Open the log file for appending, creating it and its parent directories
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(log_path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            log_path: log_path.to_path_buf(),
        })
    }

    /// Log a lint run to the file
    pub fn log(&mut self, entry: &LintLogEntry) -> std::io::Result<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        log::debug!("appended run to {}", self.log_path.display());
        Ok(())
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

/// Truncate source line if too long, respecting character boundaries
fn truncate_source_line(line: &str, max_len: usize) -> String {
    match line.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}
