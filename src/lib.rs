//! swift-idiom-linter: A linter for idiomatic API usage in Swift
//!
//! This crate scans Swift sources into declaration records and runs
//! independent rules over each declaration. Rules describe themselves with
//! example corpora that double as their test fixtures.

pub mod config;
pub mod declaration;
pub mod logging;
pub mod models;
pub mod rules;
pub mod scanner;
pub mod suppression;
pub mod verify;
pub mod version;

use models::{LintResult, RuleContext};
use rayon::prelude::*;
use rules::base::LintRule;
use scanner::scan_declarations;
use std::path::{Path, PathBuf};
use suppression::{offset_to_line, SuppressionDirectives};
use version::SwiftVersion;
use walkdir::WalkDir;

const SWIFT_EXTENSION: &str = "swift";

/// Lint a single file and return the results
pub fn lint_file(
    file_path: &Path,
    rules: &[Box<dyn LintRule>],
    swift_version: SwiftVersion,
) -> LintResult {
    let path_str = file_path.to_string_lossy().to_string();

    let source = match std::fs::read_to_string(file_path) {
        Ok(s) => s,
        Err(e) => {
            log::debug!("failed to read {}: {}", path_str, e);
            return LintResult::with_error(path_str, format!("Failed to read file: {}", e));
        }
    };

    lint_source(&path_str, source, rules, swift_version)
}

/// Lint source code and return the results
pub fn lint_source(
    file_path: &str,
    source: String,
    rules: &[Box<dyn LintRule>],
    swift_version: SwiftVersion,
) -> LintResult {
    let declarations = scan_declarations(&source);
    let suppressions = SuppressionDirectives::parse(&source);
    log::trace!("{}: {} declarations", file_path, declarations.len());

    let mut violations = Vec::new();
    for declaration in &declarations {
        let context = RuleContext {
            declaration,
            file_path,
            source: &source,
            swift_version,
        };

        for rule in rules {
            for v in rule.check(&context) {
                let line = offset_to_line(&source, v.location.byte_offset);
                if suppressions.is_suppressed(line, &v.rule_id) {
                    log::debug!("{}:{}: {} suppressed", file_path, line, v.rule_id);
                } else {
                    violations.push(v);
                }
            }
        }
    }
    violations.sort_by_key(|v| v.location.byte_offset);

    let mut result = LintResult::new(file_path.to_string(), source);
    result.violations = violations;
    result
}

/// Collect Swift files from paths
pub fn collect_swift_files(paths: &[String], exclude_patterns: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        let p = Path::new(path);
        if p.is_file() {
            if is_swift_file(p) {
                files.push(p.to_path_buf());
            }
        } else if p.is_dir() {
            for entry in WalkDir::new(p)
                .into_iter()
                .filter_entry(|e| !should_exclude(e.path(), exclude_patterns))
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if path.is_file() && is_swift_file(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            log::debug!("skipping {}: not a file or directory", path);
        }
    }

    files
}

fn is_swift_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == SWIFT_EXTENSION)
}

/// A pattern excludes a path when it equals one of the path's components.
/// Patterns containing `/` match anywhere in the path instead.
fn should_exclude(path: &Path, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if pattern.contains('/') {
            return path.to_string_lossy().contains(pattern.as_str());
        }
        path.components()
            .any(|component| component.as_os_str().to_str() == Some(pattern.as_str()))
    })
}

/// Lint multiple files in parallel
pub fn lint_files_parallel(
    files: &[PathBuf],
    rules: &[Box<dyn LintRule>],
    swift_version: SwiftVersion,
) -> Vec<LintResult> {
    files
        .par_iter()
        .map(|file| lint_file(file, rules, swift_version))
        .collect()
}
