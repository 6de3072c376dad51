//! Self-test of rule example corpora
//!
//! Every rule documents itself with snippets that must not trigger and
//! snippets that must. Triggering snippets mark each expected violation with
//! `↓` placed right before the reported token.

use crate::models::{RuleContext, Violation};
use crate::rules::base::LintRule;
use crate::scanner::scan_declarations;
use crate::version::SwiftVersion;
use thiserror::Error;

/// Marks the expected location of a violation inside an example
pub const VIOLATION_MARKER: char = '↓';

const EXAMPLE_FILE: &str = "example.swift";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExampleMismatch {
    #[error("{rule}: non-triggering example #{index} produced violations at {offsets:?}")]
    UnexpectedViolations {
        rule: &'static str,
        index: usize,
        offsets: Vec<usize>,
    },

    #[error("{rule}: triggering example #{index} expected violations at {expected:?}, found {found:?}")]
    WrongLocations {
        rule: &'static str,
        index: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("{rule}: triggering example #{index} still triggers with Swift {version}")]
    ActiveBelowMinimum {
        rule: &'static str,
        index: usize,
        version: SwiftVersion,
    },
}

/// Remove markers, returning the clean snippet and the marker byte offsets
pub fn strip_markers(snippet: &str) -> (String, Vec<usize>) {
    let mut stripped = String::with_capacity(snippet.len());
    let mut offsets = Vec::new();
    for ch in snippet.chars() {
        if ch == VIOLATION_MARKER {
            offsets.push(stripped.len());
        } else {
            stripped.push(ch);
        }
    }
    (stripped, offsets)
}

/// Run a rule over every declaration of a snippet
pub fn violations_in(rule: &dyn LintRule, source: &str, swift_version: SwiftVersion) -> Vec<Violation> {
    scan_declarations(source)
        .iter()
        .flat_map(|declaration| {
            rule.check(&RuleContext {
                declaration,
                file_path: EXAMPLE_FILE,
                source,
                swift_version,
            })
        })
        .collect()
}

fn offsets(violations: &[Violation]) -> Vec<usize> {
    let mut offsets: Vec<_> = violations.iter().map(|v| v.location.byte_offset).collect();
    offsets.sort_unstable();
    offsets
}

/// Check a rule against its own example corpora
pub fn verify_examples(rule: &dyn LintRule) -> Result<(), ExampleMismatch> {
    let description = rule.description();
    let rule_id = description.identifier;
    let version = rule.minimum_swift_version().unwrap_or_default();

    for (index, example) in description.non_triggering_examples.iter().enumerate() {
        let (source, _) = strip_markers(example);
        let found = violations_in(rule, &source, version);
        if !found.is_empty() {
            return Err(ExampleMismatch::UnexpectedViolations {
                rule: rule_id,
                index,
                offsets: offsets(&found),
            });
        }
    }

    for (index, example) in description.triggering_examples.iter().enumerate() {
        let (source, expected) = strip_markers(example);
        let found = offsets(&violations_in(rule, &source, version));
        if found != expected {
            return Err(ExampleMismatch::WrongLocations {
                rule: rule_id,
                index,
                expected,
                found,
            });
        }

        if let Some(older) = rule.minimum_swift_version().and_then(previous_major) {
            if !violations_in(rule, &source, older).is_empty() {
                return Err(ExampleMismatch::ActiveBelowMinimum {
                    rule: rule_id,
                    index,
                    version: older,
                });
            }
        }
    }

    log::debug!(
        "{}: {} non-triggering and {} triggering examples verified",
        rule_id,
        description.non_triggering_examples.len(),
        description.triggering_examples.len()
    );
    Ok(())
}

fn previous_major(version: SwiftVersion) -> Option<SwiftVersion> {
    version
        .major
        .checked_sub(1)
        .map(|major| SwiftVersion::new(major, 9, 0))
}
