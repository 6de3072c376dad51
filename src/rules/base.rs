//! Base trait and metadata for all lint rules

use crate::models::{RuleContext, Severity, Violation};
use crate::version::SwiftVersion;
use std::fmt;

/// Category a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Idiomatic,
    Lint,
    Style,
    Metrics,
    Performance,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::Idiomatic => "idiomatic",
            RuleKind::Lint => "lint",
            RuleKind::Style => "style",
            RuleKind::Metrics => "metrics",
            RuleKind::Performance => "performance",
        };
        f.write_str(name)
    }
}

/// Static description of a rule
///
/// The example corpora document the rule and double as its self-test
/// fixture. Triggering examples mark each expected violation with `↓`.
#[derive(Debug)]
pub struct RuleDescription {
    /// Stable identifier used in configuration and suppression comments
    pub identifier: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: RuleKind,
    pub non_triggering_examples: &'static [&'static str],
    pub triggering_examples: &'static [&'static str],
}

/// Base trait that all lint rules must implement
pub trait LintRule: Send + Sync {
    fn description(&self) -> &'static RuleDescription;

    /// The unique identifier for this rule (e.g., "block_based_kvo")
    fn rule_id(&self) -> &'static str {
        self.description().identifier
    }

    /// Severity this rule reports with
    fn severity(&self) -> Severity;

    /// Oldest language version the rule applies to, if any
    fn minimum_swift_version(&self) -> Option<SwiftVersion> {
        None
    }

    /// Perform the lint check on a declaration
    fn check(&self, context: &RuleContext) -> Vec<Violation>;
}
