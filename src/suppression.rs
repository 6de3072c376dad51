//! Suppression comment parsing and handling
//!
//! Supports swiftlint-style comments to silence rules:
//! - `// swiftlint:disable:this block_based_kvo` - suppress on this line
//! - `// swiftlint:disable:next block_based_kvo` - suppress on the next line
//! - `// swiftlint:disable:previous block_based_kvo` - suppress on the previous line
//! - `// swiftlint:disable block_based_kvo` ... `// swiftlint:enable block_based_kvo` - region
//!
//! `all` in place of rule identifiers matches every rule.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static COMMAND_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"//\s*swiftlint:(disable|enable)(?::(this|next|previous))?((?:\s+[A-Za-z0-9_]+)+)")
        .expect("suppression regex is valid")
});

const ALL_RULES: &str = "all";

#[derive(Debug)]
struct RegionCommand {
    line: usize,
    disable: bool,
    rules: HashSet<String>,
}

/// Parsed suppression commands for a file
#[derive(Debug, Default)]
pub struct SuppressionDirectives {
    /// Single-line suppressions: line -> rule IDs
    line_rules: HashMap<usize, HashSet<String>>,
    /// Region commands in source order
    regions: Vec<RegionCommand>,
}

impl SuppressionDirectives {
    /// Parse suppression commands from source code
    pub fn parse(source: &str) -> Self {
        let mut directives = SuppressionDirectives::default();

        for (index, line) in source.lines().enumerate() {
            let line_number = index + 1;

            for caps in COMMAND_REGEX.captures_iter(line) {
                let Some(command) = caps.get(0) else {
                    continue;
                };
                if !is_comment_position(line, command.start()) {
                    continue;
                }

                let disable = &caps[1] == "disable";
                let rules: HashSet<String> =
                    caps[3].split_whitespace().map(str::to_string).collect();

                let target = match caps.get(2).map(|m| m.as_str()) {
                    Some("this") => Some(line_number),
                    Some("next") => Some(line_number + 1),
                    Some("previous") => line_number.checked_sub(1).filter(|&l| l > 0),
                    _ => None,
                };

                match target {
                    Some(target) if disable => {
                        directives.line_rules.entry(target).or_default().extend(rules);
                    }
                    // `enable:this` and friends have nothing to re-enable
                    Some(_) => {}
                    None => directives.regions.push(RegionCommand {
                        line: line_number,
                        disable,
                        rules,
                    }),
                }
            }
        }

        directives
    }

    /// Check if a rule is suppressed at a given line
    pub fn is_suppressed(&self, line: usize, rule_id: &str) -> bool {
        let applies = |rules: &HashSet<String>| rules.contains(ALL_RULES) || rules.contains(rule_id);

        if self.line_rules.get(&line).is_some_and(|rules| applies(rules)) {
            return true;
        }

        self.regions
            .iter()
            .take_while(|command| command.line <= line)
            .filter(|command| applies(&command.rules))
            .last()
            .is_some_and(|command| command.disable)
    }
}

/// `//` at `start` opens a comment unless it sits inside a string literal
fn is_comment_position(line: &str, start: usize) -> bool {
    let mut in_string = false;
    let mut escaped = false;
    for ch in line[..start].chars() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            _ => {}
        }
    }
    !in_string
}

/// Convert byte offset to line number (1-indexed)
pub fn offset_to_line(source: &str, offset: usize) -> usize {
    source.as_bytes()[..offset.min(source.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_this() {
        let source = "override func observeValue() {} // swiftlint:disable:this block_based_kvo\n";
        let directives = SuppressionDirectives::parse(source);
        assert!(directives.is_suppressed(1, "block_based_kvo"));
        assert!(!directives.is_suppressed(1, "other_rule"));
        assert!(!directives.is_suppressed(2, "block_based_kvo"));
    }

    #[test]
    fn test_disable_next_and_previous() {
        let source = r#"
// swiftlint:disable:next block_based_kvo
line3
line4
// swiftlint:disable:previous all
"#;
        let directives = SuppressionDirectives::parse(source);
        assert!(directives.is_suppressed(3, "block_based_kvo"));
        assert!(directives.is_suppressed(4, "anything"));
        assert!(!directives.is_suppressed(5, "block_based_kvo"));
    }

    #[test]
    fn test_multiple_rules() {
        let source = "x // swiftlint:disable:this rule_a rule_b\n";
        let directives = SuppressionDirectives::parse(source);
        assert!(directives.is_suppressed(1, "rule_a"));
        assert!(directives.is_suppressed(1, "rule_b"));
        assert!(!directives.is_suppressed(1, "rule_c"));
    }

    #[test]
    fn test_regions() {
        let source = r#"line1
// swiftlint:disable block_based_kvo
line3
// swiftlint:enable block_based_kvo
line5
// swiftlint:disable all
line7
// swiftlint:enable block_based_kvo
line9
"#;
        let directives = SuppressionDirectives::parse(source);
        assert!(!directives.is_suppressed(1, "block_based_kvo"));
        assert!(directives.is_suppressed(3, "block_based_kvo"));
        assert!(!directives.is_suppressed(5, "block_based_kvo"));
        assert!(directives.is_suppressed(7, "block_based_kvo"));
        assert!(!directives.is_suppressed(9, "block_based_kvo"));
        assert!(directives.is_suppressed(9, "other_rule"));
    }

    #[test]
    fn test_unrelated_comments_ignored() {
        let source = "// swiftlint is great\n// swiftlint:disable\n";
        let directives = SuppressionDirectives::parse(source);
        assert!(!directives.is_suppressed(1, "block_based_kvo"));
        assert!(!directives.is_suppressed(3, "block_based_kvo"));
    }

    #[test]
    fn test_every_command_on_a_line_applies() {
        let source = "x // swiftlint:disable:this rule_a // swiftlint:disable:next rule_b\ny\n";
        let directives = SuppressionDirectives::parse(source);
        assert!(directives.is_suppressed(1, "rule_a"));
        assert!(directives.is_suppressed(2, "rule_b"));
        assert!(!directives.is_suppressed(1, "rule_b"));
    }

    #[test]
    fn test_commands_inside_string_literals_are_ignored() {
        let source = r#"let s = "// swiftlint:disable all"
let t = "escaped \" // swiftlint:disable all"
override func observeValue() {}
"#;
        let directives = SuppressionDirectives::parse(source);
        assert!(!directives.is_suppressed(3, "block_based_kvo"));
    }

    #[test]
    fn test_command_after_string_literal() {
        let source = "let s = \"a\" // swiftlint:disable:this block_based_kvo\n";
        let directives = SuppressionDirectives::parse(source);
        assert!(directives.is_suppressed(1, "block_based_kvo"));
    }

    #[test]
    fn test_offset_to_line() {
        let source = "line1\nline2\nline3";
        assert_eq!(offset_to_line(source, 0), 1);
        assert_eq!(offset_to_line(source, 5), 1);
        assert_eq!(offset_to_line(source, 6), 2);
        assert_eq!(offset_to_line(source, 12), 3);
        assert_eq!(offset_to_line(source, 100), 3);
    }
}
