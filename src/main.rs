//! swift-idiom-linter CLI

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use swift_idiom_linter::{
    collect_swift_files, config, lint_files_parallel,
    logging::{LintLogEntry, LintLogger},
    models::{LintResult, Severity},
    rules::{self, base::LintRule},
    verify::verify_examples,
    version::SwiftVersion,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "swift-idiom-linter")]
#[command(version, about = "A linter for enforcing idiomatic API usage in Swift code")]
struct Args {
    /// Files or directories to lint
    #[arg(default_value = ".")]
    paths: Vec<String>,

    /// Enable specific rules (comma-separated, or "ALL")
    #[arg(long, value_delimiter = ',')]
    enable: Vec<String>,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Vec<String>,

    /// Exclude paths matching patterns
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output_format: OutputFormat,

    /// Ignore .swift-idiom-lint.toml configuration
    #[arg(long)]
    no_config: bool,

    /// Use this configuration file instead of searching for one
    #[arg(long, conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Swift version of the linted code (overrides configuration)
    #[arg(long)]
    swift_version: Option<SwiftVersion>,

    /// Append a JSON Lines record of this run to a file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Check every rule against its own examples and exit
    #[arg(long)]
    verify_examples: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default())
        .format_timestamp(None)
        .try_init()
        .ok();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = if args.no_config {
        None
    } else {
        config::load_config(args.config.as_deref())?
    };
    let base_config = config.clone().unwrap_or_default();

    let swift_version = args
        .swift_version
        .unwrap_or_else(|| base_config.swift_version());

    let (enabled_rules, exclude_patterns) = config::merge_config(
        config.as_ref(),
        &rules::get_all_rule_ids(),
        &args.enable,
        &args.disable,
        &args.exclude,
    );

    if args.verbose {
        eprintln!("Swift version: {}", swift_version);
        eprintln!("Enabled rules: {:?}", enabled_rules);
        eprintln!("Exclude patterns: {:?}", exclude_patterns);
    }

    let active_rules = rules::get_enabled_rules(&base_config, enabled_rules.as_deref());

    if args.list_rules {
        print_rules(&active_rules);
        return Ok(ExitCode::SUCCESS);
    }

    if args.verify_examples {
        return Ok(verify_rules(&active_rules));
    }

    if args.verbose {
        eprintln!(
            "Active rules: {}",
            active_rules
                .iter()
                .map(|r| r.rule_id())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let files = collect_swift_files(&args.paths, &exclude_patterns);

    if args.verbose {
        eprintln!("Found {} Swift files", files.len());
    }

    if files.is_empty() {
        eprintln!("No Swift files found");
        return Ok(ExitCode::SUCCESS);
    }

    let results = lint_files_parallel(&files, &active_rules, swift_version);

    if let Some(log_path) = &args.log_file {
        let entry = LintLogEntry::from_results(
            &results,
            &swift_version.to_string(),
            "normal",
            enabled_rules.clone(),
        );
        LintLogger::new(log_path)
            .and_then(|mut logger| logger.log(&entry))
            .with_context(|| format!("failed to write run log {}", log_path.display()))?;
    }

    let mut error_count = 0;
    let mut warning_count = 0;
    for v in results.iter().flat_map(|r| &r.violations) {
        match v.severity {
            Severity::Error => error_count += 1,
            Severity::Warning => warning_count += 1,
        }
    }

    match args.output_format {
        OutputFormat::Json => print_json(&results, &active_rules)?,
        OutputFormat::Text => print_text_grouped(&results, &active_rules),
    }

    let total = error_count + warning_count;
    if total > 0 {
        eprintln!(
            "\nFound {} issue(s): {} error(s), {} warning(s)",
            total, error_count, warning_count
        );
    } else if args.verbose {
        eprintln!("\nNo issues found.");
    }

    if error_count > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_rules(rules: &[Box<dyn LintRule>]) {
    for rule in rules {
        let description = rule.description();
        println!(
            "{} {} [{}] ({})",
            description.identifier.cyan().bold(),
            description.name.white().bold(),
            description.kind,
            rule.severity()
        );
        println!("    {}", description.description);
    }
}

fn verify_rules(rules: &[Box<dyn LintRule>]) -> ExitCode {
    let mut failed = false;
    for rule in rules {
        match verify_examples(rule.as_ref()) {
            Ok(()) => println!("{} {}", "ok".green().bold(), rule.rule_id()),
            Err(mismatch) => {
                failed = true;
                println!("{} {}", "FAILED".red().bold(), mismatch);
            }
        }
    }

    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn find_rule<'a>(rules: &'a [Box<dyn LintRule>], rule_id: &str) -> Option<&'a dyn LintRule> {
    rules
        .iter()
        .find(|r| r.rule_id() == rule_id)
        .map(|r| r.as_ref())
}

/// Violation info for grouping
struct ViolationInfo<'a> {
    file_path: &'a str,
    line: usize,
    severity: Severity,
    source_line: &'a str,
}

fn print_text_grouped(results: &[LintResult], rules: &[Box<dyn LintRule>]) {
    let mut grouped: BTreeMap<&str, Vec<ViolationInfo>> = BTreeMap::new();

    for result in results {
        if let Some(error) = &result.error {
            eprintln!("{}: {}", result.file_path.red(), error);
            continue;
        }

        for v in &result.violations {
            let line = result.line_of(v);
            grouped.entry(&v.rule_id).or_default().push(ViolationInfo {
                file_path: &v.location.file,
                line,
                severity: v.severity,
                source_line: result.source_line(line),
            });
        }
    }

    for (rule_id, violations) in &grouped {
        let (name, description) = find_rule(rules, rule_id)
            .map(|r| (r.description().name, r.description().description))
            .unwrap_or(("Unknown Rule", "Unknown rule violation."));
        let count = violations.len();

        let severity = violations
            .iter()
            .map(|v| v.severity)
            .max()
            .unwrap_or(Severity::Warning);
        let header = match severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };

        println!(
            "\n{} {} - {} ({} occurrence{})",
            header,
            rule_id.cyan().bold(),
            name.white().bold(),
            count,
            if count == 1 { "" } else { "s" }
        );
        println!("{}", "─".repeat(80).dimmed());
        println!("  {} {}", "What:".bright_white(), description);
        println!();

        for v in violations {
            println!("    {}:{}", v.file_path.dimmed(), v.line.to_string().yellow());
            if !v.source_line.is_empty() {
                println!("      {}", v.source_line.bright_white());
            }
        }
    }
}

fn print_json(results: &[LintResult], rules: &[Box<dyn LintRule>]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&json_report(results, rules))?);
    Ok(())
}

/// Violations grouped by rule, plus files that could not be linted
fn json_report(results: &[LintResult], rules: &[Box<dyn LintRule>]) -> serde_json::Value {
    let mut grouped: BTreeMap<&str, Vec<serde_json::Value>> = BTreeMap::new();
    let mut errors = Vec::new();

    for result in results {
        if let Some(error) = &result.error {
            errors.push(serde_json::json!({
                "file": result.file_path,
                "error": error,
            }));
            continue;
        }

        for v in &result.violations {
            let line = result.line_of(v);
            grouped.entry(&v.rule_id).or_default().push(serde_json::json!({
                "file": v.location.file,
                "byte_offset": v.location.byte_offset,
                "line": line,
                "severity": v.severity,
                "message": v.message,
                "source": result.source_line(line),
            }));
        }
    }

    let rule_groups: Vec<serde_json::Value> = grouped
        .into_iter()
        .map(|(rule_id, violations)| {
            let rule = find_rule(rules, rule_id);
            serde_json::json!({
                "rule": rule_id,
                "name": rule.map(|r| r.description().name),
                "kind": rule.map(|r| r.description().kind.to_string()),
                "description": rule.map(|r| r.description().description),
                "count": violations.len(),
                "violations": violations,
            })
        })
        .collect();

    serde_json::json!({
        "rules": rule_groups,
        "errors": errors,
    })
}
