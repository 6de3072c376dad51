//! Lint rules for swift-idiom-linter

pub mod base;

// Rule implementations
pub mod block_based_kvo;

use crate::config::Config;
use base::LintRule;

/// Get all available rules, configured from `config`
pub fn get_all_rules(config: &Config) -> Vec<Box<dyn LintRule>> {
    vec![Box::new(block_based_kvo::BlockBasedKvoRule::with_configuration(
        config.severity_for(block_based_kvo::DESCRIPTION.identifier),
    ))]
}

/// Get all available rule IDs
pub fn get_all_rule_ids() -> Vec<String> {
    get_all_rules(&Config::default())
        .iter()
        .map(|rule| rule.rule_id().to_string())
        .collect()
}

/// Get rules filtered by enabled IDs
pub fn get_enabled_rules(config: &Config, enabled_ids: Option<&[String]>) -> Vec<Box<dyn LintRule>> {
    let all_rules = get_all_rules(config);

    match enabled_ids {
        Some(ids) => all_rules
            .into_iter()
            .filter(|rule| ids.iter().any(|id| id == rule.rule_id()))
            .collect(),
        None => all_rules,
    }
}
