//! block_based_kvo: Block Based KVO
//!
//! Overriding `observeValue(forKeyPath:of:change:context:)` is the old,
//! callback-based way to observe key-value changes. Swift 4 added
//! `observe(_:options:changeHandler:)`, which takes a keypath and a closure.

use crate::declaration::{DeclarationFacts, DeclarationRecord};
use crate::models::{RuleContext, Severity, SeverityConfiguration, Violation};
use crate::rules::base::{LintRule, RuleDescription, RuleKind};
use crate::version::SwiftVersion;

pub static DESCRIPTION: RuleDescription = RuleDescription {
    identifier: "block_based_kvo",
    name: "Block Based KVO",
    description: "Prefer the new block based KVO API with keypaths when using Swift 3.2 or later.",
    kind: RuleKind::Idiomatic,
    non_triggering_examples: &[r#"let observer = foo.observe(\.value, options: [.new]) { (foo, change) in
   print(change.newValue)
}
"#],
    triggering_examples: &[
        r#"class Foo: NSObject {
  override ↓func observeValue(forKeyPath keyPath: String?, of object: Any?,
                              change: [NSKeyValueChangeKey : Any]?,
                              context: UnsafeMutableRawPointer?) {}
}
"#,
        r#"class Foo: NSObject {
  override ↓func observeValue(forKeyPath keyPath: String?, of object: Any?,
                              change: Dictionary<NSKeyValueChangeKey, Any>?,
                              context: UnsafeMutableRawPointer?) {}
}
"#,
    ],
};

const MINIMUM_VERSION: SwiftVersion = SwiftVersion::FOUR;

const OBSERVE_VALUE_SELECTOR: &str = "observeValue(forKeyPath:of:change:context:)";

/// Accepted spellings of `[NSKeyValueChangeKey: Any]?` after whitespace removal
const CHANGE_DICTIONARY_SPELLINGS: &[&str] = &[
    "[NSKeyValueChangeKey:Any]?",
    "Dictionary<NSKeyValueChangeKey,Any>?",
];

/// Whether normalized parameter types match the KVO observation callback
pub fn matches_observation_signature(types: &[String]) -> bool {
    match types {
        [key_path, object, change, context] => {
            key_path == "String?"
                && object == "Any?"
                && CHANGE_DICTIONARY_SPELLINGS.contains(&change.as_str())
                && context == "UnsafeMutableRawPointer?"
        }
        _ => false,
    }
}

pub struct BlockBasedKvoRule {
    configuration: SeverityConfiguration,
}

impl BlockBasedKvoRule {
    pub fn new() -> Self {
        Self::with_configuration(SeverityConfiguration::default())
    }

    pub fn with_configuration(configuration: SeverityConfiguration) -> Self {
        Self { configuration }
    }

    /// Evaluate one declaration, returning at most one violation
    pub fn validate(
        &self,
        file_path: &str,
        record: &DeclarationRecord,
        swift_version: SwiftVersion,
    ) -> Vec<Violation> {
        if !swift_version.supports(MINIMUM_VERSION) {
            return Vec::new();
        }

        let facts = DeclarationFacts::extract(record);
        if !facts.is_instance_method || !facts.has_override || facts.name != OBSERVE_VALUE_SELECTOR {
            return Vec::new();
        }

        if !matches_observation_signature(&facts.param_types) {
            log::trace!(
                "{}: {} has unexpected parameter types {:?}",
                file_path,
                facts.name,
                facts.param_types
            );
            return Vec::new();
        }

        let Some(offset) = facts.offset else {
            log::trace!("{}: {} has no source offset", file_path, facts.name);
            return Vec::new();
        };

        vec![Violation::new(
            DESCRIPTION.identifier,
            DESCRIPTION.description,
            self.configuration.severity,
            file_path,
            offset,
        )]
    }
}

impl Default for BlockBasedKvoRule {
    fn default() -> Self {
        Self::new()
    }
}

impl LintRule for BlockBasedKvoRule {
    fn description(&self) -> &'static RuleDescription {
        &DESCRIPTION
    }

    fn severity(&self) -> Severity {
        self.configuration.severity
    }

    fn minimum_swift_version(&self) -> Option<SwiftVersion> {
        Some(MINIMUM_VERSION)
    }

    fn check(&self, context: &RuleContext) -> Vec<Violation> {
        self.validate(context.file_path, context.declaration, context.swift_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{Attribute, DeclarationKind, ParameterRecord};
    use crate::verify::verify_examples;

    const BRACKET_TYPES: [&str; 4] = [
        "String?",
        "Any?",
        "[NSKeyValueChangeKey : Any]?",
        "UnsafeMutableRawPointer?",
    ];

    fn observe_value(types: &[&str]) -> DeclarationRecord {
        types.iter().fold(
            DeclarationRecord::new(DeclarationKind::InstanceMethod, OBSERVE_VALUE_SELECTOR)
                .with_attribute(Attribute::Override)
                .with_offset(24),
            |record, ty| record.with_parameter(ParameterRecord::value(*ty)),
        )
    }

    fn check(record: &DeclarationRecord) -> Vec<Violation> {
        BlockBasedKvoRule::new().validate("Foo.swift", record, SwiftVersion::FIVE)
    }

    fn normalized(types: &[&str]) -> Vec<String> {
        types
            .iter()
            .map(|t| crate::declaration::normalize_type_name(t))
            .collect()
    }

    #[test]
    fn test_bracket_spelling_triggers() {
        let violations = check(&observe_value(&BRACKET_TYPES));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule_id, "block_based_kvo");
        assert_eq!(violations[0].location.byte_offset, 24);
        assert_eq!(violations[0].location.file, "Foo.swift");
    }

    #[test]
    fn test_generic_spelling_triggers() {
        let record = observe_value(&[
            "String?",
            "Any?",
            "Dictionary<NSKeyValueChangeKey, Any>?",
            "UnsafeMutableRawPointer?",
        ]);
        assert_eq!(check(&record).len(), 1);
    }

    #[test]
    fn test_whitespace_in_types_is_ignored() {
        let record = observe_value(&[
            "String ?",
            " Any?",
            "[ NSKeyValueChangeKey:Any ] ?",
            "UnsafeMutableRawPointer\t?",
        ]);
        assert_eq!(check(&record).len(), 1);
    }

    #[test]
    fn test_wrong_name_does_not_trigger() {
        let mut record = observe_value(&BRACKET_TYPES);
        record.name = "observeValue(forKeyPath:of:change:)".to_string();
        assert!(check(&record).is_empty());

        record.name = "observeValue(forKeyPath:of:change:context:) ".to_string();
        assert!(check(&record).is_empty());
    }

    #[test]
    fn test_missing_override_does_not_trigger() {
        let mut record = observe_value(&BRACKET_TYPES);
        record.attributes.clear();
        record.attributes.insert(Attribute::Objc);
        assert!(check(&record).is_empty());
    }

    #[test]
    fn test_three_parameters_do_not_trigger() {
        let record = observe_value(&BRACKET_TYPES[..3]);
        assert!(check(&record).is_empty());
    }

    #[test]
    fn test_non_value_parameters_are_skipped() {
        let mut record = observe_value(&BRACKET_TYPES);
        record.parameters.insert(0, ParameterRecord::generic("T"));
        assert_eq!(check(&record).len(), 1);
    }

    #[test]
    fn test_other_kinds_do_not_trigger() {
        for kind in [
            DeclarationKind::ClassMethod,
            DeclarationKind::StaticMethod,
            DeclarationKind::FreeFunction,
            DeclarationKind::Other,
        ] {
            let mut record = observe_value(&BRACKET_TYPES);
            record.kind = kind;
            assert!(check(&record).is_empty(), "{:?} should not trigger", kind);
        }
    }

    #[test]
    fn test_missing_offset_abstains() {
        let mut record = observe_value(&BRACKET_TYPES);
        record.offset = None;
        assert!(check(&record).is_empty());
    }

    #[test]
    fn test_below_swift_four_never_triggers() {
        let rule = BlockBasedKvoRule::new();
        let record = observe_value(&BRACKET_TYPES);
        for version in [SwiftVersion::THREE, SwiftVersion::new(3, 2, 0)] {
            assert!(rule.validate("Foo.swift", &record, version).is_empty());
        }
        assert_eq!(rule.validate("Foo.swift", &record, SwiftVersion::FOUR).len(), 1);
    }

    #[test]
    fn test_severity_follows_configuration() {
        let record = observe_value(&BRACKET_TYPES);
        for severity in [Severity::Warning, Severity::Error] {
            let rule = BlockBasedKvoRule::with_configuration(SeverityConfiguration::new(severity));
            let violations = rule.validate("Foo.swift", &record, SwiftVersion::FIVE);
            assert_eq!(violations[0].severity, severity);
        }
    }

    #[test]
    fn test_signature_matcher() {
        assert!(matches_observation_signature(&normalized(&BRACKET_TYPES)));
        assert!(!matches_observation_signature(&[]));
        assert!(!matches_observation_signature(&normalized(&[
            "String",
            "Any?",
            "[NSKeyValueChangeKey:Any]?",
            "UnsafeMutableRawPointer?",
        ])));
        assert!(!matches_observation_signature(&normalized(&[
            "String?",
            "Any?",
            "[String:Any]?",
            "UnsafeMutableRawPointer?",
        ])));
        assert!(!matches_observation_signature(&normalized(&[
            "String?",
            "Any?",
            "[NSKeyValueChangeKey:Any]?",
            "UnsafeMutableRawPointer?",
            "Int",
        ])));
        // spellings outside the accepted set are not treated as equivalent
        assert!(!matches_observation_signature(&normalized(&[
            "String?",
            "Any?",
            "Swift.Dictionary<NSKeyValueChangeKey,Any>?",
            "UnsafeMutableRawPointer?",
        ])));
    }

    #[test]
    fn test_rule_metadata() {
        let rule = BlockBasedKvoRule::new();
        assert_eq!(rule.rule_id(), "block_based_kvo");
        assert_eq!(rule.description().name, "Block Based KVO");
        assert_eq!(rule.description().kind.to_string(), "idiomatic");
        assert_eq!(rule.severity(), Severity::Warning);
        assert_eq!(rule.minimum_swift_version(), Some(SwiftVersion::FOUR));
    }

    #[test]
    fn test_examples() {
        verify_examples(&BlockBasedKvoRule::new()).unwrap();
    }
}
