use std::fs;
use std::path::Path;

use rayon::prelude::*;
use swift_idiom_linter::{
    collect_swift_files, config, lint_files_parallel, lint_source,
    models::Severity,
    rules::{block_based_kvo::BlockBasedKvoRule, get_all_rules, get_enabled_rules},
    scanner::scan_declarations,
    version::SwiftVersion,
};

const BRACKET_OBSERVER: &str = r#"import Foundation

class Foo: NSObject {
  override func observeValue(forKeyPath keyPath: String?, of object: Any?,
                              change: [NSKeyValueChangeKey : Any]?,
                              context: UnsafeMutableRawPointer?) {}
}
"#;

const GENERIC_OBSERVER: &str = r#"class Bar: NSObject {
  override func observeValue(forKeyPath keyPath: String?, of object: Any?,
                              change: Dictionary<NSKeyValueChangeKey, Any>?,
                              context: UnsafeMutableRawPointer?) {
    super.observeValue(forKeyPath: keyPath, of: object, change: change, context: context)
  }
}
"#;

const CLOSURE_OBSERVER: &str = r#"class Baz {
  var observation: NSKeyValueObservation?

  func start(foo: Foo) {
    observation = foo.observe(\.value, options: [.new]) { (foo, change) in
      print(change.newValue)
    }
  }
}
"#;

const NOT_OVERRIDDEN: &str = r#"class Qux: NSObject {
  func observeValue(forKeyPath keyPath: String?, of object: Any?,
                    change: [NSKeyValueChangeKey : Any]?,
                    context: UnsafeMutableRawPointer?) {}
}
"#;

const WRONG_NAME: &str = r#"class Quux: NSObject {
  override func observeValues(forKeyPath keyPath: String?, of object: Any?,
                              change: [NSKeyValueChangeKey : Any]?,
                              context: UnsafeMutableRawPointer?) {}
}
"#;

fn write_file<P: AsRef<Path>>(path: P, contents: &str) {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent).expect("create parent directories");
    }
    fs::write(path, contents).expect("write test file");
}

#[test]
fn lints_a_project_tree() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    write_file(root.join("Sources/App/Foo.swift"), BRACKET_OBSERVER);
    write_file(root.join("Sources/App/Bar.swift"), GENERIC_OBSERVER);
    write_file(root.join("Sources/App/Baz.swift"), CLOSURE_OBSERVER);
    write_file(root.join("Sources/App/Qux.swift"), NOT_OVERRIDDEN);
    write_file(root.join("Sources/App/Quux.swift"), WRONG_NAME);
    write_file(root.join(".build/checkouts/Dep/Dep.swift"), BRACKET_OBSERVER);

    let (_, exclude) = config::merge_config(None, &[], &[], &[], &[]);
    let mut files = collect_swift_files(&[root.to_string_lossy().to_string()], &exclude);
    files.sort();
    assert_eq!(files.len(), 5);

    let rules = get_all_rules(&config::Config::default());
    let results = lint_files_parallel(&files, &rules, SwiftVersion::FIVE);

    let flagged: Vec<_> = results
        .iter()
        .filter(|r| !r.violations.is_empty())
        .map(|r| Path::new(&r.file_path).file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(flagged, vec!["Bar.swift", "Foo.swift"]);

    for result in results.iter().filter(|r| !r.violations.is_empty()) {
        assert_eq!(result.violations.len(), 1);
        let violation = &result.violations[0];
        assert_eq!(violation.severity, Severity::Warning);
        assert_eq!(violation.location.byte_offset, result.source.find("func").unwrap());
        assert!(result.source_line(result.line_of(violation)).starts_with("override func observeValue"));
    }
}

#[test]
fn configured_severity_reaches_violations() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config_path = temp.path().join(config::CONFIG_FILE_NAME);
    write_file(
        &config_path,
        "swift_version = \"4\"\n\n[rules.block_based_kvo]\nseverity = \"error\"\n",
    );

    let config = config::load_config(Some(&config_path))
        .expect("valid config")
        .expect("config present");
    let rules = get_enabled_rules(&config, None);
    let result = lint_source(
        "Foo.swift",
        BRACKET_OBSERVER.to_string(),
        &rules,
        config.swift_version(),
    );

    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].severity, Severity::Error);
}

#[test]
fn disabled_rule_reports_nothing() {
    let rules = get_enabled_rules(&config::Config::default(), Some(&[]));
    let result = lint_source("Foo.swift", BRACKET_OBSERVER.to_string(), &rules, SwiftVersion::FIVE);
    assert!(result.violations.is_empty());
}

#[test]
fn parallel_evaluation_matches_sequential() {
    let rule = BlockBasedKvoRule::new();
    let sources = [
        BRACKET_OBSERVER,
        GENERIC_OBSERVER,
        CLOSURE_OBSERVER,
        NOT_OVERRIDDEN,
        WRONG_NAME,
    ];
    let declarations: Vec<_> = sources
        .iter()
        .flat_map(|source| scan_declarations(source))
        .collect();

    let sequential: Vec<_> = declarations
        .iter()
        .map(|d| rule.validate("File.swift", d, SwiftVersion::FIVE))
        .collect();
    let parallel: Vec<_> = declarations
        .par_iter()
        .map(|d| rule.validate("File.swift", d, SwiftVersion::FIVE))
        .collect();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.iter().map(Vec::len).sum::<usize>(), 2);
}
