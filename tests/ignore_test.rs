use quill::error::Error;
use quill::ignore::{IgnoreRules, Polarity};

#[test]
fn test_directory_only_pattern_needs_probe() {
    let rules = IgnoreRules::bundled().unwrap();

    // `build/` only matches paths below the directory
    assert!(rules.classify("build").is_none());
    let rule = rules.classify_dir("build").unwrap();
    assert_eq!(rule.pattern, "build/");
    assert_eq!(rule.owner, "Python.gitignore");
}

#[test]
fn test_nested_files_are_excluded_wholesale() {
    let rules = IgnoreRules::bundled().unwrap();
    assert!(rules.is_excluded("pkg/__pycache__/mod.cpython-39.pyc"));
    assert!(rules.is_excluded("docs/_build/html/index.html"));
    assert!(!rules.is_excluded("pkg/mod.py"));
    assert!(!rules.is_excluded("readme.md"));
}

#[test]
fn test_first_registered_rule_wins() {
    let rules = IgnoreRules::bundled().unwrap();
    let rule = rules.classify_dir(".ipynb_checkpoints").unwrap();
    assert_eq!(rule.pattern, ".ipynb_checkpoints");
    assert_eq!(rule.owner, "Python.gitignore");

    let rule = rules.classify_dir(".vscode").unwrap();
    assert_eq!(rule.owner, "defaults");
}

#[test]
fn test_directory_matches_before_child_probe() {
    let rules = IgnoreRules::bundled().unwrap();
    // `docs/_build/` only matches the child probe; the bare `_build` matches the directory
    let rule = rules.classify_dir("docs/_build").unwrap();
    assert_eq!(rule.pattern, "_build");
    assert_eq!(rule.owner, "defaults");

    let rule = rules.classify_dir(".eggs").unwrap();
    assert_eq!(rule.pattern, ".eggs/");
    assert_eq!(rule.owner, "Python.gitignore");
    assert!(rules.classify(".eggs").is_none());
}

#[test]
fn test_anchored_pattern_only_matches_at_root() {
    let rules = IgnoreRules::bundled().unwrap();
    assert!(rules.classify_dir("site").is_some());
    assert!(rules.classify("docs/site/page.md").is_none());
}

#[test]
fn test_bundled_rules_are_shared() {
    let first = IgnoreRules::bundled().unwrap();
    let second = IgnoreRules::bundled().unwrap();
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_reinclusion_is_recorded_but_never_excludes() {
    let rules = IgnoreRules::with_extra("configuration", "!keep.dat\n*.dat\n").unwrap();
    let include = rules.rules().iter().find(|rule| rule.pattern == "!keep.dat").unwrap();
    assert_eq!(include.polarity, Polarity::Include);
    assert_eq!(include.owner, "configuration");

    let rule = rules.classify("keep.dat").unwrap();
    assert_eq!(rule.pattern, "*.dat");
    assert_eq!(rule.owner, "configuration");
}

#[test]
fn test_malformed_pattern_names_its_owner() {
    match IgnoreRules::from_sources([("broken.gitignore", "ok.txt\nbad[\n")]) {
        Err(Error::IgnorePatternError { owner, pattern, .. }) => {
            assert_eq!(owner, "broken.gitignore");
            assert_eq!(pattern, "bad[");
        }
        other => panic!("Expected IgnorePatternError, got {other:?}"),
    }
}
