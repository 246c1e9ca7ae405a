use quill::error::Error;
use quill::format::{dump, load, update, write};
use quill::merge::Node;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_files_load_as_format_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    assert_eq!(load(dir.join("pyproject.toml")).unwrap(), Node::mapping());
    assert_eq!(load(dir.join("mkdocs.yml")).unwrap(), Node::mapping());
    assert_eq!(load(dir.join("requirements.txt")).unwrap(), Node::Sequence(Vec::new()));
    assert!(matches!(load(dir.join("setup.cfg")).unwrap(), Node::Sections(s) if s.is_empty()));
}

#[test]
fn test_unsupported_suffix() {
    let temp_dir = TempDir::new().unwrap();
    assert!(matches!(
        load(temp_dir.path().join("setup.py")),
        Err(Error::UnsupportedFormatError { .. })
    ));
}

#[test]
fn test_write_creates_parents_and_ends_with_newline() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join(".github/workflows/ci.yml");
    write(&target, &Node::from(json!({"name": "ci"}))).unwrap();

    let text = fs::read_to_string(&target).unwrap();
    assert_eq!(text, "name: ci\n");
}

#[test]
fn test_update_toml_keeps_user_values() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("pyproject.toml");
    fs::write(&target, "[project]\nname = \"mine\"\ndependencies = [\"requests\"]\n").unwrap();

    update(
        &target,
        Node::from(json!({"project": {"name": "inferred", "dependencies": ["numpy"]}})),
    )
    .unwrap();

    let project = load(&target).unwrap().get("project").unwrap();
    assert_eq!(project.get("name"), Some(Node::from("mine")));
    assert_eq!(project.get("dependencies"), Some(Node::from(vec!["requests", "numpy"])));
}

#[test]
fn test_update_setup_cfg_creates_sections() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("setup.cfg");
    fs::write(&target, "[metadata]\nname = mine\n").unwrap();

    update(
        &target,
        Node::from(json!({
            "metadata": {"name": "inferred", "version": "0.1.0"},
            "options": {"install_requires": ["numpy", "pandas"]}
        })),
    )
    .unwrap();

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "[metadata]\nname = mine\nversion = 0.1.0\n\n\
         [options]\ninstall_requires =\n    numpy\n    pandas\n"
    );
}

#[test]
fn test_update_setup_cfg_keeps_multiline_values() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("setup.cfg");
    fs::write(&target, "[metadata]\ndescription = first line\n    second line\n").unwrap();

    update(&target, Node::from(json!({"metadata": {"version": "0.1"}}))).unwrap();

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "[metadata]\ndescription = first line\n    second line\nversion = 0.1\n"
    );
    let metadata = load(&target).unwrap().get("metadata").unwrap();
    assert_eq!(metadata.get("description"), Some(Node::from("first line\nsecond line")));
    assert_eq!(metadata.get("version"), Some(Node::from("0.1")));
}

#[test]
fn test_update_gitignore_appends_novel_lines() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join(".gitignore");
    fs::write(&target, "*.py[cod]\nsecrets.txt\n").unwrap();

    update(&target, Node::from(vec!["*.py[cod]", "build"])).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "*.py[cod]\nsecrets.txt\nbuild\n");
}

#[test]
fn test_dump_json() {
    let text = dump("data.json", &Node::from(json!({"a": [1]}))).unwrap();
    assert_eq!(text, "{\n  \"a\": [\n    1\n  ]\n}\n");
}
