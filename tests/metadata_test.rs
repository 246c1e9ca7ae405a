use quill::chapter::walk;
use quill::config::{Config, DocsBackend, PythonBackend};
use quill::error::Error;
use quill::ignore::IgnoreRules;
use quill::metadata::{infer_name, Project};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project(root: &Path) -> Project {
    let chapter = walk(root, IgnoreRules::bundled().unwrap()).unwrap();
    Project::new(chapter, Config::default())
}

fn name_of(files: &[&str]) -> quill::error::Result<String> {
    let temp_dir = TempDir::new().unwrap();
    for file in files {
        write(temp_dir.path(), file, "");
    }
    infer_name(&walk(temp_dir.path(), IgnoreRules::bundled().unwrap()).unwrap())
}

#[test]
fn test_name_inference_order() {
    assert_eq!(name_of(&["src/pkg/__init__.py", "readme.md"]).unwrap(), "pkg");
    assert_eq!(name_of(&["pkg/__init__.py", "docs/index.md", "tests/test_x.py"]).unwrap(), "pkg");
    assert_eq!(name_of(&["single.py", "__init__.py"]).unwrap(), "single");
    assert_eq!(name_of(&["2021-03-04-my-blog.md"]).unwrap(), "my_blog");
    assert_eq!(name_of(&["My Page.md"]).unwrap(), "My Page");
}

#[test]
fn test_name_inference_failures() {
    match name_of(&["a.py", "b.py"]) {
        Err(Error::AmbiguousNameError { candidates }) => assert_eq!(candidates, vec!["a", "b"]),
        other => panic!("Expected AmbiguousNameError, got {other:?}"),
    }
    assert!(matches!(name_of(&["data.csv"]), Err(Error::NameNotInferredError { .. })));
}

#[test]
fn test_flit_module() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "demo.py",
        "\"\"\"A tiny demo.\"\"\"\n__version__ = \"2021.03.04\"\nimport numpy\n",
    );
    write(root, "readme.md", "# demo\n");

    let project = project(root);
    assert_eq!(project.version(), "2021.3.4");
    assert_eq!(project.description(), "A tiny demo.");
    assert!(project.is_flit());
    assert_eq!(project.python_backend(), PythonBackend::Flit);
    assert_eq!(project.docs_backend(), DocsBackend::Jb);
    assert_eq!(project.description_file(), Some("readme.md".to_string()));
    assert_eq!(project.description_content_type(), "text/markdown");
}

#[test]
fn test_calendar_version_without_module_version() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "demo.py", "x = 1\n");

    let project = project(temp_dir.path());
    let expected = chrono::Local::now().format("%Y.%-m.%-d").to_string();
    assert_eq!(project.version(), expected);
    assert!(!project.is_flit());
    assert_eq!(project.python_backend(), PythonBackend::Setuptools);
}

#[test]
fn test_poetry_for_packages_without_docstring() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "pkg/__init__.py", "");
    write(temp_dir.path(), "pkg/core.py", "");
    assert_eq!(project(temp_dir.path()).python_backend(), PythonBackend::Poetry);
}

#[test]
fn test_requires() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "pkg/__init__.py", "import os\nimport yaml\nfrom . import core\n");
    write(root, "pkg/core.py", "import pkg.helpers\nfrom sklearn.linear_model import Ridge\n");
    write(root, "pkg/helpers.py", "import numpy as np\n");
    write(root, "tests/test_core.py", "import pkg\nimport hypothesis\n");
    write(root, "requirements.txt", "# pinned\nrequests>=2.0\n");
    write(
        root,
        "docs/Demo Notebook.ipynb",
        r#"{"cells": [{"cell_type": "code", "source": ["import altair"]}]}"#,
    );

    let project = project(root);
    assert_eq!(project.requires().unwrap(), vec!["numpy", "pyyaml", "requests", "scikit-learn"]);
    assert_eq!(
        project.test_requires().unwrap(),
        vec!["pytest", "pytest-sugar", "nbval", "importnb", "hypothesis"]
    );
    assert_eq!(project.docs_requires().unwrap(), vec!["jupyter-book", "altair"]);
}

#[test]
fn test_git_info() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "demo.py", "");

    let repo = git2::Repository::init(root).unwrap();
    let signature = git2::Signature::now("Ada Lovelace", "ada@example.com").unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("demo.py")).unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[]).unwrap();
    repo.remote("origin", "git@github.com:ada/demo.git").unwrap();

    let info = project(root).git_info();
    assert_eq!(info.author, "Ada Lovelace");
    assert_eq!(info.email, "ada@example.com");
    assert_eq!(info.url, "https://github.com/ada/demo");
}

#[test]
fn test_metadata_without_git() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "my_tool.py", "\"\"\"Tool.\"\"\"\n");
    write(temp_dir.path(), "build/out.txt", "");

    let metadata = project(temp_dir.path()).metadata().unwrap();
    assert_eq!(metadata.name, "my_tool");
    assert_eq!(metadata.distribution, "my-tool");
    assert_eq!(metadata.author, "");
    assert_eq!(metadata.url, "");
    assert_eq!(metadata.exclude, vec!["build"]);
    assert_eq!(metadata.files, vec!["my_tool.py"]);
    assert_eq!(metadata.python_version, "3.9");
}

#[test]
fn test_dot_directories_do_not_name_the_project() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "my_module.py", "");
    write(temp_dir.path(), ".idea/workspace.xml", "");
    write(temp_dir.path(), ".circleci/config.yml", "");

    let project = project(temp_dir.path());
    assert!(project.chapter.chapters.is_empty());
    assert_eq!(infer_name(&project.chapter).unwrap(), "my_module");
    assert_eq!(project.python_backend(), PythonBackend::Setuptools);
}
