//! Common constants used throughout the quill application.

/// Supported configuration file names, tried in order.
pub const CONFIG_FILES: [&str; 3] = ["quill.json", "quill.yml", "quill.yaml"];

/// Files and directories owned by packaging and tooling conventions.
/// They are never reclassified and never recursed into.
pub const CONVENTIONS: &[&str] = &[
    ".doit.db.dat",
    ".doit.db.dir",
    ".doit.db.bak",
    ".pre-commit-config.yaml",
    "pyproject.toml",
    "requirements.txt",
    "setup.cfg",
    "setup.py",
    ".git",
    ".gitignore",
    "docs/_toc.yml",
    "docs/_config.yml",
    "conf.py",
    "conftest.py",
    "noxfile.py",
    "dodo.py",
    "poetry.lock",
    "mkdocs.yml",
    "dist",
    "MANIFEST.in",
    "environment.yml",
    "environment.yaml",
    ".github",
    ".readthedocs.yml",
    "quill.json",
    "quill.yml",
    "quill.yaml",
];

/// Suffixes of files that carry project content.
pub const CONTENT_SUFFIXES: [&str; 4] = ["py", "ipynb", "md", "rst"];

/// Subdirectories that hold supporting material rather than the project itself.
pub const COMMON_CHAPTERS: [&str; 4] = ["docs", "notebooks", "posts", "tests"];

/// Bundled ignore resources as `(owner, contents)` pairs, in registration order.
pub const IGNORE_RESOURCES: [(&str, &str); 4] = [
    ("Python.gitignore", include_str!("../templates/Python.gitignore")),
    ("Nikola.gitignore", include_str!("../templates/Nikola.gitignore")),
    (
        "JupyterNotebooks.gitignore",
        include_str!("../templates/JupyterNotebooks.gitignore"),
    ),
    ("defaults", ".local\n.vscode\n_build\n.gitignore\n.git\n.doit.db*\n.benchmarks\n"),
];

pub const PYPROJECT_TOML: &str = "pyproject.toml";
pub const SETUP_CFG: &str = "setup.cfg";
pub const SETUP_PY: &str = "setup.py";
pub const REQUIREMENTS_TXT: &str = "requirements.txt";
pub const ENVIRONMENT_YAML: &str = "environment.yaml";
pub const PRECOMMIT_CONFIG: &str = ".pre-commit-config.yaml";
pub const GITIGNORE: &str = ".gitignore";
pub const MKDOCS_YML: &str = "mkdocs.yml";
pub const DOCS: &str = "docs";
pub const TOC_YML: &str = "docs/_toc.yml";
pub const BOOK_CONFIG_YML: &str = "docs/_config.yml";
pub const READTHEDOCS_YML: &str = "docs/.readthedocs.yml";
pub const WORKFLOW_YML: &str = ".github/workflows/build_test_release.yml";

/// Bundled configuration templates; each renders to a JSON document.
pub mod templates {
    pub const FLIT: &str = include_str!("../templates/flit.json");
    pub const POETRY: &str = include_str!("../templates/poetry.json");
    pub const SETUPTOOLS_CFG: &str = include_str!("../templates/setuptools_cfg.json");
    pub const SETUPTOOLS_TOML: &str = include_str!("../templates/setuptools_toml.json");
    pub const PYTEST: &str = include_str!("../templates/pytest.json");
    pub const MKDOCS: &str = include_str!("../templates/mkdocs.json");
    pub const BOOK_CONFIG: &str = include_str!("../templates/_config.json");
    pub const READTHEDOCS: &str = include_str!("../templates/readthedocs.json");
    pub const ENVIRONMENT: &str = include_str!("../templates/environment.json");
    pub const WORKFLOW: &str = include_str!("../templates/workflow.json");
    pub const PRECOMMIT: &str = include_str!("../templates/precommit.json");
}
