//! Dependency discovery from Python sources and notebooks.
//!
//! Every file is scanned for top-level imports on its own; the per-file
//! results are combined with [`merge_all`] as sets.

use crate::error::{Error, Result};
use crate::merge::{merge_all, Node};
use indexmap::IndexMap;
use log::{debug, warn};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static IMPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:from[ \t]+([A-Za-z_][\w.]*)[ \t]+import\b|import[ \t]+([^#\n;]+))")
        .expect("import pattern is valid")
});

static REQUIREMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*").expect("requirement pattern is valid")
});

const STDLIB: &[&str] = &[
    "__future__", "abc", "argparse", "array", "ast", "asyncio", "atexit", "base64", "bisect",
    "builtins", "bz2", "calendar", "cmath", "codecs", "collections", "concurrent",
    "configparser", "contextlib", "contextvars", "copy", "csv", "ctypes", "dataclasses",
    "datetime", "decimal", "difflib", "dis", "doctest", "email", "enum", "errno", "fnmatch",
    "fractions", "functools", "gc", "getpass", "gettext", "glob", "gzip", "hashlib", "heapq",
    "hmac", "html", "http", "importlib", "inspect", "io", "ipaddress", "itertools", "json",
    "keyword", "linecache", "locale", "logging", "lzma", "math", "mimetypes",
    "multiprocessing", "numbers", "operator", "os", "pathlib", "pdb", "pickle", "pkgutil",
    "platform", "pprint", "queue", "random", "re", "reprlib", "secrets", "select", "shlex",
    "shutil", "signal", "site", "socket", "sqlite3", "ssl", "stat", "statistics", "string",
    "struct", "subprocess", "sys", "sysconfig", "tarfile", "tempfile", "textwrap",
    "threading", "time", "timeit", "tkinter", "token", "tokenize", "traceback", "types",
    "typing", "unicodedata", "unittest", "urllib", "uuid", "venv", "warnings", "weakref",
    "xml", "zipfile", "zlib", "zoneinfo",
];

/// Import names whose distribution on PyPI has a different name.
static IMPORT_TO_PYPI: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("sklearn", "scikit-learn"),
        ("skimage", "scikit-image"),
        ("yaml", "pyyaml"),
        ("PIL", "pillow"),
        ("cv2", "opencv-python"),
        ("bs4", "beautifulsoup4"),
        ("dateutil", "python-dateutil"),
        ("dotenv", "python-dotenv"),
        ("jose", "python-jose"),
        ("git", "gitpython"),
        ("serial", "pyserial"),
        ("Crypto", "pycryptodome"),
        ("OpenSSL", "pyopenssl"),
        ("attr", "attrs"),
        ("google", "protobuf"),
        ("magic", "python-magic"),
        ("zmq", "pyzmq"),
        ("mpl_toolkits", "matplotlib"),
        ("IPython", "ipython"),
    ])
});

/// PyPI distributions published under another name on conda-forge.
static PYPI_TO_CONDA: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("torch", "pytorch"),
        ("opencv-python", "opencv"),
        ("tables", "pytables"),
        ("msgpack", "msgpack-python"),
        ("pyzmq", "zeromq"),
    ])
});

/// Top-level module names imported by Python source text.
pub fn imports_from_source(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for captures in IMPORT_PATTERN.captures_iter(source) {
        if let Some(module) = captures.get(1) {
            names.push(top_level(module.as_str()));
        } else if let Some(modules) = captures.get(2) {
            for clause in modules.as_str().trim_end_matches(['(', ')', '\\', ' ']).split(',') {
                let module = clause.split_whitespace().next().unwrap_or_default();
                if !module.is_empty() && !module.starts_with('.') {
                    names.push(top_level(module));
                }
            }
        }
    }
    names
}

fn top_level(module: &str) -> String {
    module.split('.').next().unwrap_or(module).to_string()
}

/// Source text of the code cells of a notebook document.
pub fn notebook_source(notebook: &str) -> Result<String> {
    let document: serde_json::Value = serde_json::from_str(notebook)
        .map_err(|e| Error::FormatError { format: "notebook", reason: e.to_string() })?;
    let cells = document.get("cells").and_then(|cells| cells.as_array());
    let mut source = String::new();
    for cell in cells.into_iter().flatten() {
        if cell.get("cell_type").and_then(|kind| kind.as_str()) != Some("code") {
            continue;
        }
        match cell.get("source") {
            Some(serde_json::Value::Array(lines)) => {
                source.extend(lines.iter().filter_map(|line| line.as_str()));
            }
            Some(serde_json::Value::String(text)) => source.push_str(text),
            _ => {}
        }
        source.push('\n');
    }
    Ok(source)
}

/// Scans one file and returns `{"required": <set of imports>}`.
///
/// Files other than `.py` and `.ipynb` yield an empty set.
pub fn scan_file<P: AsRef<Path>>(path: P) -> Result<Node> {
    let path = path.as_ref();
    let source = match path.extension().and_then(|suffix| suffix.to_str()) {
        Some("py") => fs::read_to_string(path)?,
        Some("ipynb") => notebook_source(&fs::read_to_string(path)?)?,
        _ => String::new(),
    };
    let mut found = IndexMap::new();
    found.insert("required".to_string(), Node::set(imports_from_source(&source)));
    Ok(Node::Mapping(found))
}

/// Imports of all files merged into one sorted list.
///
/// Unreadable or unparseable files are logged and skipped.
pub fn merged_imports(files: &[PathBuf]) -> Result<Vec<String>> {
    let mut scanned = Vec::with_capacity(files.len());
    for file in files {
        match scan_file(file) {
            Ok(node) => scanned.push(node),
            Err(e) => warn!("Skipping imports of '{}': {}", file.display(), e),
        }
    }
    let merged = merge_all(scanned)?;
    let names: Vec<String> = merged
        .get("required")
        .and_then(|required| {
            required.as_items().map(|items| {
                items.iter().filter_map(|item| item.as_str().map(str::to_string)).collect()
            })
        })
        .unwrap_or_default();
    debug!("Found {} imports in {} files", names.len(), files.len());
    Ok(names)
}

pub fn is_stdlib(name: &str) -> bool {
    STDLIB.contains(&name)
}

/// Translates import names to PyPI distribution names.
pub fn import_to_pypi<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Vec<String> {
    names
        .into_iter()
        .map(|name| IMPORT_TO_PYPI.get(name).copied().unwrap_or(name).to_string())
        .collect()
}

/// Translates PyPI distribution names to conda-forge package names.
pub fn pypi_to_conda<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Vec<String> {
    names
        .into_iter()
        .map(|name| PYPI_TO_CONDA.get(name).copied().unwrap_or(name).to_string())
        .collect()
}

/// Names pinned in a `requirements.txt`; a missing file pins nothing.
pub fn requirements_txt<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(|line| REQUIREMENT_PATTERN.find(line).map(|m| m.as_str().to_string()))
        .collect())
}
