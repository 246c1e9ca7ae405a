//! Project metadata inferred from a classified tree, its sources and git.

use crate::chapter::{post_slug, Chapter};
use crate::config::{Config, DocsBackend, PythonBackend};
use crate::constants::{COMMON_CHAPTERS, REQUIREMENTS_TXT};
use crate::error::{Error, Result};
use crate::requires::{import_to_pypi, is_stdlib, merged_imports, pypi_to_conda, requirements_txt};
use cruet::Inflector;
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use url::Url;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^__version__\s*=\s*['"]([^'"]+)['"]"#).expect("version pattern is valid")
});

/// Everything templates need to know about a project.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub name: String,
    pub module: String,
    pub distribution: String,
    pub version: String,
    pub url: String,
    pub author: String,
    pub email: String,
    pub classifiers: Vec<String>,
    pub license: String,
    pub description: String,
    pub long_description: String,
    pub description_content_type: String,
    pub keywords: Vec<String>,
    pub platforms: Vec<String>,
    pub python_version: String,
    pub exclude: Vec<String>,
    pub language: String,
    pub files: Vec<String>,
    pub dirs: Vec<String>,
    pub suffixes: Vec<String>,
    pub requires: Vec<String>,
    pub test_requires: Vec<String>,
    pub docs_requires: Vec<String>,
    pub conda_requires: Vec<String>,
    pub python_backend: PythonBackend,
    pub docs_backend: DocsBackend,
}

impl Metadata {
    /// The metadata as a template context.
    pub fn context(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self)
            .map_err(|e| Error::FormatError { format: "JSON", reason: e.to_string() })
    }
}

/// Author and remote of the repository holding the project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitInfo {
    pub author: String,
    pub email: String,
    pub url: String,
}

/// Infers the project name from a chapter.
///
/// Looks at a `src` subchapter, then the only non-common subchapter, then
/// modules, a single post and finally a single page.
///
/// # Errors
/// * `Error::AmbiguousNameError` if several modules could name the project
/// * `Error::NameNotInferredError` if nothing could
pub fn infer_name(chapter: &Chapter) -> Result<String> {
    if let Some(src) = chapter.subchapter("src") {
        return infer_name(src);
    }

    let chapters: Vec<String> = chapter
        .chapters
        .iter()
        .filter_map(Chapter::name)
        .filter(|name| !name.starts_with(['.', '-']))
        .filter(|name| !COMMON_CHAPTERS.contains(&name.as_str()))
        .collect();
    if let [name] = chapters.as_slice() {
        return Ok(name.clone());
    }

    let modules: Vec<String> = chapter
        .modules
        .iter()
        .map(|path| file_stem(path))
        .filter(|stem| !(stem.starts_with("__") && stem.ends_with("__")))
        .collect();
    match modules.as_slice() {
        [name] => return Ok(name.clone()),
        [] => {}
        _ => return Err(Error::AmbiguousNameError { candidates: modules }),
    }

    if let [post] = chapter.posts.as_slice() {
        if let Some(slug) = post_slug(&file_stem(post)) {
            return Ok(slug);
        }
    }

    if let [page] = chapter.pages.as_slice() {
        return Ok(file_stem(page));
    }

    Err(Error::NameNotInferredError { dir: chapter.dir.clone() })
}

/// Strips leading zeros from numeric release segments: `2021.03.04` gives `2021.3.4`.
pub fn normalize_version(version: &str) -> String {
    version
        .trim()
        .split('.')
        .map(|segment| match segment.parse::<u64>() {
            Ok(number) => number.to_string(),
            Err(_) => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// The first line of a module docstring.
pub fn docstring(source: &str) -> Option<String> {
    let body = source
        .lines()
        .skip_while(|line| line.trim().is_empty() || line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    let body = body.trim_start().trim_start_matches(['r', 'R', 'u', 'U']);
    let quote = ["\"\"\"", "'''", "\"", "'"].into_iter().find(|q| body.starts_with(q))?;
    let rest = &body[quote.len()..];
    let text = &rest[..rest.find(quote)?];
    text.lines().map(str::trim).find(|line| !line.is_empty()).map(str::to_string)
}

/// Rewrites a git remote as an https URL without the `.git` suffix.
///
/// `git@github.com:user/repo.git` gives `https://github.com/user/repo`.
pub fn normalize_remote(remote: &str) -> String {
    let remote = remote.trim();
    let candidate = match remote.split_once('@') {
        Some((_, rest)) if !remote.contains("://") => match rest.split_once(':') {
            Some((host, path)) => format!("https://{host}/{path}"),
            None => remote.to_string(),
        },
        _ => remote.to_string(),
    };
    let normalized = match Url::parse(&candidate) {
        Ok(url) if url.host_str().is_some() => {
            format!("https://{}{}", url.host_str().unwrap_or_default(), url.path())
        }
        _ => candidate,
    };
    normalized.trim_end_matches('/').trim_end_matches(".git").to_string()
}

fn file_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A classified project tree together with its configuration.
#[derive(Debug, Clone)]
pub struct Project {
    pub chapter: Chapter,
    pub config: Config,
}

impl Project {
    pub fn new(chapter: Chapter, config: Config) -> Self {
        Self { chapter, config }
    }

    pub fn root(&self) -> &Path {
        &self.chapter.dir
    }

    pub fn name(&self) -> Result<String> {
        infer_name(&self.chapter)
    }

    /// The file defining the project module, if there is one.
    pub fn module_file(&self) -> Option<PathBuf> {
        let name = self.name().ok()?;
        let root = self.root();
        [
            root.join("src").join(&name).join("__init__.py"),
            root.join(&name).join("__init__.py"),
            root.join("src").join(format!("{name}.py")),
            root.join(format!("{name}.py")),
        ]
        .into_iter()
        .find(|path| path.is_file())
    }

    fn module_source(&self) -> Option<String> {
        let path = self.module_file()?;
        match fs::read_to_string(&path) {
            Ok(source) => Some(source),
            Err(e) => {
                debug!("Cannot read '{}': {}", path.display(), e);
                None
            }
        }
    }

    /// `__version__` of the module, else today's calendar version; normalized.
    pub fn version(&self) -> String {
        let version = self
            .module_source()
            .and_then(|source| {
                VERSION_PATTERN.captures(&source).map(|captures| captures[1].to_string())
            })
            .unwrap_or_else(|| chrono::Local::now().format("%Y.%m.%d").to_string());
        normalize_version(&version)
    }

    pub fn description(&self) -> String {
        self.module_source().and_then(|source| docstring(&source)).unwrap_or_default()
    }

    /// Whether the module carries the docstring and version flit reads.
    pub fn is_flit(&self) -> bool {
        self.module_source().is_some_and(|source| {
            docstring(&source).is_some() && VERSION_PATTERN.is_match(&source)
        })
    }

    pub fn python_backend(&self) -> PythonBackend {
        match self.config.python {
            PythonBackend::Infer if self.is_flit() => PythonBackend::Flit,
            PythonBackend::Infer if !self.chapter.chapters.is_empty() => PythonBackend::Poetry,
            PythonBackend::Infer => PythonBackend::Setuptools,
            backend => backend,
        }
    }

    pub fn docs_backend(&self) -> DocsBackend {
        match self.config.docs {
            DocsBackend::Infer => DocsBackend::Jb,
            backend => backend,
        }
    }

    /// Author and email of the head commit and the `origin` remote.
    /// Missing repositories, commits or remotes give empty values.
    pub fn git_info(&self) -> GitInfo {
        let repo = match git2::Repository::discover(self.root()) {
            Ok(repo) => repo,
            Err(e) => {
                debug!("No git repository for '{}': {}", self.root().display(), e);
                return GitInfo::default();
            }
        };

        let mut info = GitInfo::default();
        match repo.head().and_then(|head| head.peel_to_commit()) {
            Ok(commit) => {
                let author = commit.author();
                info.author = author.name().unwrap_or_default().to_string();
                info.email = author.email().unwrap_or_default().to_string();
            }
            Err(e) => debug!("No head commit: {}", e),
        }
        match repo.find_remote("origin") {
            Ok(remote) => info.url = remote.url().map(normalize_remote).unwrap_or_default(),
            Err(e) => debug!("No origin remote: {}", e),
        }
        info
    }

    /// Root-relative path of the readme or index file.
    pub fn description_file(&self) -> Option<String> {
        self.chapter
            .index
            .as_deref()
            .filter(|index| matches!(file_stem(index).to_lowercase().as_str(), "readme" | "index"))
            .map(|index| relative(self.root(), index))
    }

    pub fn description_content_type(&self) -> &'static str {
        let suffix = self.description_file().and_then(|file| {
            Path::new(&file).extension().map(|s| s.to_string_lossy().to_lowercase())
        });
        match suffix.as_deref() {
            Some("md") => "text/markdown",
            Some("rst") => "text/x-rst",
            _ => "text/plain",
        }
    }

    /// Patterns that excluded something, without the directory slash.
    pub fn exclude(&self) -> Vec<String> {
        let patterns: BTreeSet<String> = self
            .chapter
            .exclude_patterns()
            .into_iter()
            .map(|pattern| pattern.strip_suffix('/').map(str::to_string).unwrap_or(pattern))
            .collect();
        patterns.into_iter().collect()
    }

    /// Names defined by the project itself.
    fn local_names(&self) -> BTreeSet<String> {
        fn collect(chapter: &Chapter, names: &mut BTreeSet<String>) {
            names.extend(chapter.name());
            names.extend(chapter.modules.iter().chain(&chapter.tests).map(|p| file_stem(p)));
            for sub in &chapter.chapters {
                collect(sub, names);
            }
        }
        let mut names = BTreeSet::from(["src".to_string()]);
        collect(&self.chapter, &mut names);
        names.extend(self.name().ok());
        names
    }

    /// Third-party distributions imported by `files`.
    fn requires_from_files(&self, files: &[PathBuf]) -> Result<Vec<String>> {
        let local = self.local_names();
        let imports = merged_imports(files)?;
        let third_party = imports.iter().map(String::as_str).filter(|name| {
            !is_stdlib(name)
                && !local.contains(*name)
                && name.chars().next().is_some_and(char::is_alphabetic)
        });
        Ok(import_to_pypi(third_party))
    }

    /// Imported distributions of the content files and names pinned in
    /// `requirements.txt`, sorted.
    pub fn requires(&self) -> Result<Vec<String>> {
        let mut requires: BTreeSet<String> =
            self.requires_from_files(&self.chapter.content_files())?.into_iter().collect();
        requires.extend(requirements_txt(self.root().join(REQUIREMENTS_TXT))?);
        if let Ok(name) = self.name() {
            requires.remove(&name);
        }
        Ok(requires.into_iter().collect())
    }

    pub fn test_requires(&self) -> Result<Vec<String>> {
        let mut requires = vec!["pytest".to_string(), "pytest-sugar".to_string()];
        if self.chapter.suffixes().iter().any(|suffix| suffix == ".ipynb") {
            requires.extend(["nbval".to_string(), "importnb".to_string()]);
        }
        requires.extend(self.requires_from_files(&self.chapter.test_files())?);
        Ok(unique(requires))
    }

    pub fn docs_requires(&self) -> Result<Vec<String>> {
        let mut requires: Vec<String> = match self.docs_backend() {
            DocsBackend::Mkdocs => vec!["mkdocs".into(), "mkdocs-material".into()],
            DocsBackend::Sphinx => vec!["sphinx".into()],
            DocsBackend::Jb | DocsBackend::Infer => vec!["jupyter-book".into()],
        };
        requires.extend(self.requires_from_files(&self.chapter.doc_files())?);
        Ok(unique(requires))
    }

    /// Infers the complete metadata.
    ///
    /// # Errors
    /// * Name inference errors and I/O errors while scanning imports
    pub fn metadata(&self) -> Result<Metadata> {
        let name = self.name()?;
        let git = self.git_info();
        let root = self.root();

        let all_files = self.chapter.all_files();
        let mut files: Vec<String> = all_files.iter().map(|f| relative(root, f)).collect();
        files.sort();
        let dirs: BTreeSet<String> = all_files
            .iter()
            .filter_map(|f| f.parent())
            .map(|dir| relative(root, dir))
            .collect();

        let requires = self.requires()?;
        let conda_requires = pypi_to_conda(requires.iter().map(String::as_str));

        Ok(Metadata {
            module: name.clone(),
            distribution: name.to_kebab_case(),
            version: self.version(),
            url: git.url,
            author: git.author,
            email: git.email,
            classifiers: self.config.classifiers.clone(),
            license: self.config.license.clone(),
            description: self.description(),
            long_description: self.description_file().unwrap_or_default(),
            description_content_type: self.description_content_type().to_string(),
            keywords: self.config.keywords.clone(),
            platforms: Vec::new(),
            python_version: self.config.python_version.clone(),
            exclude: self.exclude(),
            language: "en".to_string(),
            files,
            dirs: dirs.into_iter().collect(),
            suffixes: self.chapter.suffixes(),
            test_requires: self.test_requires()?,
            docs_requires: self.docs_requires()?,
            requires,
            conda_requires,
            python_backend: self.python_backend(),
            docs_backend: self.docs_backend(),
            name,
        })
    }
}

fn unique(values: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values.into_iter().filter(|value| seen.insert(value.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_version() {
        assert_eq!(normalize_version("2021.03.04"), "2021.3.4");
        assert_eq!(normalize_version("0.1.0rc1"), "0.1.0rc1");
        assert_eq!(normalize_version("1.00.2"), "1.0.2");
    }

    #[test]
    fn test_docstring() {
        let source =
            "# header\n\n\"\"\"A tiny package.\n\nMore words.\n\"\"\"\n__version__ = '0.1'\n";
        assert_eq!(docstring(source), Some("A tiny package.".to_string()));
        assert_eq!(docstring("import os\n"), None);
    }

    #[test]
    fn test_normalize_remote() {
        assert_eq!(
            normalize_remote("git@github.com:deathbeds/quill.git"),
            "https://github.com/deathbeds/quill"
        );
        assert_eq!(
            normalize_remote("https://github.com/deathbeds/quill.git"),
            "https://github.com/deathbeds/quill"
        );
        assert_eq!(
            normalize_remote("ssh://git@gitlab.com/group/project.git"),
            "https://gitlab.com/group/project"
        );
    }
}
