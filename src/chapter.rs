//! Recursive classification of a project tree.
//!
//! A [`Chapter`] describes one directory level: every direct child lands in
//! exactly one bucket, the exclude list, or a nested chapter.

use crate::constants::{CONTENT_SUFFIXES, CONVENTIONS};
use crate::error::Result;
use crate::ignore::IgnoreRules;
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static POST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}-(.+)$").expect("post pattern is valid")
});

const KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// A path excluded by an ignore rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub path: PathBuf,
    pub pattern: String,
    pub owner: String,
}

/// Classified contents of one directory and its subdirectories.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Chapter {
    pub dir: PathBuf,
    pub index: Option<PathBuf>,
    pub posts: Vec<PathBuf>,
    pub pages: Vec<PathBuf>,
    pub modules: Vec<PathBuf>,
    pub tests: Vec<PathBuf>,
    pub hidden: Vec<PathBuf>,
    pub other: Vec<PathBuf>,
    pub conventions: Vec<PathBuf>,
    pub excluded: Vec<Exclusion>,
    pub chapters: Vec<Chapter>,
}

/// Returns the slug of a dated post stem with dashes mapped to underscores,
/// e.g. `2021-03-04-my-blog` gives `my_blog`.
pub fn post_slug(stem: &str) -> Option<String> {
    POST_PATTERN
        .captures(stem)
        .and_then(|captures| captures.get(1))
        .map(|slug| slug.as_str().replace('-', "_"))
}

/// Whether a file stem is usable as a module name.
pub fn is_identifier(stem: &str) -> bool {
    let mut chars = stem.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&stem)
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn file_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Classifies `directory` and everything below it.
///
/// # Errors
/// * I/O errors reading a directory are returned unchanged
pub fn walk<P: AsRef<Path>>(directory: P, rules: &IgnoreRules) -> Result<Chapter> {
    let root = directory.as_ref();
    walk_dir(root, root, rules)
}

fn walk_dir(root: &Path, dir: &Path, rules: &IgnoreRules) -> Result<Chapter> {
    debug!("Classifying '{}'", dir.display());
    let mut chapter = Chapter { dir: dir.to_path_buf(), ..Chapter::default() };
    let mut index_candidates = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path().to_path_buf();
        let name = entry.file_name().to_string_lossy().into_owned();
        let local = relative(root, &path);

        if CONVENTIONS.contains(&name.as_str()) || CONVENTIONS.contains(&local.as_str()) {
            chapter.conventions.push(path);
            continue;
        }

        if entry.file_type().is_dir() {
            match rules.classify_dir(&local) {
                Some(rule) => chapter.excluded.push(Exclusion {
                    path,
                    pattern: rule.pattern.clone(),
                    owner: rule.owner.clone(),
                }),
                None if name.starts_with('.') => chapter.hidden.push(path),
                None => chapter.chapters.push(walk_dir(root, &path, rules)?),
            }
            continue;
        }

        let stem = file_stem(&path);
        if stem.starts_with('_') {
            if stem.len() > 1 && stem.ends_with('_') {
                chapter.modules.push(path);
            } else {
                chapter.hidden.push(path);
            }
            continue;
        }
        if stem.starts_with('.') {
            chapter.hidden.push(path);
            continue;
        }

        if let Some(rule) = rules.classify(&local) {
            chapter.excluded.push(Exclusion {
                path,
                pattern: rule.pattern.clone(),
                owner: rule.owner.clone(),
            });
            continue;
        }

        let suffix = path.extension().map(|s| s.to_string_lossy().into_owned());
        if !suffix.is_some_and(|suffix| CONTENT_SUFFIXES.contains(&suffix.as_str())) {
            chapter.other.push(path);
        } else if matches!(stem.to_lowercase().as_str(), "readme" | "index") {
            index_candidates.push(path);
        } else if POST_PATTERN.is_match(&stem) {
            chapter.posts.push(path);
        } else if is_identifier(&stem) {
            if stem.starts_with("test_") {
                chapter.tests.push(path);
            } else {
                chapter.modules.push(path);
            }
        } else {
            chapter.pages.push(path);
        }
    }

    index_candidates.sort();
    chapter.index = index_candidates.pop();
    if !index_candidates.is_empty() {
        warn!(
            "Several index files in '{}', using '{}'",
            dir.display(),
            chapter.index.as_deref().unwrap_or(dir).display()
        );
        chapter.pages.extend(index_candidates);
    }

    chapter.posts.sort_by(|a, b| b.cmp(a));
    chapter.pages.sort();
    chapter.modules.sort();
    chapter.tests.sort();
    chapter.hidden.sort();
    chapter.other.sort();
    chapter.conventions.sort();
    chapter.excluded.sort_by(|a, b| a.path.cmp(&b.path));
    chapter.chapters.sort_by(|a, b| a.dir.cmp(&b.dir));

    Ok(chapter)
}

impl Chapter {
    /// The directory name of the chapter.
    pub fn name(&self) -> Option<String> {
        self.dir.file_name().map(|s| s.to_string_lossy().into_owned())
    }

    /// The direct subchapter with the given directory name.
    pub fn subchapter(&self, name: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.name().as_deref() == Some(name))
    }

    /// Every direct child of the chapter directory, whatever its bucket.
    pub fn entries(&self) -> Vec<&Path> {
        self.index
            .iter()
            .chain(&self.posts)
            .chain(&self.pages)
            .chain(&self.modules)
            .chain(&self.tests)
            .chain(&self.hidden)
            .chain(&self.other)
            .chain(&self.conventions)
            .map(PathBuf::as_path)
            .chain(self.excluded.iter().map(|e| e.path.as_path()))
            .chain(self.chapters.iter().map(|c| c.dir.as_path()))
            .collect()
    }

    /// Content files: indexes, posts, pages, modules, tests and other files,
    /// recursively.
    pub fn all_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .index
            .iter()
            .chain(&self.posts)
            .chain(&self.pages)
            .chain(&self.modules)
            .chain(&self.tests)
            .chain(&self.other)
            .cloned()
            .collect();
        for chapter in &self.chapters {
            files.extend(chapter.all_files());
        }
        files
    }

    /// Source modules, recursively.
    pub fn content_files(&self) -> Vec<PathBuf> {
        let mut files = self.modules.clone();
        for chapter in &self.chapters {
            files.extend(chapter.content_files());
        }
        files
    }

    /// Test files, recursively, sorted and unique.
    pub fn test_files(&self) -> Vec<PathBuf> {
        let mut files = BTreeSet::new();
        self.collect_tests(&mut files);
        files.into_iter().collect()
    }

    fn collect_tests(&self, files: &mut BTreeSet<PathBuf>) {
        files.extend(self.tests.iter().cloned());
        for chapter in &self.chapters {
            chapter.collect_tests(files);
        }
    }

    /// Documentation files: indexes, pages and posts, recursively.
    pub fn doc_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> =
            self.index.iter().chain(&self.pages).chain(&self.posts).cloned().collect();
        for chapter in &self.chapters {
            files.extend(chapter.doc_files());
        }
        files
    }

    /// Sorted unique suffixes (with the leading dot) of all files and conventions.
    pub fn suffixes(&self) -> Vec<String> {
        let mut suffixes = BTreeSet::new();
        self.collect_suffixes(&mut suffixes);
        suffixes.into_iter().collect()
    }

    fn collect_suffixes(&self, suffixes: &mut BTreeSet<String>) {
        let files = self
            .index
            .iter()
            .chain(&self.posts)
            .chain(&self.pages)
            .chain(&self.modules)
            .chain(&self.tests)
            .chain(&self.other)
            .chain(&self.conventions);
        for file in files {
            if let Some(suffix) = file.extension() {
                suffixes.insert(format!(".{}", suffix.to_string_lossy()));
            }
        }
        for chapter in &self.chapters {
            chapter.collect_suffixes(suffixes);
        }
    }

    /// Sorted unique patterns that excluded something anywhere in the tree.
    pub fn exclude_patterns(&self) -> Vec<String> {
        let mut patterns = BTreeSet::new();
        self.collect_patterns(&mut patterns);
        patterns.into_iter().collect()
    }

    fn collect_patterns(&self, patterns: &mut BTreeSet<String>) {
        patterns.extend(self.excluded.iter().map(|e| e.pattern.clone()));
        for chapter in &self.chapters {
            chapter.collect_patterns(patterns);
        }
    }
}
