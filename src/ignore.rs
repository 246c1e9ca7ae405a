//! File and directory ignore pattern handling.
//! Compiles gitignore-style pattern sets and classifies project paths
//! as excluded or included.

use crate::constants::IGNORE_RESOURCES;
use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log::debug;
use serde::Serialize;
use std::sync::OnceLock;

/// Whether a rule excludes a path or re-includes it (`!pattern`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Exclude,
    Include,
}

/// A single gitignore pattern and the source that contributed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoreRule {
    pub pattern: String,
    pub polarity: Polarity,
    pub owner: String,
}

/// An ordered set of compiled ignore rules.
#[derive(Debug)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
    globs: GlobSet,
    /// Index into `rules` for every glob compiled into `globs`.
    glob_rules: Vec<usize>,
}

/// Translates one gitignore line into globs matching the same paths.
///
/// Returns `None` for blank lines and comments. Directory-only patterns
/// (`build/`) only match paths below the directory, never the bare
/// directory name, so callers probe directories with a child path.
fn translate(line: &str) -> Option<(Polarity, Vec<String>)> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (polarity, body) = match line.strip_prefix('!') {
        Some(rest) => (Polarity::Include, rest),
        None => (Polarity::Exclude, line),
    };
    let body = body.strip_prefix('\\').unwrap_or(body);
    let (dir_only, body) = match body.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    if body.is_empty() {
        return None;
    }

    let anchored = body.contains('/');
    let body = body.trim_start_matches('/');
    let base = if anchored || body.starts_with("**") {
        body.to_string()
    } else {
        format!("**/{body}")
    };

    let globs = if dir_only {
        vec![format!("{base}/**")]
    } else {
        vec![format!("{base}/**"), base]
    };
    Some((polarity, globs))
}

impl IgnoreRules {
    /// Compiles rules from `(owner, contents)` sources in registration order.
    ///
    /// # Errors
    /// * `Error::IgnorePatternError` for the first pattern that does not compile
    pub fn from_sources<'a, I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut rules = Vec::new();
        let mut glob_rules = Vec::new();

        for (owner, contents) in sources {
            for line in contents.lines() {
                let Some((polarity, globs)) = translate(line) else {
                    continue;
                };
                let pattern = line.trim_end().to_string();
                for glob in globs {
                    let glob = GlobBuilder::new(&glob).literal_separator(true).build().map_err(
                        |e| Error::IgnorePatternError {
                            owner: owner.to_string(),
                            pattern: pattern.clone(),
                            reason: e.kind().to_string(),
                        },
                    )?;
                    builder.add(glob);
                    glob_rules.push(rules.len());
                }
                rules.push(IgnoreRule { pattern, polarity, owner: owner.to_string() });
            }
        }

        let globs = builder.build().map_err(|e| Error::IgnorePatternError {
            owner: "rule set".to_string(),
            pattern: String::new(),
            reason: e.to_string(),
        })?;
        debug!("Compiled {} ignore rules", rules.len());

        Ok(Self { rules, globs, glob_rules })
    }

    /// Returns the process-wide rules compiled from the bundled resources.
    ///
    /// The set is built on first use and never changes afterwards.
    pub fn bundled() -> Result<&'static IgnoreRules> {
        static BUNDLED: OnceLock<IgnoreRules> = OnceLock::new();
        if let Some(rules) = BUNDLED.get() {
            return Ok(rules);
        }
        let rules = Self::from_sources(IGNORE_RESOURCES)?;
        Ok(BUNDLED.get_or_init(|| rules))
    }

    /// Compiles the bundled resources followed by one extra source.
    pub fn with_extra(owner: &str, contents: &str) -> Result<Self> {
        Self::from_sources(IGNORE_RESOURCES.into_iter().chain([(owner, contents)]))
    }

    /// All rules in registration order, re-inclusion rules included.
    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    /// Returns the first exclude rule matching a root-relative path.
    pub fn classify(&self, path: &str) -> Option<&IgnoreRule> {
        self.globs
            .matches(path)
            .into_iter()
            .map(|glob| self.glob_rules[glob])
            .filter(|&rule| self.rules[rule].polarity == Polarity::Exclude)
            .min()
            .map(|rule| &self.rules[rule])
    }

    /// Classifies a directory: the path itself first, then a synthetic
    /// `<dir>/.tmp` child so directory-only patterns apply.
    pub fn classify_dir(&self, path: &str) -> Option<&IgnoreRule> {
        self.classify(path)
            .or_else(|| self.classify(&format!("{}/.tmp", path.trim_end_matches('/'))))
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.classify(path).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_skips_blank_and_comments() {
        assert!(translate("").is_none());
        assert!(translate("   ").is_none());
        assert!(translate("# comment").is_none());
    }

    #[test]
    fn test_translate_directory_only() {
        let (polarity, globs) = translate("build/").unwrap();
        assert_eq!(polarity, Polarity::Exclude);
        assert_eq!(globs, vec!["**/build/**".to_string()]);
    }

    #[test]
    fn test_translate_anchored_and_negated() {
        let (_, globs) = translate("/site").unwrap();
        assert_eq!(globs, vec!["site/**".to_string(), "site".to_string()]);

        let (polarity, globs) = translate("!keep.py").unwrap();
        assert_eq!(polarity, Polarity::Include);
        assert_eq!(globs, vec!["**/keep.py/**".to_string(), "**/keep.py".to_string()]);
    }

    #[test]
    fn test_translate_escaped_hash() {
        let (_, globs) = translate("\\#notes").unwrap();
        assert_eq!(globs[1], "**/#notes");
    }
}
