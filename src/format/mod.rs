//! Loading and dumping configuration files as [`Node`] documents.
//!
//! Formats are looked up in an explicit registration table keyed by file
//! suffix; each one implements the shared [`Format`] capability.

use crate::error::{Error, Result};
use crate::merge::{merge, Node};
use log::debug;
use std::fs;
use std::io;
use std::path::Path;

pub mod ini;
pub mod text;

use self::ini::Ini;
use self::text::Text;

/// Parses and serializes one file format.
pub trait Format: Sync {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Parses file contents.
    fn load(&self, text: &str) -> Result<Node>;

    /// Serializes a document; trailing newlines are normalized by [`dump`].
    fn dump(&self, node: &Node) -> Result<String>;

    /// The document a missing file stands for.
    fn empty(&self) -> Node {
        Node::mapping()
    }
}

pub struct Json;
pub struct Yaml;
pub struct Toml;

impl Format for Json {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn load(&self, text: &str) -> Result<Node> {
        serde_json::from_str(text)
            .map_err(|e| Error::FormatError { format: self.name(), reason: e.to_string() })
    }

    fn dump(&self, node: &Node) -> Result<String> {
        serde_json::to_string_pretty(node)
            .map_err(|e| Error::FormatError { format: self.name(), reason: e.to_string() })
    }
}

impl Format for Yaml {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn load(&self, text: &str) -> Result<Node> {
        let node: Node = serde_yaml::from_str(text)
            .map_err(|e| Error::FormatError { format: self.name(), reason: e.to_string() })?;
        // an empty document loads as null
        Ok(if node == Node::Null { self.empty() } else { node })
    }

    fn dump(&self, node: &Node) -> Result<String> {
        serde_yaml::to_string(node)
            .map_err(|e| Error::FormatError { format: self.name(), reason: e.to_string() })
    }
}

impl Format for Toml {
    fn name(&self) -> &'static str {
        "TOML"
    }

    fn load(&self, text: &str) -> Result<Node> {
        toml::from_str(text)
            .map_err(|e| Error::FormatError { format: self.name(), reason: e.to_string() })
    }

    fn dump(&self, node: &Node) -> Result<String> {
        toml::to_string(node)
            .map_err(|e| Error::FormatError { format: self.name(), reason: e.to_string() })
    }
}

/// Suffix (or dotfile name) to format registrations.
static REGISTRY: &[(&str, &dyn Format)] = &[
    (".json", &Json),
    (".yaml", &Yaml),
    (".yml", &Yaml),
    (".toml", &Toml),
    (".ini", &Ini),
    (".cfg", &Ini),
    (".txt", &Text),
    (".gitignore", &Text),
];

/// Finds the format registered for a path.
///
/// # Errors
/// * `Error::UnsupportedFormatError` if nothing is registered for the suffix
pub fn format_for<P: AsRef<Path>>(path: P) -> Result<&'static dyn Format> {
    let path = path.as_ref();
    let key = match path.extension() {
        Some(suffix) => format!(".{}", suffix.to_string_lossy()),
        None => path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default(),
    };
    REGISTRY
        .iter()
        .find(|(suffix, _)| *suffix == key)
        .map(|(_, format)| *format)
        .ok_or_else(|| Error::UnsupportedFormatError { path: path.to_path_buf() })
}

/// Loads a file, returning the format's empty document when it does not exist.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Node> {
    let path = path.as_ref();
    let format = format_for(path)?;
    match fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => Ok(format.empty()),
        Ok(text) => format.load(&text).inspect_err(|e| {
            debug!("Failed to load '{}': {}", path.display(), e);
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("'{}' does not exist, using an empty document", path.display());
            Ok(format.empty())
        }
        Err(e) => Err(Error::IoError(e)),
    }
}

/// Serializes a document in the format of `path`, ending with exactly one newline.
pub fn dump<P: AsRef<Path>>(path: P, node: &Node) -> Result<String> {
    let text = format_for(path)?.dump(node)?;
    Ok(format!("{}\n", text.trim_end()))
}

/// Serializes a document and writes it to `path`, creating parent directories.
pub fn write<P: AsRef<Path>>(path: P, node: &Node) -> Result<()> {
    let path = path.as_ref();
    let text = dump(path, node)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    fs::write(path, text).map_err(Error::IoError)
}

/// Merges `node` into the existing contents of `path` and writes the result.
pub fn update<P: AsRef<Path>>(path: P, node: Node) -> Result<()> {
    let path = path.as_ref();
    let existing = load(path)?;
    let merged = merge(existing, node)?;
    write(path, &merged)
}
