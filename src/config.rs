//! Project configuration for quill.
//! Settings are read from an optional `quill.json`, `quill.yml` or `quill.yaml`
//! in the project root; command-line flags override them.

use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};
use crate::tasks::Task;
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Packaging backend used for `pyproject.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PythonBackend {
    /// Pick flit, poetry or setuptools from the project layout
    #[default]
    Infer,
    Flit,
    Poetry,
    Setuptools,
}

/// Documentation tool the generated configuration targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocsBackend {
    /// Jupyter Book unless configured otherwise
    #[default]
    Infer,
    Jb,
    Mkdocs,
    Sphinx,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub python: PythonBackend,
    pub docs: DocsBackend,
    pub python_version: String,
    pub license: String,
    pub keywords: Vec<String>,
    pub classifiers: Vec<String>,
    /// Extra gitignore-style patterns applied after the bundled ones.
    pub ignore: Vec<String>,
    /// Tasks to run when none are given on the command line.
    pub tasks: Vec<Task>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            python: PythonBackend::Infer,
            docs: DocsBackend::Infer,
            python_version: "3.9".to_string(),
            license: String::new(),
            keywords: Vec::new(),
            classifiers: Vec::new(),
            ignore: Vec::new(),
            tasks: vec![Task::Python, Task::Lint, Task::Docs],
        }
    }
}

/// Loads the first configuration file found in `project_dir`.
///
/// # Returns
/// * `Result<Option<String>>` - Contents of the file, `None` if there is none
pub fn load_config<P: AsRef<Path>>(
    project_dir: P,
    config_files: &[&str],
) -> Result<Option<String>> {
    for file in config_files {
        let config_path = project_dir.as_ref().join(file);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            return Ok(Some(std::fs::read_to_string(&config_path).map_err(Error::IoError)?));
        }
    }
    Ok(None)
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor YAML
pub fn parse_config(content: &str) -> Result<Config> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) if content.trim().is_empty() => Ok(Config::default()),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

/// Returns the project configuration, defaults when no file exists.
pub fn get_config<P: AsRef<Path>>(project_dir: P) -> Result<Config> {
    match load_config(project_dir, &CONFIG_FILES)? {
        Some(content) => parse_config(&content),
        None => Ok(Config::default()),
    }
}
