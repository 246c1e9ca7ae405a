//! Error handling for the quill application.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while classifying, merging or generating files.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations.
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// An ignore pattern from a bundled or configured source could not be compiled.
    #[error("Invalid ignore pattern '{pattern}' in {owner}: {reason}")]
    IgnorePatternError { owner: String, pattern: String, reason: String },

    /// More than one candidate could name the project.
    #[error("Cannot determine project name, candidates: {}", candidates.join(", "))]
    AmbiguousNameError { candidates: Vec<String> },

    /// No candidate could name the project.
    #[error("Cannot determine project name from '{dir}'")]
    NameNotInferredError { dir: PathBuf },

    /// A table of contents needs an index file and none was classified.
    #[error("No index file found in '{dir}'")]
    MissingIndexError { dir: PathBuf },

    /// Two values with incompatible shapes were merged.
    #[error("Cannot merge {right} into {left}")]
    MergeTypeConflict { left: &'static str, right: &'static str },

    /// A document could not be parsed or serialized.
    #[error("{format} error: {reason}")]
    FormatError { format: &'static str, reason: String },

    /// No format is registered for the file.
    #[error("Unsupported file format: '{path}'")]
    UnsupportedFormatError { path: PathBuf },

    /// Represents errors that occur during configuration parsing or processing.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Represents errors that occur during template rendering.
    #[error("Template error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// Represents errors reading the project's git repository.
    #[error("Git error: {0}")]
    Git2Error(#[from] git2::Error),

    /// Represents errors raised by interactive prompts.
    #[error("Prompt error: {0}")]
    PromptError(#[from] dialoguer::Error),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::IoError(err.into())
    }
}

/// Convenience type alias for results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
