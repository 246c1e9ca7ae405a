//! quill infers the metadata of an existing Python project from its layout
//! and generates the configuration files it is missing.

/// Recursive classification of a project tree into chapters
pub mod chapter;

/// Command-line interface module for the quill application
pub mod cli;

/// Project configuration
/// Supports JSON and YAML formats (quill.json, quill.yml, quill.yaml)
pub mod config;

pub mod constants;

/// Error types and handling for the quill application
pub mod error;

/// Loading, dumping and updating configuration files by suffix
pub mod format;

/// Gitignore-style exclusion rules
pub mod ignore;

pub mod logger;

/// Structural merge of documents
pub mod merge;

/// Name, version, author and requirement inference
pub mod metadata;

/// User input and interaction handling
pub mod prompt;

/// Template rendering functionality
pub mod renderer;

/// Import scanning and package name translation
pub mod requires;

/// The file-producing tasks
pub mod tasks;
