//! Command-line interface implementation for quill.
//! Provides argument parsing and help text formatting using clap.

use crate::config::{DocsBackend, PythonBackend};
use crate::tasks::Task;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments structure for quill.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "quill: infer project metadata and scaffold its configuration",
    long_about = None
)]
pub struct Args {
    /// Tasks to run; defaults to the configured tasks
    #[arg(value_name = "TASK", value_enum)]
    pub tasks: Vec<Task>,

    /// Project directory
    #[arg(short = 'C', long = "directory", value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Packaging backend, inferred from the project by default
    #[arg(long, value_enum, env = "QUILL_PYTHON")]
    pub python: Option<PythonBackend>,

    /// Documentation backend
    #[arg(long, value_enum, env = "QUILL_DOCS")]
    pub docs: Option<DocsBackend>,

    /// Print the planned files instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompts when overwriting existing files.
    #[arg(long)]
    pub skip_overwrite_check: bool,

    /// Print the inferred metadata as JSON and exit
    #[arg(long)]
    pub show_metadata: bool,

    /// Print the classified project tree as JSON and exit
    #[arg(long)]
    pub show_chapter: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for argument errors
pub fn get_args() -> Args {
    Args::parse()
}
