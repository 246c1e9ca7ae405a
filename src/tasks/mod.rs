//! File-producing tasks.
//!
//! Tasks never touch the filesystem while planning: each one returns the
//! [`Action`]s it wants, and [`Action::apply`] performs them afterwards.

use crate::error::{Error, Result};
use crate::format;
use crate::merge::{merge, Node};
use crate::metadata::{Metadata, Project};
use crate::renderer::TemplateRenderer;
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub mod docs;
pub mod env;
pub mod lint;
pub mod python;

/// A named unit of generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    /// Documentation configuration and table of contents
    Docs,
    /// Pre-commit hooks
    Lint,
    /// pyproject.toml (and setup.cfg for setuptools)
    Python,
    /// A minimal setup.py shim
    SetupPy,
    /// requirements.txt
    Requirements,
    /// Conda environment file
    Conda,
    /// .gitignore entries for excluded paths
    Gitignore,
    /// GitHub Actions workflow
    Ci,
    /// Read the Docs configuration
    Readthedocs,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{self:?}"),
        }
    }
}

/// What to do with a target file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    /// Replace the file with the document.
    Write(Node),
    /// Merge the document into the existing file.
    Update(Node),
    /// Create the file with the given text unless it exists.
    Create(String),
}

/// A planned change to one file.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub task: Task,
    pub target: PathBuf,
    pub operation: FileOperation,
}

impl Action {
    pub fn write<P: AsRef<Path>>(task: Task, target: P, node: Node) -> Self {
        Self { task, target: target.as_ref().to_path_buf(), operation: FileOperation::Write(node) }
    }

    pub fn update<P: AsRef<Path>>(task: Task, target: P, node: Node) -> Self {
        Self { task, target: target.as_ref().to_path_buf(), operation: FileOperation::Update(node) }
    }

    pub fn create<P: AsRef<Path>>(task: Task, target: P, text: String) -> Self {
        Self { task, target: target.as_ref().to_path_buf(), operation: FileOperation::Create(text) }
    }

    /// Verb printed for the action.
    pub fn label(&self) -> &'static str {
        match self.operation {
            FileOperation::Write(_) => "Writing",
            FileOperation::Update(_) => "Updating",
            FileOperation::Create(_) => "Creating",
        }
    }

    /// Whether applying the action replaces content that already exists.
    pub fn overwrites(&self) -> bool {
        matches!(self.operation, FileOperation::Write(_)) && self.target.exists()
    }

    /// The text the target holds after the action, `None` when nothing changes.
    ///
    /// # Errors
    /// * Format errors loading or dumping the target
    /// * `Error::MergeTypeConflict` if an update clashes with the existing file
    pub fn render(&self) -> Result<Option<String>> {
        match &self.operation {
            FileOperation::Write(node) => format::dump(&self.target, node).map(Some),
            FileOperation::Update(node) => {
                let existing = format::load(&self.target)?;
                format::dump(&self.target, &merge(existing, node.clone())?).map(Some)
            }
            FileOperation::Create(_) if self.target.exists() => Ok(None),
            FileOperation::Create(text) => Ok(Some(text.clone())),
        }
    }

    /// Performs the action; returns whether the target was written.
    pub fn apply(&self) -> Result<bool> {
        let Some(text) = self.render()? else {
            debug!("'{}' exists, leaving it alone", self.target.display());
            return Ok(false);
        };
        if let Some(parent) = self.target.parent() {
            fs::create_dir_all(parent).map_err(Error::IoError)?;
        }
        fs::write(&self.target, text).map_err(Error::IoError)?;
        Ok(true)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}'", self.label(), self.target.display())
    }
}

/// Shared inputs of every task.
pub struct TaskContext<'a> {
    pub project: &'a Project,
    pub metadata: &'a Metadata,
    context: serde_json::Value,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> TaskContext<'a> {
    pub fn new(
        project: &'a Project,
        metadata: &'a Metadata,
        renderer: &'a dyn TemplateRenderer,
    ) -> Result<Self> {
        Ok(Self { project, metadata, context: metadata.context()?, renderer })
    }

    pub fn root(&self) -> &Path {
        self.project.root()
    }

    /// Renders a bundled template against the metadata.
    pub fn render(&self, template: &str) -> Result<Node> {
        self.renderer.render_document(template, &self.context)
    }
}

/// Plans the actions of `tasks`, in order, each task at most once.
pub fn plan(tasks: &[Task], ctx: &TaskContext) -> Result<Vec<Action>> {
    let mut seen = Vec::new();
    let mut actions = Vec::new();
    for task in tasks {
        if seen.contains(task) {
            continue;
        }
        seen.push(*task);
        debug!("Planning task '{}'", task);
        let planned = match task {
            Task::Docs => docs::plan(ctx)?,
            Task::Readthedocs => docs::readthedocs(ctx)?,
            Task::Lint => lint::plan(ctx)?,
            Task::Python => python::plan(ctx)?,
            Task::SetupPy => env::setup_py(ctx),
            Task::Requirements => env::requirements(ctx),
            Task::Conda => env::conda(ctx)?,
            Task::Gitignore => env::gitignore(ctx),
            Task::Ci => env::ci(ctx)?,
        };
        actions.extend(planned);
    }
    Ok(actions)
}
