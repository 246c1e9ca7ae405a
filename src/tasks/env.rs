//! Environment and repository files.

use super::{Action, Task, TaskContext};
use crate::constants::{
    templates, ENVIRONMENT_YAML, GITIGNORE, REQUIREMENTS_TXT, SETUP_PY, WORKFLOW_YML,
};
use crate::error::Result;
use crate::merge::Node;

const SETUP_PY_SHIM: &str = "__import__(\"setuptools\").setup()\n";

pub fn setup_py(ctx: &TaskContext) -> Vec<Action> {
    vec![Action::create(Task::SetupPy, ctx.root().join(SETUP_PY), SETUP_PY_SHIM.to_string())]
}

pub fn requirements(ctx: &TaskContext) -> Vec<Action> {
    let requires = Node::from(ctx.metadata.requires.clone());
    vec![Action::write(Task::Requirements, ctx.root().join(REQUIREMENTS_TXT), requires)]
}

pub fn conda(ctx: &TaskContext) -> Result<Vec<Action>> {
    let environment = ctx.render(templates::ENVIRONMENT)?;
    Ok(vec![Action::update(Task::Conda, ctx.root().join(ENVIRONMENT_YAML), environment)])
}

pub fn gitignore(ctx: &TaskContext) -> Vec<Action> {
    let patterns = Node::from(ctx.metadata.exclude.clone());
    vec![Action::update(Task::Gitignore, ctx.root().join(GITIGNORE), patterns)]
}

pub fn ci(ctx: &TaskContext) -> Result<Vec<Action>> {
    let workflow = ctx.render(templates::WORKFLOW)?;
    Ok(vec![Action::update(Task::Ci, ctx.root().join(WORKFLOW_YML), workflow)])
}
