//! Packaging manifests: `pyproject.toml` and `setup.cfg`.

use super::{Action, Task, TaskContext};
use crate::config::PythonBackend;
use crate::constants::{templates, PYPROJECT_TOML, SETUP_CFG};
use crate::error::Result;
use crate::merge::{merge_all, Node};
use indexmap::IndexMap;

const BUILD_SYSTEM: &str = "build-system";

pub fn plan(ctx: &TaskContext) -> Result<Vec<Action>> {
    let root = ctx.root();
    Ok(match ctx.metadata.python_backend {
        PythonBackend::Flit => vec![pyproject(ctx, templates::FLIT)?],
        PythonBackend::Poetry => vec![pyproject(ctx, templates::POETRY)?],
        PythonBackend::Setuptools | PythonBackend::Infer => vec![
            Action::update(
                Task::Python,
                root.join(SETUP_CFG),
                ctx.render(templates::SETUPTOOLS_CFG)?,
            ),
            pyproject(ctx, templates::SETUPTOOLS_TOML)?,
        ],
    })
}

/// The backend document with its build system first and pytest settings merged in.
fn pyproject(ctx: &TaskContext, template: &str) -> Result<Action> {
    let mut data = ctx.render(template)?;
    let mut head = IndexMap::new();
    let build_system = data.as_mapping_mut().and_then(|map| map.shift_remove(BUILD_SYSTEM));
    if let Some(build_system) = build_system {
        head.insert(BUILD_SYSTEM.to_string(), build_system);
    }
    let document = merge_all([Node::Mapping(head), ctx.render(templates::PYTEST)?, data])?;
    Ok(Action::update(Task::Python, ctx.root().join(PYPROJECT_TOML), document))
}
