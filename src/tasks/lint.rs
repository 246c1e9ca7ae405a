//! Pre-commit configuration.

use super::{Action, Task, TaskContext};
use crate::constants::{templates, PRECOMMIT_CONFIG};
use crate::error::{Error, Result};
use crate::format;
use crate::merge::Node;

const REPOS: &str = "repos";

pub fn plan(ctx: &TaskContext) -> Result<Vec<Action>> {
    let target = ctx.root().join(PRECOMMIT_CONFIG);
    let defaults = ctx.render(templates::PRECOMMIT)?;
    let existing = format::load(&target)?;
    let config = precommit(existing, &defaults, &ctx.metadata.suffixes)?;
    Ok(vec![Action::write(Task::Lint, target, config)])
}

/// Adds the default hooks for every suffix to a pre-commit configuration.
///
/// Repositories are matched by URL: a known repository keeps its revision
/// (taking the default one when it has none) and gains the hooks it lacks.
/// `null` holds the defaults that apply to every project.
pub fn precommit(existing: Node, defaults: &Node, suffixes: &[String]) -> Result<Node> {
    let mut config = match existing {
        Node::Mapping(map) => map,
        Node::Null => Default::default(),
        other => {
            return Err(Error::FormatError {
                format: "pre-commit",
                reason: format!("expected a mapping, found {}", other.kind()),
            })
        }
    };
    let mut repos = match config.shift_remove(REPOS) {
        Some(Node::Sequence(repos)) => repos,
        _ => Vec::new(),
    };

    let keys = std::iter::once("null").chain(suffixes.iter().map(String::as_str));
    for key in keys {
        let Some(kinds) = defaults.get(key) else {
            continue;
        };
        for kind in kinds.as_items().unwrap_or_default() {
            add_repo(&mut repos, kind);
        }
    }

    config.insert(REPOS.to_string(), Node::Sequence(repos));
    Ok(Node::Mapping(config))
}

fn hook_ids(repo: &Node) -> Vec<Node> {
    repo.get("hooks")
        .and_then(|hooks| {
            hooks.as_items().map(|hooks| hooks.iter().filter_map(|hook| hook.get("id")).collect())
        })
        .unwrap_or_default()
}

fn add_repo(repos: &mut Vec<Node>, kind: &Node) {
    let url = kind.get("repo");
    let known = repos.iter_mut().find(|repo| url.is_some() && repo.get("repo") == url);
    let Some(repo) = known.and_then(Node::as_mapping_mut) else {
        repos.push(kind.clone());
        return;
    };

    if !repo.get("rev").is_some_and(Node::is_truthy) {
        if let Some(rev) = kind.get("rev") {
            repo.insert("rev".to_string(), rev);
        }
    }

    let ids = hook_ids(&Node::Mapping(repo.clone()));
    let missing: Vec<Node> = kind
        .get("hooks")
        .and_then(|hooks| hooks.as_items().map(<[Node]>::to_vec))
        .unwrap_or_default()
        .into_iter()
        .filter(|hook| hook.get("id").is_none_or(|id| !ids.contains(&id)))
        .collect();
    match repo.get_mut("hooks") {
        Some(Node::Sequence(hooks)) => hooks.extend(missing),
        _ => {
            repo.insert("hooks".to_string(), Node::Sequence(missing));
        }
    }
}
