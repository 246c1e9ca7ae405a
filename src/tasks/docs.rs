//! Documentation configuration.

use super::{Action, Task, TaskContext};
use crate::chapter::Chapter;
use crate::config::DocsBackend;
use crate::constants::{templates, BOOK_CONFIG_YML, MKDOCS_YML, READTHEDOCS_YML, TOC_YML};
use crate::error::{Error, Result};
use crate::merge::Node;
use indexmap::IndexMap;
use log::debug;
use std::path::Path;

pub fn plan(ctx: &TaskContext) -> Result<Vec<Action>> {
    let root = ctx.root();
    Ok(match ctx.metadata.docs_backend {
        DocsBackend::Jb | DocsBackend::Infer => {
            let toc = table_of_contents(&ctx.project.chapter, root)?;
            let book = ctx.render(templates::BOOK_CONFIG)?;
            vec![
                Action::write(Task::Docs, root.join(TOC_YML), toc),
                Action::write(Task::Docs, root.join(BOOK_CONFIG_YML), book),
            ]
        }
        DocsBackend::Mkdocs => {
            vec![Action::write(Task::Docs, root.join(MKDOCS_YML), ctx.render(templates::MKDOCS)?)]
        }
        DocsBackend::Sphinx => Vec::new(),
    })
}

pub fn readthedocs(ctx: &TaskContext) -> Result<Vec<Action>> {
    let config = ctx.render(templates::READTHEDOCS)?;
    Ok(vec![Action::write(Task::Readthedocs, ctx.root().join(READTHEDOCS_YML), config)])
}

/// Root-relative path without its suffix.
fn entry(root: &Path, path: &Path) -> Node {
    let path = path.with_extension("");
    let relative = path.strip_prefix(root).unwrap_or(&path);
    Node::String(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
    )
}

/// The table of contents of a chapter.
///
/// The index is the chapter's index file, else its first page, post, test or
/// module. Sections list the remaining files followed by every subchapter
/// that has an index of its own.
///
/// # Errors
/// * `Error::MissingIndexError` if the chapter has no file to use as index
pub fn table_of_contents(chapter: &Chapter, root: &Path) -> Result<Node> {
    let index = chapter
        .index
        .as_ref()
        .or_else(|| {
            [&chapter.pages, &chapter.posts, &chapter.tests, &chapter.modules]
                .into_iter()
                .find_map(|files| files.first())
        })
        .ok_or_else(|| Error::MissingIndexError { dir: chapter.dir.clone() })?;

    let mut sections: Vec<Node> = chapter
        .pages
        .iter()
        .chain(&chapter.posts)
        .chain(&chapter.tests)
        .chain(&chapter.modules)
        .filter(|file| *file != index)
        .map(|file| {
            let mut section = IndexMap::new();
            section.insert("file".to_string(), entry(root, file));
            Node::Mapping(section)
        })
        .collect();

    for sub in &chapter.chapters {
        match table_of_contents(sub, root) {
            Ok(toc) => sections.push(toc),
            Err(Error::MissingIndexError { dir }) => {
                debug!("Leaving '{}' out of the table of contents", dir.display());
            }
            Err(e) => return Err(e),
        }
    }

    let mut toc = IndexMap::new();
    toc.insert("file".to_string(), entry(root, index));
    toc.insert("sections".to_string(), Node::Sequence(sections));
    Ok(Node::Mapping(toc))
}
