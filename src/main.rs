//! quill's main application entry point and orchestration logic.
//! Handles command-line argument parsing, project inference flow,
//! and coordinates interactions between different modules.

use quill::{
    chapter::walk,
    cli::{get_args, Args},
    config::get_config,
    error::{default_error_handler, Error, Result},
    ignore::IgnoreRules,
    logger::init_logger,
    metadata::Project,
    prompt::{DialoguerPrompter, Prompter},
    renderer::MiniJinjaRenderer,
    tasks::{plan, TaskContext},
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::FormatError { format: "JSON", reason: e.to_string() })
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the project configuration and applies command-line overrides
/// 2. Compiles the ignore rules and classifies the project tree
/// 3. Infers the project metadata
/// 4. Plans the file operations of the selected tasks
/// 5. Applies them, asking before replacing existing files
fn run(args: Args) -> Result<()> {
    let root = args.directory.canonicalize().map_err(Error::IoError)?;
    let mut config = get_config(&root)?;
    if let Some(python) = args.python {
        config.python = python;
    }
    if let Some(docs) = args.docs {
        config.docs = docs;
    }

    let chapter = if config.ignore.is_empty() {
        walk(&root, IgnoreRules::bundled()?)?
    } else {
        let rules = IgnoreRules::with_extra("configuration", &config.ignore.join("\n"))?;
        walk(&root, &rules)?
    };

    if args.show_chapter {
        println!("{}", to_json(&chapter)?);
        return Ok(());
    }

    let tasks = if args.tasks.is_empty() { config.tasks.clone() } else { args.tasks.clone() };
    let project = Project::new(chapter, config);
    let metadata = project.metadata()?;

    if args.show_metadata {
        println!("{}", to_json(&metadata)?);
        return Ok(());
    }

    let renderer = MiniJinjaRenderer::new();
    let prompt = DialoguerPrompter::new();
    let ctx = TaskContext::new(&project, &metadata, &renderer)?;

    for action in plan(&tasks, &ctx)? {
        if args.dry_run {
            if let Some(text) = action.render()? {
                println!("{action}\n{text}");
            }
            continue;
        }
        if action.overwrites()
            && !prompt.confirm(
                args.skip_overwrite_check,
                format!("File '{}' already exists. Overwrite?", action.target.display()),
            )?
        {
            log::info!("Skipping '{}'", action.target.display());
            continue;
        }
        if action.apply()? {
            println!("{action}");
        }
    }

    Ok(())
}
