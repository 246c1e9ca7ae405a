//! User interaction for quill.

use crate::error::{Error, Result};
use dialoguer::Confirm;

/// Asks the user to confirm an operation.
pub trait Prompter {
    /// Returns `true` without asking when `skip` is set.
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool>;
}

/// Terminal prompts backed by dialoguer.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool> {
        if skip {
            return Ok(true);
        }
        Confirm::new().with_prompt(prompt).default(false).interact().map_err(Error::PromptError)
    }
}
