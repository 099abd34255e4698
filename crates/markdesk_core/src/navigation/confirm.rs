//! User confirmation capability.

/// Asks the user a yes/no question.
///
/// Implementations may block (native dialog) or answer from a script.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Accepts every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Prompt texts shown by the navigation controller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Prompts {
    /// Asked before leaving a document with unsaved edits.
    pub unsaved_changes: String,
    /// Asked before deleting; `{name}` is replaced by the document name.
    pub delete_document: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            unsaved_changes: "The current document has changed, do you really want to leave?"
                .to_string(),
            delete_document: "Are you sure you want to delete '{name}'?".to_string(),
        }
    }
}

impl Prompts {
    pub fn delete_prompt(&self, name: &str) -> String {
        self.delete_document.replace("{name}", name)
    }
}
