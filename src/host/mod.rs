//! Operator-facing collaborators: prompts, notifications and the clipboard

mod clipboard;
mod terminal;

pub use clipboard::SystemClipboard;
pub use terminal::TerminalOperator;

use crate::errors::Result;

/// Synchronous validator for free-text input: `Err(message)` rejects the value
pub type Validator<'a> = &'a dyn Fn(&str) -> std::result::Result<(), String>;

/// Dialogs with the human at the keyboard.
///
/// `Ok(None)` means the operator dismissed the prompt; that is a normal early
/// exit, not an error.
pub trait Operator: Send + Sync {
    /// Pick one of `items`
    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<String>>;

    /// Free text, re-prompting until `validate` accepts it
    fn input(&self, prompt: &str, validate: Validator<'_>) -> Result<Option<String>>;

    fn info(&self, message: &str);

    fn error(&self, message: &str);
}

/// Destination for text the operator will paste elsewhere
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}
