//! Terminal dialogs
//!
//! Prompts are drawn on stderr so stdout stays clean for piped output.

use super::{Operator, Validator};
use crate::context::Environment;
use crate::errors::{KubedevError, Result};
use crate::signals;
use console::style;
use dialoguer::console::Term;
use dialoguer::{Input, Select};

/// Operator backed by dialoguer prompts
#[derive(Debug, Clone)]
pub struct TerminalOperator {
    interactive: bool,
    colors: bool,
}

impl TerminalOperator {
    pub fn new(env: &Environment) -> Self {
        Self {
            interactive: env.is_interactive(),
            colors: env.colors,
        }
    }

    fn ensure_interactive(&self, prompt: &str) -> Result<()> {
        if self.interactive {
            Ok(())
        } else {
            Err(KubedevError::Prompt(format!(
                "cannot ask \"{}\": no interactive terminal",
                prompt
            )))
        }
    }
}

/// Ctrl+C inside a prompt counts as dismissing it
fn cancelled_or_error<T>(error: dialoguer::Error) -> Result<Option<T>> {
    let e: std::io::Error = error.into();
    if e.kind() == std::io::ErrorKind::Interrupted {
        signals::set_interrupted();
        Ok(None)
    } else {
        Err(KubedevError::Prompt(e.to_string()))
    }
}

impl Operator for TerminalOperator {
    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<String>> {
        self.ensure_interactive(prompt)?;

        match Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_on_opt(&Term::stderr())
        {
            Ok(choice) => Ok(choice.and_then(|index| items.get(index).cloned())),
            Err(e) => cancelled_or_error(e),
        }
    }

    fn input(&self, prompt: &str, validate: Validator<'_>) -> Result<Option<String>> {
        self.ensure_interactive(prompt)?;

        match Input::<String>::new()
            .with_prompt(prompt)
            .validate_with(|value: &String| validate(value))
            .interact_text_on(&Term::stderr())
        {
            Ok(value) => Ok(Some(value)),
            Err(e) => cancelled_or_error(e),
        }
    }

    fn info(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn error(&self, message: &str) {
        if self.colors {
            eprintln!("{} {}", style("error:").red().bold(), message);
        } else {
            eprintln!("error: {}", message);
        }
    }
}
