//! Template and language choosers
//!
//! Both collaborators work the same way: a catalog of entries with a default,
//! shown as a `dialoguer` select prompt unless prompts are skipped, in which
//! case the default entry is returned directly.

use dialoguer::{theme::ColorfulTheme, Select};

use crate::error::ReadmeError;

pub mod language;
pub mod template;

pub use language::{LanguageCatalog, LanguageChooser, LanguageEntry};
pub use template::{TemplateCatalog, TemplateChooser, TemplateEntry};

/// Show a select prompt over `labels`, pre-selecting `default`.
fn prompt_select(prompt: &str, labels: &[String], default: usize) -> Result<usize, ReadmeError> {
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .items(labels)
        .interact()?;
    Ok(selection)
}

/// Index of the entry named `wanted`, falling back to the first entry.
fn default_index<'a>(
    kind: &str,
    mut names: impl Iterator<Item = &'a str>,
    wanted: &str,
) -> usize {
    match names.position(|name| name == wanted) {
        Some(index) => index,
        None => {
            tracing::warn!("Default {kind} '{wanted}' not found; using the first one");
            0
        }
    }
}
