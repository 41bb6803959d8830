//! Core types shared across the generator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Output file written in the current working directory.
pub const README_PATH: &str = "README.md";

/// Context key holding the language descriptor.
pub const I18N_KEY: &str = "i18n";
/// Context key holding the template path.
pub const FILENAME_KEY: &str = "filename";
/// Context key holding the current calendar year.
pub const CURRENT_YEAR_KEY: &str = "currentYear";

/// Localized strings for a README, keyed by message id.
///
/// The generator never inspects it; templates address entries as
/// `i18n.<key>`.
pub type LanguageDescriptor = serde_json::Map<String, serde_json::Value>;

/// Extra key/value pairs merged into the render context.
pub type ExtraContext = serde_json::Map<String, serde_json::Value>;

/// Configuration loaded from `readme-gen.toml` / `.readme-gen.yml`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for `*.md` templates
    pub templates_dir: Option<PathBuf>,
    /// Catalog name picked when prompts are skipped
    pub default_template: Option<String>,
    /// Directory scanned for additional `*.json` locales
    pub locales_dir: Option<PathBuf>,
    /// Locale code picked when prompts are skipped
    pub default_language: Option<String>,
    /// Extra render context, overriding project metadata
    pub context: BTreeMap<String, serde_json::Value>,
}

impl Config {
    /// Template catalog name to use when no prompt is shown.
    pub fn default_template_name(&self) -> &str {
        self.default_template.as_deref().unwrap_or(crate::choose::template::DEFAULT_TEMPLATE)
    }

    /// Locale code to use when no prompt is shown.
    pub fn default_language_code(&self) -> &str {
        self.default_language.as_deref().unwrap_or(crate::choose::language::DEFAULT_LANGUAGE)
    }
}
