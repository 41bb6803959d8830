//! Merging CLI overrides into the loaded config, and layering render context

use std::path::PathBuf;

use crate::domain::{Config, ExtraContext};

/// Values given on the command line (or via their environment variables).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub templates_dir: Option<PathBuf>,
    pub locales_dir: Option<PathBuf>,
    pub language: Option<String>,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if cli.templates_dir.is_some() {
        config.templates_dir = cli.templates_dir;
    }
    if cli.locales_dir.is_some() {
        config.locales_dir = cli.locales_dir;
    }
    if cli.language.is_some() {
        config.default_language = cli.language;
    }
    config
}

/// Layer render context: project metadata, then config, then `--set` pairs.
///
/// Later layers win key by key.
pub fn merge_context(
    project: ExtraContext,
    config: &Config,
    cli_pairs: impl IntoIterator<Item = (String, serde_json::Value)>,
) -> ExtraContext {
    let mut context = project;
    for (key, value) in &config.context {
        context.insert(key.clone(), value.clone());
    }
    for (key, value) in cli_pairs {
        context.insert(key, value);
    }
    context
}
