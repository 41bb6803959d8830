//! Generate command implementation

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::io::IsTerminal;
use std::path::PathBuf;

use super::list::{print_languages, print_templates};
use super::utils::parse_key_value;
use crate::choose::template::bundled_templates_dir;
use crate::choose::{LanguageCatalog, TemplateCatalog};
use crate::config::{load_config, merge_cli_with_config, merge_context, CliOverrides};
use crate::domain::Config;
use crate::project::load_project_context;
use crate::readme::{generate, GenerateOptions};

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to a custom README template (skips the template prompt)
    #[arg(short, long, value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Use default answers instead of prompting
    #[arg(short, long)]
    pub yes: bool,

    /// Language code for the README's fixed strings (skips the language prompt)
    #[arg(short, long, value_name = "CODE")]
    pub language: Option<String>,

    /// Extra template variable (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, Value)>,

    /// Path to config file (readme-gen.toml or .readme-gen.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory of `*.md` templates to choose from
    #[arg(long, value_name = "DIR", env = "README_GEN_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Directory of extra `*.json` locales
    #[arg(long, value_name = "DIR", env = "README_GEN_LOCALES_DIR")]
    pub locales_dir: Option<PathBuf>,

    /// List available templates and exit
    #[arg(long)]
    pub list_templates: bool,

    /// List available languages and exit
    #[arg(long)]
    pub list_languages: bool,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed resolving current directory")?;

    let config = load_config(&cwd, args.config.as_deref())?;
    let config = merge_cli_with_config(
        config,
        CliOverrides {
            templates_dir: args.templates_dir.clone(),
            locales_dir: args.locales_dir.clone(),
            language: args.language.clone(),
        },
    );

    if args.list_templates || args.list_languages {
        if args.list_templates {
            print_templates(&template_catalog(&config)?);
        }
        if args.list_languages {
            print_languages(&language_catalog(&config)?, config.default_language_code());
        }
        return Ok(());
    }

    let interactive_terminal = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
    let use_defaults = args.yes || !interactive_terminal;
    if !args.yes && !interactive_terminal {
        tracing::info!("Not attached to a terminal; using default answers");
    }

    // A custom template never consults the catalog, so don't require one.
    let templates = match args.path {
        Some(_) => TemplateCatalog::new(Vec::new(), config.default_template_name()),
        None => template_catalog(&config)?,
    };

    let mut languages = language_catalog(&config)?;
    if let Some(code) = &args.language {
        languages = languages.with_default(code)?;
    }

    let project = load_project_context(&cwd)?;
    let context = merge_context(project, &config, args.set);
    tracing::debug!("Render context keys: {:?}", context.keys().collect::<Vec<_>>());

    let options = GenerateOptions {
        custom_template: args.path,
        use_defaults,
        language_preselected: args.language.is_some(),
        context,
        ..GenerateOptions::default()
    };

    let written = generate(&options, &templates, &languages)?;
    tracing::info!("Wrote {}", cwd.join(written).display());
    Ok(())
}

fn template_catalog(config: &Config) -> Result<TemplateCatalog> {
    let dir = match &config.templates_dir {
        Some(dir) => dir.clone(),
        None => bundled_templates_dir()?,
    };
    TemplateCatalog::discover(&dir, config.default_template_name())
}

fn language_catalog(config: &Config) -> Result<LanguageCatalog> {
    LanguageCatalog::load(config.locales_dir.as_deref(), config.default_language_code())
}
