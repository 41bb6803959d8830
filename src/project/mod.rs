//! Project metadata gathered from the current directory's manifest
//!
//! `Cargo.toml` wins over `package.json`. Only plain string fields are read;
//! anything inherited from a workspace (`version.workspace = true`) or
//! otherwise non-string is left out of the context.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::domain::ExtraContext;

pub const PROJECT_NAME: &str = "projectName";
pub const PROJECT_VERSION: &str = "projectVersion";
pub const PROJECT_DESCRIPTION: &str = "projectDescription";
pub const PROJECT_HOMEPAGE: &str = "projectHomepage";
pub const REPOSITORY_URL: &str = "repositoryUrl";
pub const LICENSE_NAME: &str = "licenseName";
pub const AUTHOR_NAME: &str = "authorName";
pub const INSTALL_COMMAND: &str = "installCommand";
pub const TEST_COMMAND: &str = "testCommand";

/// Build the render context describing the project rooted at `dir`.
pub fn load_project_context(dir: &Path) -> Result<ExtraContext> {
    let cargo_manifest = dir.join("Cargo.toml");
    let package_json = dir.join("package.json");

    let mut context = if cargo_manifest.is_file() {
        tracing::debug!("Reading project metadata from {}", cargo_manifest.display());
        let content = fs::read_to_string(&cargo_manifest)
            .with_context(|| format!("Failed reading {}", cargo_manifest.display()))?;
        from_cargo_manifest(&content)
            .with_context(|| format!("Invalid manifest: {}", cargo_manifest.display()))?
    } else if package_json.is_file() {
        tracing::debug!("Reading project metadata from {}", package_json.display());
        let content = fs::read_to_string(&package_json)
            .with_context(|| format!("Failed reading {}", package_json.display()))?;
        from_package_json(&content)
            .with_context(|| format!("Invalid manifest: {}", package_json.display()))?
    } else {
        tracing::debug!("No project manifest in {}", dir.display());
        ExtraContext::new()
    };

    if !context.contains_key(PROJECT_NAME) {
        if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
            context.insert(PROJECT_NAME.to_string(), Value::from(name));
        }
    }

    Ok(context)
}

fn from_cargo_manifest(content: &str) -> Result<ExtraContext> {
    let raw: toml::Value = toml::from_str(content)?;
    let mut context = ExtraContext::new();

    let Some(package) = raw.get("package") else {
        return Ok(context);
    };
    let field = |key: &str| package.get(key).and_then(|v| v.as_str()).map(str::to_string);

    insert_opt(&mut context, PROJECT_NAME, field("name"));
    insert_opt(&mut context, PROJECT_VERSION, field("version"));
    insert_opt(&mut context, PROJECT_DESCRIPTION, field("description"));
    insert_opt(&mut context, PROJECT_HOMEPAGE, field("homepage"));
    let repository = field("repository").map(|url| clean_repository_url(&url));
    insert_opt(&mut context, REPOSITORY_URL, repository);
    insert_opt(&mut context, LICENSE_NAME, field("license"));

    let first_author = package
        .get("authors")
        .and_then(|v| v.as_array())
        .and_then(|authors| authors.first())
        .and_then(|v| v.as_str())
        .map(strip_email);
    insert_opt(&mut context, AUTHOR_NAME, first_author);

    context.insert(INSTALL_COMMAND.to_string(), Value::from("cargo install --path ."));
    context.insert(TEST_COMMAND.to_string(), Value::from("cargo test"));
    Ok(context)
}

fn from_package_json(content: &str) -> Result<ExtraContext> {
    let raw: Value = serde_json::from_str(content)?;
    let mut context = ExtraContext::new();
    let field = |key: &str| raw.get(key).and_then(|v| v.as_str()).map(str::to_string);

    insert_opt(&mut context, PROJECT_NAME, field("name"));
    insert_opt(&mut context, PROJECT_VERSION, field("version"));
    insert_opt(&mut context, PROJECT_DESCRIPTION, field("description"));
    insert_opt(&mut context, PROJECT_HOMEPAGE, field("homepage"));
    insert_opt(&mut context, LICENSE_NAME, field("license"));

    // "repository" and "author" come either as strings or as objects.
    let repository = match raw.get("repository") {
        Some(Value::String(url)) => Some(url.clone()),
        Some(Value::Object(obj)) => obj.get("url").and_then(|v| v.as_str()).map(str::to_string),
        _ => None,
    };
    insert_opt(&mut context, REPOSITORY_URL, repository.map(|url| clean_repository_url(&url)));

    let author = match raw.get("author") {
        Some(Value::String(author)) => Some(strip_email(author)),
        Some(Value::Object(obj)) => obj.get("name").and_then(|v| v.as_str()).map(str::to_string),
        _ => None,
    };
    insert_opt(&mut context, AUTHOR_NAME, author);

    context.insert(INSTALL_COMMAND.to_string(), Value::from("npm install"));
    if raw.pointer("/scripts/test").is_some() {
        context.insert(TEST_COMMAND.to_string(), Value::from("npm test"));
    }
    Ok(context)
}

fn insert_opt(context: &mut ExtraContext, key: &str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        context.insert(key.to_string(), Value::from(value));
    }
}

/// `Jane Doe <jane@example.com>` -> `Jane Doe`
fn strip_email(author: &str) -> String {
    match author.split_once('<') {
        Some((name, _)) => name.trim().to_string(),
        None => author.trim().to_string(),
    }
}

/// Turn `git+https://host/owner/repo.git` into `https://host/owner/repo`.
fn clean_repository_url(url: &str) -> String {
    let url = url.trim();
    let url = url.strip_prefix("git+").unwrap_or(url);
    let url = url.strip_suffix(".git").unwrap_or(url);
    url.trim_end_matches('/').to_string()
}
