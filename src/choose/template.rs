//! README template catalog

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::{default_index, prompt_select};
use crate::error::ReadmeError;

/// Catalog name of the template picked when prompts are skipped.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Templates directory of the source checkout this binary was built from.
const MANIFEST_TEMPLATES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");

/// Bundled templates, embedded so a relocated binary can still unpack them.
const BUNDLED_TEMPLATES: &[(&str, &str)] = &[
    ("default.md", include_str!("../../templates/default.md")),
    ("default-no-html.md", include_str!("../../templates/default-no-html.md")),
];

/// Locate the bundled templates directory.
///
/// Looks next to the executable (`templates/`, then `../share/readme-gen/templates`),
/// then in the source checkout. When none exists the embedded copies are
/// unpacked under the system temp directory.
pub fn bundled_templates_dir() -> Result<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    let mut candidates = Vec::new();
    if let Some(dir) = exe_dir {
        candidates.push(dir.join("templates"));
        candidates.push(dir.join("..").join("share").join("readme-gen").join("templates"));
    }
    candidates.push(PathBuf::from(MANIFEST_TEMPLATES_DIR));

    match find_templates_dir(candidates) {
        Some(dir) => Ok(dir),
        None => {
            let dir = std::env::temp_dir()
                .join(format!("readme-gen-{}", env!("CARGO_PKG_VERSION")))
                .join("templates");
            tracing::debug!("No templates directory found; unpacking to {}", dir.display());
            unpack_bundled_templates(&dir)?;
            Ok(dir)
        }
    }
}

/// First candidate that is an existing directory.
fn find_templates_dir(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|dir| dir.is_dir())
}

/// Write the embedded templates into `dir`, replacing older copies.
pub fn unpack_bundled_templates(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed creating templates directory: {}", dir.display()))?;
    for (file_name, content) in BUNDLED_TEMPLATES {
        let path = dir.join(file_name);
        fs::write(&path, content)
            .with_context(|| format!("Failed writing bundled template: {}", path.display()))?;
    }
    Ok(())
}

/// Picks the template to render when no custom path was given.
pub trait TemplateChooser {
    /// Return a template path, prompting the user unless `use_defaults` is set.
    fn choose_template(&self, use_defaults: bool) -> Result<PathBuf, ReadmeError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateEntry {
    /// File stem, e.g. `default-no-html`
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    entries: Vec<TemplateEntry>,
    default_name: String,
}

impl TemplateCatalog {
    pub fn new(entries: Vec<TemplateEntry>, default_name: impl Into<String>) -> Self {
        Self { entries, default_name: default_name.into() }
    }

    /// Collect every `*.md` file directly under `dir`, sorted by name.
    pub fn discover(dir: &Path, default_name: &str) -> Result<Self> {
        let read_dir = fs::read_dir(dir)
            .with_context(|| format!("Failed reading templates directory: {}", dir.display()))?;

        let mut entries = Vec::new();
        for dir_entry in read_dir {
            let path = dir_entry
                .with_context(|| format!("Failed reading templates directory: {}", dir.display()))?
                .path();
            let is_markdown = path.extension().and_then(|e| e.to_str()) == Some("md");
            if !is_markdown || !path.is_file() {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            entries.push(TemplateEntry { name: name.to_string(), path });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!("Discovered {} templates in {}", entries.len(), dir.display());
        Ok(Self::new(entries, default_name))
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    pub fn default_entry(&self) -> Option<&TemplateEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let index = default_index(
            "template",
            self.entries.iter().map(|e| e.name.as_str()),
            &self.default_name,
        );
        self.entries.get(index)
    }
}

impl TemplateChooser for TemplateCatalog {
    fn choose_template(&self, use_defaults: bool) -> Result<PathBuf, ReadmeError> {
        let default = self.default_entry().ok_or(ReadmeError::EmptyCatalog { kind: "templates" })?;
        if use_defaults {
            return Ok(default.path.clone());
        }

        let labels: Vec<String> = self.entries.iter().map(|e| e.name.clone()).collect();
        let start = self.entries.iter().position(|e| e == default).unwrap_or(0);
        let selection = prompt_select("Which template do you want to use?", &labels, start)?;
        Ok(self.entries[selection].path.clone())
    }
}
