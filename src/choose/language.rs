//! README language catalog
//!
//! Built-in locales are embedded JSON string tables. A locales directory can
//! add more, or replace a built-in one by reusing its code as file stem.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::{default_index, prompt_select};
use crate::domain::LanguageDescriptor;
use crate::error::ReadmeError;

/// Locale code picked when prompts are skipped.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Descriptor key holding the locale's display name.
const LANGUAGE_NAME_KEY: &str = "languageName";

const BUILTIN_LOCALES: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("fr", include_str!("../../locales/fr.json")),
    ("es", include_str!("../../locales/es.json")),
    ("de", include_str!("../../locales/de.json")),
];

/// Picks the language used for the README's fixed strings.
pub trait LanguageChooser {
    /// Return a descriptor, prompting the user unless `use_defaults` is set.
    fn choose_language(&self, use_defaults: bool) -> Result<LanguageDescriptor, ReadmeError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
    pub descriptor: LanguageDescriptor,
}

impl LanguageEntry {
    fn parse(code: &str, json: &str) -> Result<Self> {
        let descriptor: LanguageDescriptor = serde_json::from_str(json)
            .with_context(|| format!("Invalid locale '{code}': expected a JSON object"))?;
        let name = descriptor
            .get(LANGUAGE_NAME_KEY)
            .and_then(|v| v.as_str())
            .unwrap_or(code)
            .to_string();
        Ok(Self { code: code.to_string(), name, descriptor })
    }
}

#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    entries: Vec<LanguageEntry>,
    default_code: String,
}

impl LanguageCatalog {
    pub fn new(entries: Vec<LanguageEntry>, default_code: impl Into<String>) -> Self {
        Self { entries, default_code: default_code.into() }
    }

    /// Built-in locales, then any `*.json` under `extra_dir`.
    pub fn load(extra_dir: Option<&Path>, default_code: &str) -> Result<Self> {
        let mut entries = BUILTIN_LOCALES
            .iter()
            .map(|(code, json)| LanguageEntry::parse(code, json))
            .collect::<Result<Vec<_>>>()?;

        if let Some(dir) = extra_dir {
            for entry in load_locale_dir(dir)? {
                match entries.iter_mut().find(|e| e.code == entry.code) {
                    Some(existing) => *existing = entry,
                    None => entries.push(entry),
                }
            }
        }

        Ok(Self::new(entries, default_code))
    }

    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    pub fn get(&self, code: &str) -> Result<&LanguageEntry, ReadmeError> {
        self.entries.iter().find(|e| e.code == code).ok_or_else(|| ReadmeError::UnknownEntry {
            kind: "language",
            name: code.to_string(),
            available: self.codes().join(", "),
        })
    }

    /// Use `code` as the default, failing if it is not in the catalog.
    pub fn with_default(mut self, code: &str) -> Result<Self, ReadmeError> {
        self.get(code)?;
        self.default_code = code.to_string();
        Ok(self)
    }

    fn codes(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.code.as_str()).collect()
    }

    fn default_position(&self) -> usize {
        default_index("language", self.entries.iter().map(|e| e.code.as_str()), &self.default_code)
    }
}

impl LanguageChooser for LanguageCatalog {
    fn choose_language(&self, use_defaults: bool) -> Result<LanguageDescriptor, ReadmeError> {
        if self.entries.is_empty() {
            return Err(ReadmeError::EmptyCatalog { kind: "languages" });
        }
        let default = self.default_position();
        let index = if use_defaults {
            default
        } else {
            let labels: Vec<String> =
                self.entries.iter().map(|e| format!("{} ({})", e.name, e.code)).collect();
            prompt_select("Which language do you want to use?", &labels, default)?
        };
        Ok(self.entries[index].descriptor.clone())
    }
}

fn load_locale_dir(dir: &Path) -> Result<Vec<LanguageEntry>> {
    let read_dir = fs::read_dir(dir)
        .with_context(|| format!("Failed reading locales directory: {}", dir.display()))?;

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let path = dir_entry
            .with_context(|| format!("Failed reading locales directory: {}", dir.display()))?
            .path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(code) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed reading locale file: {}", path.display()))?;
        entries.push(LanguageEntry::parse(code, &json)?);
    }
    entries.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(entries)
}
