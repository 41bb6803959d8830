//! `--list-templates` / `--list-languages` output

use console::style;

use crate::choose::{LanguageCatalog, TemplateCatalog};

pub fn print_templates(catalog: &TemplateCatalog) {
    let default = catalog.default_entry().map(|e| e.name.as_str());
    println!("Templates:");
    for entry in catalog.entries() {
        let marker = if Some(entry.name.as_str()) == default { " (default)" } else { "" };
        println!("  {}{}  {}", style(&entry.name).bold(), marker, entry.path.display());
    }
}

pub fn print_languages(catalog: &LanguageCatalog, default_code: &str) {
    println!("Languages:");
    for entry in catalog.entries() {
        let marker = if entry.code == default_code { " (default)" } else { "" };
        println!("  {}  {}{}", style(&entry.code).bold(), entry.name, marker);
    }
}
