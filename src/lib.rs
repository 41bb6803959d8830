//! readme-gen: Generate README files from templates
//!
//! Picks a template and a language, renders the template against the
//! project's metadata with `tera`, and writes `README.md`.

pub mod choose;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod progress;
pub mod project;
pub mod readme;

pub use domain::{Config, LanguageDescriptor, README_PATH};
pub use error::ReadmeError;
