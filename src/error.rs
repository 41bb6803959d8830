//! Error types for README generation.

use std::error::Error as _;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReadmeError {
    #[error("the template path '{}' is not valid: {reason}", path.display())]
    InvalidTemplate { path: PathBuf, reason: String },

    #[error("failed reading template '{}': {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed rendering template '{}': {message}", path.display())]
    TemplateRender {
        path: PathBuf,
        message: String,
        source: tera::Error,
    },

    #[error("failed writing '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("no {kind} available")]
    EmptyCatalog { kind: &'static str },

    #[error("unknown {kind} '{name}' (available: {available})")]
    UnknownEntry {
        kind: &'static str,
        name: String,
        available: String,
    },
}

impl ReadmeError {
    /// Wrap a tera error, flattening its source chain into the message.
    ///
    /// Tera reports the useful part (line, column, expected token) in nested
    /// sources, so the top-level `Display` alone loses it.
    pub fn render(path: impl Into<PathBuf>, source: tera::Error) -> Self {
        let mut message = source.to_string();
        let mut cause = source.source();
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = inner.source();
        }
        Self::TemplateRender { path: path.into(), message, source }
    }
}
