//! Step spinners shown while generating

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A spinner for one generation step.
///
/// Every spinner ends in exactly one of [`Spinner::succeed`] or
/// [`Spinner::fail`], which leave a persistent status line on stderr.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!("{message}");

        let bar = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(template.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub fn succeed(self, message: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {message}", style("✔").green().for_stderr());
    }

    pub fn fail(self, message: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {message}", style("✖").red().for_stderr());
    }
}
