//! README generation steps
//!
//! Generation is four blocking steps run strictly in order: resolve the
//! template path, resolve the language, render, write. Each step reports
//! through a [`Spinner`] and the first failure aborts everything after it.

use chrono::Datelike;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;

use crate::choose::{LanguageChooser, TemplateChooser};
use crate::domain::{
    ExtraContext, LanguageDescriptor, CURRENT_YEAR_KEY, FILENAME_KEY, I18N_KEY, README_PATH,
};
use crate::error::ReadmeError;
use crate::progress::Spinner;

/// Inputs for a full generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Template to use instead of asking the template chooser
    pub custom_template: Option<PathBuf>,
    /// Skip prompts and take the choosers' defaults
    pub use_defaults: bool,
    /// Skip only the language prompt
    pub language_preselected: bool,
    /// Caller-supplied render context
    pub context: ExtraContext,
    /// Destination file; `README.md` in the current directory when unset
    pub output: Option<PathBuf>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            custom_template: None,
            use_defaults: false,
            language_preselected: false,
            context: ExtraContext::new(),
            output: None,
        }
    }
}

/// Run every step and return the path written.
pub fn generate(
    options: &GenerateOptions,
    templates: &dyn TemplateChooser,
    languages: &dyn LanguageChooser,
) -> Result<PathBuf, ReadmeError> {
    let template_path =
        resolve_template_path(options.custom_template.as_deref(), options.use_defaults, templates)?;
    let language =
        resolve_language(options.use_defaults || options.language_preselected, languages)?;
    let content = build_readme_content(&language, &options.context, &template_path)?;
    match &options.output {
        Some(path) => {
            write_readme_to(path, &content)?;
            Ok(path.clone())
        }
        None => {
            write_readme(&content)?;
            Ok(PathBuf::from(README_PATH))
        }
    }
}

/// Use `custom_path` as-is, or ask `chooser` for one; either way the result
/// must be a regular file.
pub fn resolve_template_path(
    custom_path: Option<&Path>,
    use_defaults: bool,
    chooser: &dyn TemplateChooser,
) -> Result<PathBuf, ReadmeError> {
    let template_path = match custom_path {
        Some(path) => path.to_path_buf(),
        None => chooser.choose_template(use_defaults)?,
    };

    validate_template_path(&template_path)?;
    Ok(template_path)
}

fn validate_template_path(template_path: &Path) -> Result<(), ReadmeError> {
    let spinner = Spinner::start("Resolving README template path");

    // Symlinks are followed; a dangling link fails like a missing file.
    let reason = match fs::metadata(template_path) {
        Ok(meta) if meta.is_file() => None,
        Ok(_) => Some("not a regular file".to_string()),
        Err(err) => Some(err.to_string()),
    };

    if let Some(reason) = reason {
        spinner.fail(&format!("The template path '{}' is not valid.", template_path.display()));
        return Err(ReadmeError::InvalidTemplate { path: template_path.to_path_buf(), reason });
    }

    spinner.succeed("README template path resolved");
    Ok(())
}

pub fn resolve_language(
    use_defaults: bool,
    chooser: &dyn LanguageChooser,
) -> Result<LanguageDescriptor, ReadmeError> {
    chooser.choose_language(use_defaults)
}

/// Load `template_path` and render it for the current year.
pub fn build_readme_content(
    language: &LanguageDescriptor,
    context: &ExtraContext,
    template_path: &Path,
) -> Result<String, ReadmeError> {
    let current_year = chrono::Local::now().year();
    let template = load_template(template_path)?;
    render_template(&template, language, context, template_path, current_year)
}

fn load_template(template_path: &Path) -> Result<String, ReadmeError> {
    let spinner = Spinner::start("Loading README template");

    match fs::read_to_string(template_path) {
        Ok(template) => {
            spinner.succeed("README template loaded");
            Ok(template)
        }
        Err(source) => {
            spinner.fail("README template loading fail");
            Err(ReadmeError::TemplateRead { path: template_path.to_path_buf(), source })
        }
    }
}

/// Render `template` with the reserved keys first and `extra` merged on top.
///
/// Keys in `extra` named `i18n`, `filename` or `currentYear` replace the
/// reserved values. Files next to the template with the same extension are
/// registered by file name, so `{% include "footer.md" %}` and
/// `{% extends "base.md" %}` resolve relative to the template.
fn render_template(
    template: &str,
    language: &LanguageDescriptor,
    extra: &ExtraContext,
    template_path: &Path,
    current_year: i32,
) -> Result<String, ReadmeError> {
    let name = template_path.display().to_string();

    let mut templates = sibling_templates(template_path);
    templates.push((name.clone(), template.to_string()));

    let mut tera = Tera::default();
    tera.autoescape_on(Vec::new());
    tera.add_raw_templates(templates).map_err(|e| ReadmeError::render(template_path, e))?;

    let mut context = tera::Context::new();
    context.insert(I18N_KEY, language);
    context.insert(FILENAME_KEY, &name);
    context.insert(CURRENT_YEAR_KEY, &current_year);
    for (key, value) in extra {
        if matches!(key.as_str(), I18N_KEY | FILENAME_KEY | CURRENT_YEAR_KEY) {
            tracing::debug!("Context key '{key}' overrides the built-in value");
        }
        context.insert(key.as_str(), value);
    }

    tera.render(&name, &context).map_err(|e| ReadmeError::render(template_path, e))
}

/// Templates beside `template_path` sharing its extension, keyed by file name.
///
/// Siblings that cannot be read or do not parse on their own are skipped, so
/// an unrelated broken file never blocks rendering.
fn sibling_templates(template_path: &Path) -> Vec<(String, String)> {
    let Some(extension) = template_path.extension() else {
        return Vec::new();
    };
    let own_name = template_path.file_name();
    let dir = match template_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut siblings = Vec::new();
    for path in read_dir.filter_map(|entry| entry.ok()).map(|entry| entry.path()) {
        if path.extension() != Some(extension) || path.file_name() == own_name || !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        if let Err(e) = tera::Template::new(file_name, None, &content) {
            tracing::debug!("Skipping sibling template {}: {e}", path.display());
            continue;
        }
        siblings.push((file_name.to_string(), content));
    }
    siblings
}

/// Write `content` to `README.md` in the current directory.
pub fn write_readme(content: &str) -> Result<(), ReadmeError> {
    write_readme_to(Path::new(README_PATH), content)
}

/// Write `content` to `path`, replacing whatever is there.
pub fn write_readme_to(path: &Path, content: &str) -> Result<(), ReadmeError> {
    let spinner = Spinner::start("Creating README");

    match fs::write(path, content) {
        Ok(()) => {
            spinner.succeed("README created");
            Ok(())
        }
        Err(source) => {
            spinner.fail("README creation fail");
            Err(ReadmeError::Write { path: path.to_path_buf(), source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Template chooser that records calls and hands back a fixed path.
    struct FixedTemplate {
        path: PathBuf,
        calls: Cell<usize>,
        last_use_defaults: Cell<Option<bool>>,
    }

    impl FixedTemplate {
        fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into(), calls: Cell::new(0), last_use_defaults: Cell::new(None) }
        }
    }

    impl TemplateChooser for FixedTemplate {
        fn choose_template(&self, use_defaults: bool) -> Result<PathBuf, ReadmeError> {
            self.calls.set(self.calls.get() + 1);
            self.last_use_defaults.set(Some(use_defaults));
            Ok(self.path.clone())
        }
    }

    struct FixedLanguage(LanguageDescriptor);

    impl LanguageChooser for FixedLanguage {
        fn choose_language(&self, _use_defaults: bool) -> Result<LanguageDescriptor, ReadmeError> {
            Ok(self.0.clone())
        }
    }

    fn object(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn write_template(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("write template");
        path
    }

    #[test]
    fn custom_path_is_returned_without_asking_chooser() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_template(&tmp, "custom.md", "# hi");
        let chooser = FixedTemplate::new("/nonexistent/other.md");

        for use_defaults in [true, false] {
            let resolved = resolve_template_path(Some(path.as_path()), use_defaults, &chooser).expect("ok");
            assert_eq!(resolved, path);
        }
        assert_eq!(chooser.calls.get(), 0);
    }

    #[test]
    fn missing_custom_path_is_invalid() {
        let tmp = TempDir::new().expect("tmp");
        let chooser = FixedTemplate::new("/nonexistent/other.md");

        let err = resolve_template_path(Some(tmp.path().join("nope.md").as_path()), true, &chooser)
            .expect_err("missing path");
        assert!(matches!(err, ReadmeError::InvalidTemplate { .. }));
    }

    #[test]
    fn directory_path_is_invalid() {
        let tmp = TempDir::new().expect("tmp");
        let chooser = FixedTemplate::new("/nonexistent/other.md");

        let err = resolve_template_path(Some(tmp.path()), false, &chooser).expect_err("directory");
        match err {
            ReadmeError::InvalidTemplate { path, reason } => {
                assert_eq!(path, tmp.path());
                assert_eq!(reason, "not a regular file");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(chooser.calls.get(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_file_is_accepted() {
        let tmp = TempDir::new().expect("tmp");
        let target = write_template(&tmp, "target.md", "# hi");
        let link = tmp.path().join("link.md");
        std::os::unix::fs::symlink(&target, &link).expect("symlink");
        let chooser = FixedTemplate::new("/nonexistent/other.md");

        let resolved = resolve_template_path(Some(link.as_path()), true, &chooser).expect("symlink");
        assert_eq!(resolved, link);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_directory_or_nowhere_is_invalid() {
        let tmp = TempDir::new().expect("tmp");
        let dir_link = tmp.path().join("dir.md");
        std::os::unix::fs::symlink(tmp.path(), &dir_link).expect("symlink");
        let dangling = tmp.path().join("dangling.md");
        std::os::unix::fs::symlink(tmp.path().join("gone.md"), &dangling).expect("symlink");
        let chooser = FixedTemplate::new("/nonexistent/other.md");

        for link in [dir_link, dangling] {
            let err = resolve_template_path(Some(link.as_path()), true, &chooser)
                .expect_err("invalid symlink");
            assert!(matches!(err, ReadmeError::InvalidTemplate { .. }));
        }
    }

    #[test]
    fn chooser_receives_use_defaults_and_result_is_validated() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_template(&tmp, "default.md", "# default");
        let chooser = FixedTemplate::new(&path);

        let resolved = resolve_template_path(None, true, &chooser).expect("ok");
        assert_eq!(resolved, path);
        assert_eq!(chooser.calls.get(), 1);
        assert_eq!(chooser.last_use_defaults.get(), Some(true));
    }

    #[test]
    fn chooser_result_pointing_nowhere_is_invalid() {
        let tmp = TempDir::new().expect("tmp");
        let chooser = FixedTemplate::new(tmp.path().join("gone.md"));

        let err = resolve_template_path(None, true, &chooser).expect_err("missing");
        assert!(matches!(err, ReadmeError::InvalidTemplate { .. }));
    }

    #[test]
    fn renders_current_year() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_template(&tmp, "year.md", "Year: {{ currentYear }}");

        let rendered =
            build_readme_content(&LanguageDescriptor::new(), &ExtraContext::new(), &path)
                .expect("render");
        assert_eq!(rendered, format!("Year: {}", chrono::Local::now().year()));
    }

    #[test]
    fn renders_fixed_year() {
        let rendered = render_template(
            "Year: {{ currentYear }}",
            &LanguageDescriptor::new(),
            &ExtraContext::new(),
            Path::new("year.md"),
            2024,
        )
        .expect("render");
        assert_eq!(rendered, "Year: 2024");
    }

    #[test]
    fn renders_language_strings() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_template(&tmp, "greet.md", "{{ i18n.greeting }}");
        let language = object(json!({ "greeting": "Hello" }));

        let rendered =
            build_readme_content(&language, &ExtraContext::new(), &path).expect("render");
        assert_eq!(rendered, "Hello");
    }

    #[test]
    fn renders_filename_and_extra_context() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_template(
            &tmp,
            "ctx.md",
            "{{ projectName }} from {{ filename }}{% if tags %}: {{ tags | join(sep=\", \") }}{% endif %}",
        );
        let extra = object(json!({ "projectName": "widget", "tags": ["cli", "rust"] }));

        let rendered =
            build_readme_content(&LanguageDescriptor::new(), &extra, &path).expect("render");
        assert_eq!(rendered, format!("widget from {}: cli, rust", path.display()));
    }

    #[test]
    fn does_not_escape_html() {
        let rendered = render_template(
            "{{ badge }}",
            &LanguageDescriptor::new(),
            &object(json!({ "badge": "<img src=\"a.svg\" />" })),
            Path::new("page.html"),
            2024,
        )
        .expect("render");
        assert_eq!(rendered, "<img src=\"a.svg\" />");
    }

    #[test]
    fn rendering_is_idempotent_for_fixed_year() {
        let template = "# {{ i18n.title }}\n{% for item in items %}- {{ item }}\n{% endfor %}{{ currentYear }}";
        let language = object(json!({ "title": "Project" }));
        let extra = object(json!({ "items": ["a", "b", "c"] }));
        let path = Path::new("list.md");

        let first = render_template(template, &language, &extra, path, 2024).expect("first");
        let second = render_template(template, &language, &extra, path, 2024).expect("second");
        similar_asserts::assert_eq!(first, second);
        similar_asserts::assert_eq!(first, "# Project\n- a\n- b\n- c\n2024");
    }

    // Caller context silently replaces the reserved keys. This is kept for
    // compatibility but is probably unintended; the test pins the behaviour
    // so a change to it is deliberate.
    #[test]
    fn caller_context_overrides_reserved_keys() {
        let language = object(json!({ "greeting": "Hello" }));
        let extra = object(json!({
            "i18n": { "greeting": "Shadowed" },
            "filename": "fake.md",
            "currentYear": 1999
        }));

        let rendered = render_template(
            "{{ i18n.greeting }} {{ filename }} {{ currentYear }}",
            &language,
            &extra,
            Path::new("real.md"),
            2024,
        )
        .expect("render");
        assert_eq!(rendered, "Shadowed fake.md 1999");

        let again = render_template(
            "{{ i18n.greeting }} {{ filename }} {{ currentYear }}",
            &language,
            &extra,
            Path::new("real.md"),
            2024,
        )
        .expect("render");
        assert_eq!(rendered, again);
    }

    #[test]
    fn syntax_error_is_render_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_template(&tmp, "broken.md", "{% if %}");

        let err = build_readme_content(&LanguageDescriptor::new(), &ExtraContext::new(), &path)
            .expect_err("syntax error");
        assert!(matches!(err, ReadmeError::TemplateRender { .. }));
    }

    #[test]
    fn undefined_variable_is_render_error() {
        let err = render_template(
            "{{ missing }}",
            &LanguageDescriptor::new(),
            &ExtraContext::new(),
            Path::new("t.md"),
            2024,
        )
        .expect_err("undefined variable");
        match err {
            ReadmeError::TemplateRender { message, .. } => {
                assert!(message.contains("missing"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn includes_sibling_template() {
        let tmp = TempDir::new().expect("tmp");
        write_template(&tmp, "footer.md", "-- {{ projectName }}");
        write_template(&tmp, "broken.md", "{{ unclosed");
        write_template(&tmp, "notes.txt", "{{ ignored");
        let main = write_template(&tmp, "main.md", "body\n{% include \"footer.md\" %}");

        let out = build_readme_content(
            &LanguageDescriptor::new(),
            &object(json!({ "projectName": "widget" })),
            &main,
        )
        .expect("render");
        assert_eq!(out, "body\n-- widget");
    }

    #[test]
    fn extends_sibling_template() {
        let tmp = TempDir::new().expect("tmp");
        write_template(
            &tmp,
            "base.md",
            "# {% block title %}untitled{% endblock title %}\n{{ currentYear }}",
        );
        let child = write_template(
            &tmp,
            "child.md",
            "{% extends \"base.md\" %}{% block title %}{{ i18n.greeting }}{% endblock title %}",
        );

        let out = render_template(
            &fs::read_to_string(&child).expect("read"),
            &object(json!({ "greeting": "Hello" })),
            &ExtraContext::new(),
            &child,
            2030,
        )
        .expect("render");
        assert_eq!(out, "# Hello\n2030");
    }

    #[test]
    fn unreadable_template_is_read_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("binary.md");
        fs::write(&path, [0xff, 0xfe, 0xfd]).expect("write");

        let err = build_readme_content(&LanguageDescriptor::new(), &ExtraContext::new(), &path)
            .expect_err("invalid utf-8");
        assert!(matches!(err, ReadmeError::TemplateRead { .. }));
    }

    #[test]
    fn write_overwrites_existing_file() {
        let tmp = TempDir::new().expect("tmp");
        let out = tmp.path().join("README.md");
        fs::write(&out, "old content that is longer").expect("write");

        write_readme_to(&out, "new").expect("write readme");
        assert_eq!(fs::read_to_string(&out).expect("read"), "new");
    }

    #[test]
    fn write_to_directory_is_write_error() {
        let tmp = TempDir::new().expect("tmp");
        let shadow = tmp.path().join("README.md");
        fs::create_dir(&shadow).expect("mkdir");

        let err = write_readme_to(&shadow, "content").expect_err("directory target");
        assert!(matches!(err, ReadmeError::Write { .. }));
    }

    #[test]
    fn write_under_missing_parent_is_write_error() {
        let tmp = TempDir::new().expect("tmp");
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").expect("write");

        let err = write_readme_to(&blocker.join("README.md"), "content").expect_err("bad parent");
        assert!(matches!(err, ReadmeError::Write { .. }));
    }

    #[test]
    fn generate_runs_all_steps() {
        let tmp = TempDir::new().expect("tmp");
        let template = write_template(
            &tmp,
            "default.md",
            "# {{ i18n.welcome }} {{ projectName }}\n\n© {{ currentYear }}\n",
        );
        let output = tmp.path().join("README.md");
        let options = GenerateOptions {
            use_defaults: true,
            context: object(json!({ "projectName": "widget" })),
            output: Some(output.clone()),
            ..GenerateOptions::default()
        };
        let templates = FixedTemplate::new(&template);
        let languages = FixedLanguage(object(json!({ "welcome": "Welcome to" })));

        let written = generate(&options, &templates, &languages).expect("generate");
        assert_eq!(written, output);
        similar_asserts::assert_eq!(
            fs::read_to_string(&output).expect("read"),
            format!("# Welcome to widget\n\n© {}\n", chrono::Local::now().year())
        );
        assert_eq!(templates.last_use_defaults.get(), Some(true));
    }

    #[test]
    fn generate_stops_at_first_failure() {
        let tmp = TempDir::new().expect("tmp");
        let template = write_template(&tmp, "broken.md", "{{ unclosed");
        let output = tmp.path().join("README.md");
        let options = GenerateOptions {
            custom_template: Some(template),
            use_defaults: true,
            output: Some(output.clone()),
            ..GenerateOptions::default()
        };

        let err = generate(
            &options,
            &FixedTemplate::new("/unused"),
            &FixedLanguage(LanguageDescriptor::new()),
        )
        .expect_err("render failure");
        assert!(matches!(err, ReadmeError::TemplateRender { .. }));
        assert!(!output.exists());
    }
}
