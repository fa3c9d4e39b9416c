// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown rendering of parsed collections through Handlebars templates.
//!
//! The template receives the whole collection document as its context, so
//! any field of the Postman export can be referenced (`{{info.name}}`,
//! `{{#each item}}...{{/each}}`). HTML escaping is disabled since the output
//! is Markdown. The helpers listed in the crate's helper table are always
//! registered.
//!
//! # Example
//!
//! ```
//! use pm2md::parser::parse_collection;
//! use pm2md::renderer::{render, RenderTemplate};
//!
//! let json = r#"{
//!     "info": {
//!         "name": "Pets",
//!         "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
//!     },
//!     "item": []
//! }"#;
//! let collection = parse_collection(json.as_bytes()).unwrap();
//!
//! let template = RenderTemplate::new("title.tmpl", "# {{upper info.name}}");
//! let mut out = Vec::new();
//! render(&mut out, &collection, &template).unwrap();
//! assert_eq!(out, b"# PETS");
//! ```

use crate::helpers;
use crate::naming::unique_name;
use crate::parser::Collection;
use handlebars::Handlebars;
use snafu::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Source of the built-in template.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/default.tmpl");

/// Logical name of the built-in template.
pub const DEFAULT_TEMPLATE_NAME: &str = "default.tmpl";

/// Required suffix for custom template files.
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

/// Error type for template rendering failures.
#[derive(Debug, Snafu)]
pub enum RenderError {
    /// The template source did not compile.
    #[snafu(display("template parsing error in {name:?}: {source}"))]
    Compile {
        /// Logical name of the template.
        name: String,
        /// The underlying template error.
        #[snafu(source(from(handlebars::TemplateError, Box::new)))]
        source: Box<handlebars::TemplateError>,
    },

    /// The template failed while producing output.
    #[snafu(display("failed to execute template {name:?}: {source}"))]
    Execute {
        /// Logical name of the template.
        name: String,
        /// The underlying render error.
        #[snafu(source(from(handlebars::RenderError, Box::new)))]
        source: Box<handlebars::RenderError>,
    },
}

/// Error type for loading custom templates.
#[derive(Debug, Snafu)]
pub enum TemplateLoadError {
    /// The template path does not end with [`TEMPLATE_SUFFIX`].
    #[snafu(display("{:?} must end with {TEMPLATE_SUFFIX:?}", path.display()))]
    InvalidSuffix {
        /// The rejected path.
        path: PathBuf,
    },

    /// The template file could not be read.
    #[snafu(display("failed to read template {}: {source}", path.display()))]
    Read {
        /// The template file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// A template and the name it is known by in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTemplate {
    /// Logical name, e.g. `default.tmpl` or a custom file's base name.
    pub name: String,

    /// Handlebars source text.
    pub source: String,
}

impl RenderTemplate {
    /// Creates a template from a name and source text.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// The built-in template.
    #[must_use]
    pub fn default_template() -> Self {
        Self::new(DEFAULT_TEMPLATE_NAME, DEFAULT_TEMPLATE)
    }

    /// Loads a custom template from `path`.
    ///
    /// The template's name is the file's base name, with both `/` and `\`
    /// treated as separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not end with [`TEMPLATE_SUFFIX`] or
    /// the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, TemplateLoadError> {
        let display = path.to_string_lossy();
        ensure!(
            display.ends_with(TEMPLATE_SUFFIX),
            InvalidSuffixSnafu { path }
        );
        let source = fs::read_to_string(path).context(ReadSnafu { path })?;
        let name = display.rsplit(['/', '\\']).next().unwrap_or_default();
        Ok(Self::new(name, source))
    }
}

impl Default for RenderTemplate {
    fn default() -> Self {
        Self::default_template()
    }
}

/// Renders `collection` through `template` into `writer`.
///
/// Output may already have been written when execution fails; cleaning up
/// a partial file is the caller's job.
///
/// # Errors
///
/// Returns [`RenderError::Compile`] if the template does not parse and
/// [`RenderError::Execute`] if rendering fails, including write errors.
pub fn render<W: Write>(
    writer: W,
    collection: &Collection,
    template: &RenderTemplate,
) -> Result<(), RenderError> {
    let name = &template.name;
    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    helpers::register(&mut registry);
    registry
        .register_template_string(name, &template.source)
        .context(CompileSnafu { name })?;

    registry
        .render_to_write(name, collection.document(), writer)
        .context(ExecuteSnafu { name })
}

/// Writes the built-in template to a new `collection.tmpl` in `dir`.
///
/// An existing file is never replaced; a numbered name is used instead.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn export_default_template(dir: &Path) -> io::Result<PathBuf> {
    let path = unique_name(dir.join("collection"), TEMPLATE_SUFFIX);
    fs::write(&path, DEFAULT_TEMPLATE)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{SCHEMA, parse_collection};

    fn make_collection(items: &str) -> Collection {
        let json = format!(
            r#"{{
                "info": {{
                    "name": "Pet Store",
                    "description": "Everything about pets.",
                    "schema": "{SCHEMA}"
                }},
                "item": [{items}]
            }}"#
        );
        parse_collection(json.as_bytes()).unwrap()
    }

    fn endpoint_json() -> &'static str {
        r#"{
            "name": "Get pet",
            "request": {
                "method": "get",
                "header": [{ "key": "Accept", "value": "application/json" }],
                "url": { "raw": "{{host}}/pets/1", "path": ["pets", "1"] },
                "description": "Fetches one pet."
            },
            "response": [{
                "name": "Found",
                "status": "OK",
                "code": 200,
                "_postman_previewlanguage": "json",
                "body": "{\"id\":1}"
            }]
        }"#
    }

    fn render_to_string(collection: &Collection, template: &RenderTemplate) -> String {
        let mut out = Vec::new();
        render(&mut out, collection, template).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_default_template() {
        let collection = make_collection(endpoint_json());
        let output = render_to_string(&collection, &RenderTemplate::default());

        assert!(output.starts_with("# Pet Store"));
        assert!(output.contains("Everything about pets."));
        assert!(output.contains("1. [Get pet](#get-pet)"));
        assert!(output.contains("### Get pet"));
        assert!(output.contains("GET {{host}}/pets/1"));
        assert!(output.contains("Fetches one pet."));
        assert!(output.contains("| Accept | application/json |"));
        assert!(output.contains("#### Example 1: Found"));
        assert!(output.contains("`200 OK`"));
        assert!(output.contains("```json\n{\n  \"id\": 1\n}\n```"));
    }

    #[test]
    fn default_template_does_not_escape_html() {
        let collection = make_collection(
            r#"{
                "name": "<b>Bold</b> & co",
                "request": { "method": "GET", "url": "http://x" },
                "response": []
            }"#,
        );
        let output = render_to_string(&collection, &RenderTemplate::default());

        assert!(output.contains("### <b>Bold</b> & co"));
        assert!(output.contains("GET http://x"));
    }

    #[test]
    fn default_template_renders_folders() {
        let folder = format!(r#"{{ "name": "Pets", "item": [{}] }}"#, endpoint_json());
        let collection = make_collection(&folder);
        let output = render_to_string(&collection, &RenderTemplate::default());

        assert!(output.contains("## Pets"));
        assert!(output.contains("### Get pet"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let collection = make_collection(endpoint_json());
        let first = render_to_string(&collection, &RenderTemplate::default());
        let second = render_to_string(&collection, &RenderTemplate::default());

        assert_eq!(first, second);
    }

    #[test]
    fn renders_custom_template() {
        let collection = make_collection(endpoint_json());
        let template = RenderTemplate::new(
            "list.tmpl",
            "{{#each item}}- {{lower request.method}} {{join request.url.path \"/\"}}\n{{/each}}",
        );

        assert_eq!(render_to_string(&collection, &template), "- get pets/1\n");
    }

    #[test]
    fn reports_compile_errors_with_name() {
        let collection = make_collection("");
        let template = RenderTemplate::new("broken.tmpl", "{{#each item}}");
        let err = render(Vec::new(), &collection, &template).unwrap_err();

        assert!(matches!(err, RenderError::Compile { ref name, .. } if name == "broken.tmpl"));
        assert!(err.to_string().contains("broken.tmpl"));
    }

    #[test]
    fn reports_execution_errors_with_name() {
        let collection = make_collection("");
        let template = RenderTemplate::new("bad.tmpl", "{{upper 5}}");
        let err = render(Vec::new(), &collection, &template).unwrap_err();

        assert!(matches!(err, RenderError::Execute { ref name, .. } if name == "bad.tmpl"));
    }

    #[test]
    fn loads_custom_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.tmpl");
        fs::write(&path, "# {{info.name}}").unwrap();

        let template = RenderTemplate::load(&path).unwrap();

        assert_eq!(template.name, "custom.tmpl");
        assert_eq!(template.source, "# {{info.name}}");
    }

    #[test]
    fn rejects_template_without_suffix() {
        let err = RenderTemplate::load(Path::new("custom.template")).unwrap_err();
        assert!(matches!(err, TemplateLoadError::InvalidSuffix { .. }));
    }

    #[test]
    fn reports_missing_template() {
        let err = RenderTemplate::load(Path::new("nonexistent.tmpl")).unwrap_err();
        assert!(matches!(err, TemplateLoadError::Read { .. }));
    }

    #[test]
    fn default_template_has_default_name() {
        let template = RenderTemplate::default();
        assert_eq!(template.name, DEFAULT_TEMPLATE_NAME);
        assert_eq!(template.source, DEFAULT_TEMPLATE);
    }

    #[test]
    fn exports_default_template() {
        let dir = tempfile::tempdir().unwrap();

        let first = export_default_template(dir.path()).unwrap();
        let second = export_default_template(dir.path()).unwrap();

        assert_eq!(first, dir.path().join("collection.tmpl"));
        assert_eq!(second, dir.path().join("collection(1).tmpl"));
        assert_eq!(fs::read_to_string(&first).unwrap(), DEFAULT_TEMPLATE);
    }
}
