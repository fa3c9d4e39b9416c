// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! JSON parsing for Postman collection exports.
//!
//! A collection is kept as an untyped [`serde_json::Value`] tree so that
//! templates can reach any field Postman exports. Only the schema marker is
//! validated up front; the few fields the pipeline itself relies on are
//! checked where they are used and reported as a [`ShapeError`].
//!
//! # Format Overview
//!
//! A Postman v2.1.0 export contains:
//! - An `info` object with the collection `name` and `schema` URI
//! - An `item` list of endpoints (or folders holding more items)
//! - Per endpoint, a `request` and a `response` list of saved examples
//!
//! # Example
//!
//! ```
//! use pm2md::parser::parse_collection;
//!
//! let json = r#"{
//!     "info": {
//!         "name": "Pets",
//!         "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
//!     },
//!     "item": []
//! }"#;
//!
//! let collection = parse_collection(json.as_bytes()).unwrap();
//! assert_eq!(collection.name(), "Pets");
//! ```

use serde::Deserialize;
use serde_json::Value;
use snafu::prelude::*;

/// The only collection schema this crate understands.
pub const SCHEMA: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Error type for collection parsing failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// Failed to parse JSON content.
    #[snafu(display("failed to parse JSON: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },

    /// The document is not a Postman v2.1.0 collection.
    #[snafu(display(
        "unknown JSON schema{}. When exporting from Postman, export as Collection v2.1.0",
        found.as_deref().map(|s| format!(" {s:?}")).unwrap_or_default()
    ))]
    SchemaMismatch {
        /// The schema marker that was found, if any.
        found: Option<String>,
    },

    /// The `info` object does not have the expected fields.
    #[snafu(display("malformed collection info: {source}"))]
    Info {
        /// The underlying deserialization error.
        source: serde_json::Error,
    },
}

/// A field of the collection tree did not have the shape the pipeline needs.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(display("unexpected collection shape at `{path}`: expected {expected}"))]
pub struct ShapeError {
    path: String,
    expected: &'static str,
}

impl ShapeError {
    /// The JSON path of the offending field, e.g. `item[0].response`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Collection metadata from the `info` object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Info {
    /// Display name of the collection.
    pub name: String,

    /// Schema URI; always equal to [`SCHEMA`] after parsing.
    pub schema: String,
}

/// A parsed Postman collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    info: Info,
    document: Value,
}

impl Collection {
    /// The collection's display name (`info.name`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// The collection metadata.
    #[must_use]
    pub const fn info(&self) -> &Info {
        &self.info
    }

    /// The full document tree, as passed to templates.
    #[must_use]
    pub const fn document(&self) -> &Value {
        &self.document
    }

    /// The top-level `item` list.
    ///
    /// # Errors
    ///
    /// Returns an error if `item` is missing or not an array.
    pub fn items_mut(&mut self) -> Result<&mut Vec<Value>, ShapeError> {
        array_field_mut(&mut self.document, "item", "item")
    }
}

/// Returns the array stored under `key` in `value`, or a [`ShapeError`]
/// naming `path`.
pub(crate) fn array_field_mut<'a>(
    value: &'a mut Value,
    key: &str,
    path: &str,
) -> Result<&'a mut Vec<Value>, ShapeError> {
    value
        .get_mut(key)
        .and_then(Value::as_array_mut)
        .context(ShapeSnafu {
            path,
            expected: "an array",
        })
}

/// Navigates a JSON path and returns the string value at the end.
fn get_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut current = value;
    for key in path {
        current = current.get(*key)?;
    }
    current.as_str()
}

/// Parses raw bytes into a [`Collection`].
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON, if `info.schema` is not
/// [`SCHEMA`], or if `info.name` is missing.
pub fn parse_collection(bytes: &[u8]) -> Result<Collection, ParseError> {
    let document: Value = serde_json::from_slice(bytes).context(JsonSnafu)?;

    let schema = get_str(&document, &["info", "schema"]);
    ensure!(
        schema == Some(SCHEMA),
        SchemaMismatchSnafu {
            found: schema.map(str::to_owned)
        }
    );

    let info = Info::deserialize(&document["info"]).context(InfoSnafu)?;
    Ok(Collection { info, document })
}
