// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert Postman collections to Markdown documentation.
//!
//! This crate turns a Postman Collection v2.1.0 export into a Markdown
//! document rendered through a Handlebars template.
//!
//! # Overview
//!
//! A conversion runs these stages in order:
//!
//! 1. Parse the JSON export and check its schema marker
//! 2. Drop sample responses whose status code is outside the requested ranges
//! 3. Resolve the output: stdout, a given path, or a new auto-named file
//! 4. Render the collection through the default or a custom template
//!
//! # Example
//!
//! ```no_run
//! use pm2md::convert::{convert, ConvertOptions};
//! use pm2md::destination::OutputSpec;
//! use pm2md::status::parse_status_ranges;
//!
//! let json = std::fs::read("collection.json").unwrap();
//! let opts = ConvertOptions {
//!     output: OutputSpec::Path("api.md".into()),
//!     statuses: parse_status_ranges("200-299").unwrap().unwrap_or_default(),
//!     ..Default::default()
//! };
//!
//! let target = convert(&json, &opts).unwrap();
//! eprintln!("Created {target}");
//! ```
//!
//! # Modules
//!
//! - [`parser`]: JSON parsing and schema check for collection exports
//! - [`status`]: status range expressions
//! - [`filter`]: removal of sample responses by status code
//! - [`naming`]: file name sanitizing and collision-free naming
//! - [`destination`]: output resolution and cleanup
//! - [`renderer`]: template loading and Markdown rendering
//! - [`convert`]: the pipeline tying the stages together

#![deny(missing_docs)]

pub mod convert;
pub mod destination;
pub mod filter;
mod helpers;
pub mod naming;
pub mod parser;
pub mod renderer;
pub mod status;
