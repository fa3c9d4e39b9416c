// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! The end-to-end conversion pipeline.
//!
//! Stages run in order and each completes before the next starts:
//! parse, filter, open the destination, render. The first failure aborts
//! the rest. If rendering fails after an output file was created, that file
//! is removed so no half-written document is left behind.

use crate::destination::{self, DestinationError, OutputSpec, Target};
use crate::filter::filter_responses;
use crate::parser::{self, ParseError, ShapeError};
use crate::renderer::{self, RenderError, RenderTemplate};
use crate::status::StatusRange;
use snafu::prelude::*;
use tracing::debug;

/// Error type for conversion failures.
#[derive(Debug, Snafu)]
pub enum ConvertError {
    /// The input is not a usable collection.
    #[snafu(transparent)]
    Parse {
        /// The underlying parse error.
        source: ParseError,
    },

    /// The collection tree is missing a field the pipeline relies on.
    #[snafu(transparent)]
    Shape {
        /// The underlying shape error.
        source: ShapeError,
    },

    /// The output could not be opened.
    #[snafu(transparent)]
    Destination {
        /// The underlying destination error.
        source: DestinationError,
    },

    /// The template failed to compile or execute.
    #[snafu(transparent)]
    Render {
        /// The underlying render error.
        source: RenderError,
    },

    /// Rendered output could not be flushed.
    #[snafu(display("failed to write {target}: {source}"))]
    Flush {
        /// Where the output was going.
        target: Target,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Everything a single conversion needs besides the input bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Where to write the Markdown.
    pub output: OutputSpec,

    /// Keep only sample responses with a status in one of these ranges.
    ///
    /// Empty means keep everything.
    pub statuses: Vec<StatusRange>,

    /// Template used for rendering.
    pub template: RenderTemplate,

    /// Whether an existing file named by [`OutputSpec::Path`] may be replaced.
    pub allow_overwrite: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output: OutputSpec::Stdout,
            statuses: Vec::new(),
            template: RenderTemplate::default(),
            allow_overwrite: false,
        }
    }
}

/// Converts a collection export to Markdown and returns where it was written.
///
/// # Errors
///
/// Returns an error if the input is not a valid collection, the destination
/// cannot be opened, or the template fails.
pub fn convert(json: &[u8], opts: &ConvertOptions) -> Result<Target, ConvertError> {
    let mut collection = parser::parse_collection(json)?;
    debug!(name = collection.name(), "parsed collection");

    filter_responses(&mut collection, &opts.statuses)?;

    let mut dest = destination::resolve(&opts.output, collection.name(), opts.allow_overwrite)?;
    debug!(target = %dest.target(), template = %opts.template.name, "rendering");

    if let Err(err) = renderer::render(&mut dest, &collection, &opts.template) {
        dest.discard();
        return Err(err.into());
    }

    let target = dest.target().clone();
    let finished = dest.finish();
    if finished.is_err()
        && let Target::File(path) = &target
    {
        let _ = std::fs::remove_file(path);
    }
    finished.context(FlushSnafu { target })
}
