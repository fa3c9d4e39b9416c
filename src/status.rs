// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Status range expressions used to select sample responses.
//!
//! An expression is a comma-separated list of ranges, where each range is
//! either a single status code (`200`) or an inclusive span (`200-299`):
//!
//! ```
//! use pm2md::status::{parse_status_ranges, StatusRange};
//!
//! let ranges = parse_status_ranges("200-299,404").unwrap().unwrap();
//! assert_eq!(ranges, [StatusRange::new(200, 299), StatusRange::new(404, 404)]);
//! assert!(parse_status_ranges("").unwrap().is_none());
//! ```
//!
//! Bounds are not reordered. A range whose start is greater than its end is
//! accepted and never matches anything.

use snafu::prelude::*;
use std::num::ParseIntError;
use std::str::FromStr;

/// Error type for malformed status range expressions.
#[derive(Debug, Snafu)]
pub enum StatusRangeError {
    /// A range contained more than one dash.
    #[snafu(display("invalid status format: there should be zero or one dashes in {token:?}"))]
    TooManyDashes {
        /// The offending range token.
        token: String,
    },

    /// A range bound was not an integer.
    #[snafu(display("invalid status range format: expected an integer, got {value:?}"))]
    NotAnInteger {
        /// The substring that failed to parse.
        value: String,
        /// The underlying integer parsing error.
        source: ParseIntError,
    },
}

/// An inclusive range of HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRange {
    /// First status code in the range.
    pub start: i64,
    /// Last status code in the range.
    pub end: i64,
}

impl StatusRange {
    /// Creates a range covering `start..=end`.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `code` lies within the range, bounds included.
    #[must_use]
    pub const fn contains(&self, code: i64) -> bool {
        self.start <= code && code <= self.end
    }
}

impl FromStr for StatusRange {
    type Err = StatusRangeError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut bounds = token.split('-');
        let start = bounds.next().unwrap_or_default();
        let end = bounds.next();
        ensure!(bounds.next().is_none(), TooManyDashesSnafu { token });

        let start = parse_bound(start)?;
        let end = end.map_or(Ok(start), parse_bound)?;
        Ok(Self { start, end })
    }
}

fn parse_bound(value: &str) -> Result<i64, StatusRangeError> {
    value.parse().context(NotAnIntegerSnafu { value })
}

/// Parses a comma-separated list of status ranges.
///
/// Returns `Ok(None)` for an empty expression, meaning no filtering should
/// happen. Any malformed range fails the whole expression.
///
/// # Errors
///
/// Returns an error if a range has more than one dash or a bound that is not
/// an integer.
pub fn parse_status_ranges(expr: &str) -> Result<Option<Vec<StatusRange>>, StatusRangeError> {
    if expr.is_empty() {
        return Ok(None);
    }
    expr.split(',')
        .map(str::parse)
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Returns `true` if `code` falls inside at least one of `ranges`.
#[must_use]
pub fn in_any(ranges: &[StatusRange], code: i64) -> bool {
    ranges.iter().any(|range| range.contains(code))
}
