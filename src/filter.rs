// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Removal of sample responses by status code.

use crate::parser::{Collection, ShapeError, ShapeSnafu, array_field_mut};
use crate::status::{StatusRange, in_any};
use serde_json::Value;
use snafu::prelude::*;
use tracing::debug;

/// Removes every sample response whose `code` is outside all of `ranges`.
///
/// Endpoints are visited at any folder depth. Surviving responses keep their
/// relative order. An empty `ranges` leaves the collection untouched, and
/// running the filter again with the same ranges changes nothing.
///
/// # Errors
///
/// Returns an error if an `item` or `response` list is not an array, or if a
/// response `code` is not a number. The collection is not modified in that
/// endpoint when this happens.
pub fn filter_responses(
    collection: &mut Collection,
    ranges: &[StatusRange],
) -> Result<(), ShapeError> {
    if ranges.is_empty() {
        return Ok(());
    }
    let removed = filter_items(collection.items_mut()?, ranges, "item")?;
    debug!(removed, "filtered sample responses by status");
    Ok(())
}

fn filter_items(
    items: &mut [Value],
    ranges: &[StatusRange],
    path: &str,
) -> Result<usize, ShapeError> {
    let mut removed = 0;
    for (i, item) in items.iter_mut().enumerate() {
        let path = format!("{path}[{i}]");
        if item.get("item").is_some() {
            let children = array_field_mut(item, "item", &format!("{path}.item"))?;
            removed += filter_items(children, ranges, &format!("{path}.item"))?;
        } else {
            removed += filter_endpoint(item, ranges, &path)?;
        }
    }
    Ok(removed)
}

fn filter_endpoint(
    endpoint: &mut Value,
    ranges: &[StatusRange],
    path: &str,
) -> Result<usize, ShapeError> {
    let path = format!("{path}.response");
    let responses = array_field_mut(endpoint, "response", &path)?;

    let keep = responses
        .iter()
        .enumerate()
        .map(|(j, response)| {
            status_code(response)
                .context(ShapeSnafu {
                    path: format!("{path}[{j}].code"),
                    expected: "an integer",
                })
                .map(|code| in_any(ranges, code))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let before = responses.len();
    let mut keep = keep.into_iter();
    responses.retain(|_| keep.next().unwrap_or(true));
    Ok(before - responses.len())
}

#[allow(clippy::cast_possible_truncation)]
fn status_code(response: &Value) -> Option<i64> {
    let code = response.get("code")?;
    code.as_i64().or_else(|| code.as_f64().map(|f| f as i64))
}
