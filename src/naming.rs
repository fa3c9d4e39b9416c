// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! File naming helpers: sanitizing collection names and avoiding collisions.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Characters that are not allowed in file names on at least one common platform.
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turns an arbitrary display name into something usable as a file name.
///
/// Illegal and control characters are removed, and leading/trailing
/// whitespace and trailing dots are trimmed. The result may be empty.
#[must_use]
pub fn format_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect();
    cleaned.trim().trim_end_matches('.').trim_end().to_owned()
}

/// Returns a path built from `base` and `ext` that does not exist yet.
///
/// If `base + ext` is free it is returned unchanged. Otherwise `(1)`, `(2)`,
/// ... is appended to `base` until an unused name is found. Nothing is
/// created on disk.
///
/// # Panics
///
/// Panics if `ext` is neither empty nor a dot followed by at least one
/// character.
#[must_use]
pub fn unique_name(base: impl AsRef<Path>, ext: &str) -> PathBuf {
    assert!(
        ext.is_empty() || (ext.starts_with('.') && ext.len() > 1),
        "file extension must be empty or start with a dot: {ext:?}"
    );
    let base = base.as_ref().as_os_str();

    let candidate = with_suffix(base, "", ext);
    if !candidate.exists() {
        return candidate;
    }
    (1u64..)
        .map(|n| with_suffix(base, &format!("({n})"), ext))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| unreachable!("ran out of file name suffixes"))
}

fn with_suffix(base: &OsStr, suffix: &str, ext: &str) -> PathBuf {
    let mut name = OsString::from(base);
    name.push(suffix);
    name.push(ext);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn returns_name_unchanged_when_free() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            unique_name(dir.path().join("README"), ".md"),
            dir.path().join("README.md")
        );
    }

    #[test]
    fn appends_counter_when_taken() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        assert_eq!(
            unique_name(dir.path().join("README"), ".md"),
            dir.path().join("README(1).md")
        );
    }

    #[test]
    fn appends_counter_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LICENSE"), "").unwrap();
        assert_eq!(
            unique_name(dir.path().join("LICENSE"), ""),
            dir.path().join("LICENSE(1)")
        );
    }

    #[test]
    fn takes_first_free_counter_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("api.md"), "").unwrap();
        fs::write(dir.path().join("api(1).md"), "").unwrap();
        fs::write(dir.path().join("api(3).md"), "").unwrap();
        assert_eq!(
            unique_name(dir.path().join("api"), ".md"),
            dir.path().join("api(2).md")
        );
    }

    #[test]
    fn does_not_create_anything() {
        let dir = tempfile::tempdir().unwrap();
        let path = unique_name(dir.path().join("notes"), ".txt");
        assert!(!path.exists());
    }

    #[test]
    #[should_panic(expected = "file extension")]
    fn rejects_extension_without_dot() {
        let _ = unique_name("README", "md");
    }

    #[test]
    #[should_panic(expected = "file extension")]
    fn rejects_bare_dot_extension() {
        let _ = unique_name("nonexistent file", ".");
    }

    #[test]
    fn strips_illegal_characters() {
        assert_eq!(format_file_name("My API: v2/beta"), "My API v2beta");
        assert_eq!(format_file_name(r#"a<b>c"d|e?f*g\h"#), "abcdefgh");
    }

    #[test]
    fn trims_whitespace_and_trailing_dots() {
        assert_eq!(format_file_name("  Orders API...  "), "Orders API");
        assert_eq!(format_file_name("tab\there"), "tabhere");
    }

    #[test]
    fn sanitizing_can_yield_empty_name() {
        assert_eq!(format_file_name("???"), "");
        assert_eq!(format_file_name(""), "");
    }
}
