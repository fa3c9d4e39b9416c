// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Choosing and opening the place rendered Markdown is written to.
//!
//! Output goes to stdout, to a path the user named, or to a fresh file named
//! after the collection. A named path that already exists is only replaced
//! when the caller confirms it.

use crate::naming::{format_file_name, unique_name};
use snafu::prelude::*;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, StdoutLock, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File stem used when the collection name sanitizes to nothing.
const FALLBACK_STEM: &str = "collection";

/// Error type for destination resolution failures.
#[derive(Debug, Snafu)]
pub enum DestinationError {
    /// The requested output file exists and replacing it was not confirmed.
    #[snafu(display(
        "file {:?} already exists. Run the command again with the --replace flag to confirm replacing it",
        path.display()
    ))]
    Exists {
        /// The existing file.
        path: PathBuf,
    },

    /// The output file could not be created.
    #[snafu(display("failed to create {}: {source}", path.display()))]
    Create {
        /// The file that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// What the user asked for as output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSpec {
    /// Write to stdout.
    Stdout,
    /// Write to a new file in the given directory, named after the collection.
    Auto(PathBuf),
    /// Write to exactly this path.
    Path(PathBuf),
}

impl OutputSpec {
    /// Interprets a command-line output argument.
    ///
    /// `-` means stdout, a missing or empty argument means an auto-named file
    /// in the working directory, and anything else is a path.
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("-") => Self::Stdout,
            None | Some("") => Self::Auto(PathBuf::new()),
            Some(path) => Self::Path(PathBuf::from(path)),
        }
    }
}

/// Where output ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Standard output.
    Stdout,
    /// A file on disk.
    File(PathBuf),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("-"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

enum Sink {
    Stdout(StdoutLock<'static>),
    File(BufWriter<File>),
}

/// An open, writable output.
///
/// The underlying handle is released when the value is dropped. Use
/// [`Destination::finish`] to flush after a successful write, or
/// [`Destination::discard`] to remove a partially written file.
pub struct Destination {
    target: Target,
    sink: Sink,
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl Destination {
    /// Where this destination writes to.
    #[must_use]
    pub const fn target(&self) -> &Target {
        &self.target
    }

    /// Flushes buffered output and closes the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> io::Result<Target> {
        self.flush()?;
        Ok(self.target)
    }

    /// Closes the destination and deletes the file behind it, if any.
    ///
    /// Stdout cannot be taken back and is left as is.
    pub fn discard(self) {
        let Self { target, sink } = self;
        drop(sink);
        if let Target::File(path) = target {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed partial output"),
                Err(err) => warn!(path = %path.display(), %err, "failed to remove partial output"),
            }
        }
    }
}

impl Write for Destination {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Stdout(out) => out.write(buf),
            Sink::File(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Stdout(out) => out.flush(),
            Sink::File(out) => out.flush(),
        }
    }
}

/// Returns the path an auto-named output file would get in `dir`.
///
/// The collection name is sanitized into a file name (falling back to
/// `collection`), given an `.md` extension, and numbered if taken.
#[must_use]
pub fn auto_path(dir: &Path, collection_name: &str) -> PathBuf {
    let stem = format_file_name(collection_name);
    let stem = if stem.is_empty() {
        FALLBACK_STEM
    } else {
        &stem
    };
    unique_name(dir.join(stem), ".md")
}

/// Opens the destination described by `spec`.
///
/// # Errors
///
/// Returns an error if `spec` names an existing file and `allow_overwrite`
/// is false, or if the output file cannot be created.
pub fn resolve(
    spec: &OutputSpec,
    collection_name: &str,
    allow_overwrite: bool,
) -> Result<Destination, DestinationError> {
    let path = match spec {
        OutputSpec::Stdout => {
            return Ok(Destination {
                target: Target::Stdout,
                sink: Sink::Stdout(io::stdout().lock()),
            });
        }
        OutputSpec::Auto(dir) => auto_path(dir, collection_name),
        OutputSpec::Path(path) => {
            ensure!(
                allow_overwrite || !path.exists(),
                ExistsSnafu { path: path.clone() }
            );
            path.clone()
        }
    };

    let file = File::create(&path).context(CreateSnafu { path: &path })?;
    debug!(path = %path.display(), "opened output file");
    Ok(Destination {
        target: Target::File(path),
        sink: Sink::File(BufWriter::new(file)),
    })
}
