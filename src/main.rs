// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for pm2md.
//!
//! This binary provides the `pm2md` command for converting Postman
//! collection exports from JSON to Markdown documentation.

use lexopt::prelude::*;
use pm2md::convert::{self, ConvertError, ConvertOptions};
use pm2md::destination::{OutputSpec, Target};
use pm2md::renderer::{self, RenderTemplate, TemplateLoadError};
use pm2md::status::{self, StatusRangeError};
use snafu::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[allow(clippy::struct_excessive_bools)]
struct Cli {
    input: Option<String>,
    output: Option<String>,
    statuses: String,
    template: Option<PathBuf>,
    get_template: bool,
    replace: bool,
    verbose: bool,
    quiet: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("an input file is required"))]
    NoInputFile,

    #[snafu(display("{path:?} must be \"-\" or end with \".json\""))]
    InvalidInputPath { path: String },

    #[snafu(display("invalid --statuses value: {source}"))]
    InvalidStatuses { source: StatusRangeError },

    #[snafu(display("failed to read {path}: {source}"))]
    ReadInput {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("failed to load template: {source}"))]
    LoadTemplate { source: TemplateLoadError },

    #[snafu(display("failed to create template file: {source}"))]
    ExportTemplate { source: std::io::Error },

    #[snafu(display("conversion failed: {source}"))]
    Convert { source: ConvertError },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert a Postman collection to Markdown documentation

You can get a JSON file from Postman by exporting a collection as a v2.1.0 collection.

Usage: {name} [OPTIONS] <INPUT> [OUTPUT]

Arguments:
  <INPUT>   Postman export ending in .json, or - for stdin
  [OUTPUT]  Output file, or - for stdout (default: named after the collection)

Options:
  -s, --statuses <RANGES>  Include only the sample responses with status codes
                           in the given range(s), e.g. 200-299,404
  -t, --template <PATH>    Use a custom template (must end with .tmpl)
  -g, --get-template       Create a file of the default template for customization
  -v, --verbose            Print debug logging to stderr
  -q, --quiet              Suppress progress messages
  -h, --help               Print help
  -V, --version            Print version

Examples:
  {name} collection.json
  {name} collection.json documentation.md
  {name} collection.json -
  {name} collection.json --statuses=200-299,400-499",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut positional = Vec::new();
    let mut statuses = String::new();
    let mut template = None;
    let mut get_template = false;
    let mut replace = false;
    let mut verbose = false;
    let mut quiet = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('s') | Long("statuses") => statuses = parser.value()?.string()?,
            Short('t') | Long("template") => template = Some(PathBuf::from(parser.value()?)),
            Short('g') | Long("get-template") => get_template = true,
            // Hidden from --help
            Long("replace") => replace = true,
            Short('v') | Long("verbose") => verbose = true,
            Short('q') | Long("quiet") => quiet = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) if positional.len() < 2 => positional.push(val.string()?),
            _ => return Err(arg.unexpected()),
        }
    }

    let mut positional = positional.into_iter();
    Ok(Cli {
        input: positional.next(),
        output: positional.next(),
        statuses,
        template,
        get_template,
        replace,
        verbose,
        quiet,
    })
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

#[snafu::report]
fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;
    init_logging(cli.verbose);

    if cli.get_template {
        let path = renderer::export_default_template(Path::new("")).context(ExportTemplateSnafu)?;
        if !cli.quiet {
            eprintln!("Created {:?}", path.display());
        }
        if cli.input.is_none() {
            return Ok(());
        }
    }

    let input = cli.input.as_deref().context(NoInputFileSnafu)?;
    ensure!(
        input == "-" || input.to_lowercase().ends_with(".json"),
        InvalidInputPathSnafu { path: input }
    );

    let statuses = status::parse_status_ranges(&cli.statuses)
        .context(InvalidStatusesSnafu)?
        .unwrap_or_default();

    let template = match &cli.template {
        Some(path) => RenderTemplate::load(path).context(LoadTemplateSnafu)?,
        None => RenderTemplate::default_template(),
    };

    let json = read_input(input)?;

    let opts = ConvertOptions {
        output: OutputSpec::from_arg(cli.output.as_deref()),
        statuses,
        template,
        allow_overwrite: cli.replace,
    };
    let target = convert::convert(&json, &opts).context(ConvertSnafu)?;

    if let Target::File(path) = target
        && !cli.quiet
    {
        eprintln!("Created {:?}", path.display());
    }
    Ok(())
}

/// Reads the collection from a file, or from stdin when `input` is `-`.
fn read_input(input: &str) -> Result<Vec<u8>, Error> {
    if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context(ReadInputSnafu { path: "stdin" })?;
        Ok(buf)
    } else {
        std::fs::read(input).context(ReadInputSnafu { path: input })
    }
}
