// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! objtri: triangulate polygon faces in Wavefront OBJ files.
//!
//! Usage:
//!   objtri model.obj
//!   objtri model.obj converted.obj
//!   objtri model.obj /path/to/output/
//!
//! Without a target, the output lands next to the source as
//! `<stem>.triangulated.obj`.

mod paths;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use objtri_core::{Converter, Error};
use tracing_subscriber::EnvFilter;

/// Triangulates polygon faces in Wavefront OBJ files
#[derive(Parser, Debug)]
#[command(name = "objtri")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source OBJ file
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Target OBJ file or directory (defaults to <stem>.triangulated.obj)
    #[arg(value_name = "TARGET")]
    target: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let target = match paths::resolve(&cli.source, cli.target.as_deref()) {
        Ok(target) => target,
        Err(error) => {
            eprintln!("Error: {error}");
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!(target = %target.display(), "resolved target path");

    let started = Instant::now();
    let mut converter = Converter::new();

    match converter.convert(&cli.source, &target) {
        Ok(()) => {
            println!("{} has been triangulated", cli.source.display());
            report::print(&cli.source, &target, converter.metrics(), started.elapsed());
            ExitCode::SUCCESS
        }
        Err(Error::NotTriangulatable) => {
            println!(
                "{} can not be triangulated (no polygons)",
                cli.source.display()
            );
            ExitCode::FAILURE
        }
        Err(error) => {
            println!(
                "{} can not be triangulated ({error})",
                cli.source.display()
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
