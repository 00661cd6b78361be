//! Cosmos CLI - static HTML documentation for Cosmos projects.
//!
//! Walks a Cosmos project, renders the Hiera data of every host and common
//! directory, the global data and the Puppet rules into HTML pages, and
//! writes a categorized index.

mod build;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use build::BuildArgs;
use output::Output;

/// Cosmos - browse a configuration project as a static site.
#[derive(Parser)]
#[command(name = "cosmos", version, about)]
struct Cli {
    #[command(flatten)]
    build: BuildArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.build.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.build.execute() {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
