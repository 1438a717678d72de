//! # Kustomize Mirror CLI
//!
//! Binary entry point for the `kustomize-mirror` command-line tool. It parses
//! arguments with `clap`, initializes logging and dispatches to the command
//! implementations. The staging logic itself lives in the library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
