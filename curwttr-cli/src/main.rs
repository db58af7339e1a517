//! Binary crate for the `curwttr` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Turning a failed run into a logged line and an exit code
//! - Interactive configuration

use clap::Parser;
use std::process::ExitCode;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
