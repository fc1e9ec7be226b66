// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use tfsync::Cli;

fn main() {
    let cli = Cli::parse();
    let log_path = tfsync::configured_log_path();
    tfsync::logging::setup_logging(cli.verbose, log_path.as_deref());

    if let Err(e) = tfsync::run(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
