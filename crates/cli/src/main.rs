// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! testdriver binary entry point.

use clap::Parser;

use testdriver::app::{print_report, App};
use testdriver::cli::Cli;
use testdriver::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let app = match App::from_cli(cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("testdriver: {}", e);
            std::process::exit(1);
        }
    };

    match app.execute().await {
        Ok(report) => {
            print_report(&report, &mut std::io::stdout(), &mut std::io::stderr())?;
            Ok(())
        }
        Err(e) => {
            eprintln!("testdriver: {}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr, filtered by `TESTDRIVER_LOG` (default: warn)
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(env::TESTDRIVER_LOG)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}
