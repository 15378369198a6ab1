// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cnn-rt
//!
//! Command-line interface for the cnn-rt forward-pass engine.
//!
//! ## Usage
//! ```bash
//! # Run the built-in demo network on a generated input
//! cnn-rt run
//!
//! # Run a configured network on a JSON input, dumping every stage
//! cnn-rt run --config ./net.toml --input ./x.json --dump
//!
//! # Show per-stage shapes and parameter counts
//! cnn-rt inspect --config ./net.toml
//! ```

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cnn-rt",
    about = "Forward-pass engine for small convolutional networks",
    version,
    author
)]
struct Cli {
    /// Path to a TOML network configuration (defaults to a built-in demo network).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one forward pass and print the output.
    Run {
        /// JSON file holding the input as nested `[C][H][W]` arrays.
        /// A seeded uniform input is generated when omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Override the configuration's initialization seed.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the input and every intermediate tensor.
        #[arg(short, long)]
        dump: bool,
    },

    /// Validate a network and print per-stage shapes and parameter counts.
    Inspect,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { input, seed, dump } => {
            commands::run::execute(cli.config, input, seed, dump)
        }
        Commands::Inspect => commands::inspect::execute(cli.config),
    }
}
