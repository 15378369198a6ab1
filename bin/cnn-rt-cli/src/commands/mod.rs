// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared CLI helpers.

pub mod dump;
pub mod inspect;
pub mod run;

use std::path::Path;

use anyhow::Context;
use runtime::NetworkConfig;
use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber whose level follows the `-v` count.
///
/// `RUST_LOG`, when set, takes precedence.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the network configuration at `path`, or the built-in demo network.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<NetworkConfig> {
    match path {
        Some(path) => NetworkConfig::from_file(path)
            .with_context(|| format!("failed to load network from '{}'", path.display())),
        None => {
            tracing::info!("no --config given, using the built-in demo network");
            Ok(NetworkConfig::default())
        }
    }
}

/// Prints the boxed command banner.
pub fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║{:^54}║", format!("cnn-rt · {title}"));
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}
