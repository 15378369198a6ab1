// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `cnn-rt run` command: execute one forward pass.
//!
//! Walks the full type-state pipeline:
//! ```text
//! NetworkConfig → Network<Unchecked> → validate → Network<Checked> → forward
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use nn_layers::{Distribution, Initializer};
use runtime::{ForwardOutput, Network, NullSink};
use tensor_core::{Shape, Tensor};

use super::dump::TextDump;

pub fn execute(
    config_path: Option<PathBuf>,
    input_path: Option<PathBuf>,
    seed: Option<u64>,
    dump: bool,
) -> anyhow::Result<()> {
    super::banner("Forward Pass");

    // ── Configuration ──────────────────────────────────────────
    let mut config = super::load_config(config_path.as_deref())?;
    if seed.is_some() {
        config.seed = seed;
    }

    println!("  Config:");
    println!(
        "   Network: {}",
        config_path
            .as_deref()
            .map_or_else(|| "<built-in>".to_string(), |p| p.display().to_string())
    );
    println!("   Name:    {}", config.name);
    println!("   Input:   {}", config.input_shape());
    println!(
        "   Seed:    {}",
        config
            .seed
            .map_or_else(|| "entropy".to_string(), |s| s.to_string())
    );
    println!();

    // ── Type-State Pipeline ────────────────────────────────────
    println!("  [1/3] Building and initializing {} stages...", config.stages.len());
    let network = Network::from_config(&config)?;
    println!("        {} parameters.", network.num_parameters());
    println!();

    println!("  [2/3] Validating shapes...");
    let network = network.validate()?;
    println!(
        "        {} → {}",
        network.input_shape(),
        network.output_shape()
    );
    println!();

    let input = match input_path.as_deref() {
        Some(path) => read_input(path)?,
        None => generated_input(config.input_shape(), config.seed.unwrap_or(0))?,
    };

    println!("  [3/3] Running forward pass...");
    let output = if dump {
        println!();
        let stdout = std::io::stdout();
        let mut sink = TextDump::new(stdout.lock());
        network.forward_traced(&input, &mut sink)?
    } else {
        network.forward_traced(&input, &mut NullSink)?
    };
    println!();

    print_results(&output);
    Ok(())
}

/// Reads a `[C][H][W]` nested JSON array.
fn read_input(path: &Path) -> anyhow::Result<Tensor> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read input '{}'", path.display()))?;
    let nested: Vec<Vec<Vec<f64>>> = serde_json::from_str(&text)
        .with_context(|| format!("input '{}' is not a [C][H][W] JSON array", path.display()))?;
    let tensor = Tensor::from_nested(&nested)?;
    tracing::info!("loaded input {} from '{}'", tensor.shape(), path.display());
    Ok(tensor)
}

/// Uniform `(0, 1]` input of the given shape.
fn generated_input(shape: Shape, seed: u64) -> anyhow::Result<Tensor> {
    let mut init = Initializer::seeded(Distribution::Uniform { min: 0.0, max: 1.0 }, seed)?;
    tracing::info!("generated uniform input {shape} (seed {seed})");
    Ok(init.tensor(shape))
}

fn print_results(output: &ForwardOutput) {
    println!("  Stages:");
    println!("   {:<16} {:<14} {:>10}", "Stage", "Output", "Time");
    println!("   {}", "-".repeat(42));
    for m in &output.metrics.stage_metrics {
        println!(
            "   {:<16} {:<14} {:>8.3}ms",
            m.stage_name,
            m.output_shape.to_string(),
            m.compute_duration.as_secs_f64() * 1000.0,
        );
    }
    println!();

    println!("  Output {}:", output.output.shape());
    let values: Vec<String> = output
        .output
        .as_slice()
        .iter()
        .map(|v| format!("{v:.6}"))
        .collect();
    for chunk in values.chunks(8) {
        println!("   {}", chunk.join(" "));
    }
    println!();

    println!("  {}", output.metrics.summary());
}
