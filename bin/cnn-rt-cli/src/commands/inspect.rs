// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `cnn-rt inspect` command: display network structure.
//!
//! Propagates shapes stage by stage and prints each stage's output shape
//! and parameter count, marking the first stage that rejects its input.

use std::path::PathBuf;

use runtime::{Network, Stage};

pub fn execute(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    super::banner("Network Inspector");

    let config = super::load_config(config_path.as_deref())?;
    let network = Network::from_config(&config)?;

    // ── Summary ────────────────────────────────────────────────
    println!("  Network: {}", network.name());
    println!("  Input:   {}", network.input_shape());
    println!("  Stages:  {}", network.num_stages());
    println!("  Params:  {}", network.num_parameters());
    println!();

    // ── Per-Stage Detail ───────────────────────────────────────
    println!(
        "  {:<4} {:<12} {:<28} {:<14} {:>8}",
        "Idx", "Kind", "Detail", "Output", "Params",
    );
    println!("  {}", "-".repeat(70));

    let mut shape = network.input_shape().clone();
    for (index, stage) in network.stages().iter().enumerate() {
        match stage.output_shape(&shape) {
            Ok(next) => {
                println!(
                    "  {:<4} {:<12} {:<28} {:<14} {:>8}",
                    index,
                    stage.kind(),
                    truncate(&detail(stage), 28),
                    next.to_string(),
                    stage.num_parameters(),
                );
                shape = next;
            }
            Err(e) => {
                println!(
                    "  {:<4} {:<12} {:<28} ✗ {e}",
                    index,
                    stage.kind(),
                    truncate(&detail(stage), 28),
                );
                println!();
                anyhow::bail!("stage {} rejects input {shape}", network.stage_label(index));
            }
        }
    }
    println!();

    let network = network.validate()?;
    println!("  Valid: {} → {}", network.input_shape(), network.output_shape());
    println!();

    Ok(())
}

fn detail(stage: &Stage) -> String {
    match stage {
        Stage::Conv(conv) => {
            let (kh, kw) = conv.kernel();
            format!(
                "{}→{} {kh}x{kw} s{} p{}",
                conv.in_channels(),
                conv.out_channels(),
                conv.stride(),
                conv.padding(),
            )
        }
        Stage::Pool(pool) => {
            let w = pool.window();
            format!("{}x{} s{} p{}", w.height(), w.width(), w.stride(), w.padding())
        }
        Stage::Flatten => String::new(),
        Stage::Dense(dense) => format!("{}→{}", dense.in_features(), dense.out_features()),
        Stage::Activation(f) => f.to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}
