// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Builds the default tiny CNN, runs one forward pass and prints the
//! per-stage shapes and timings.
//!
//! Run with: `cargo run -p runtime --example forward_pass`

use runtime::{Network, NetworkConfig, RuntimeError};
use tensor_core::Tensor;

fn main() -> Result<(), RuntimeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = NetworkConfig::default();
    let network = Network::from_config(&config)?.validate()?;

    // A diagonal stripe across the single input channel.
    let [c, h, w] = config.input;
    let mut input = Tensor::zeros(config.input_shape());
    for i in 0..h.min(w) {
        input.set(c - 1, i, i, 1.0);
    }

    let out = network.forward(&input)?;

    println!("Network '{}' ({} parameters)", network.name(), network.num_parameters());
    for m in &out.metrics.stage_metrics {
        println!(
            "  {:<14} {:<12} {:>8.3}ms",
            m.stage_name,
            m.output_shape.to_string(),
            m.compute_duration.as_secs_f64() * 1000.0
        );
    }
    println!("\n{}", out.metrics.summary());
    println!("output: {:?}", out.output.as_slice());
    Ok(())
}
