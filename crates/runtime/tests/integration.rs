// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: end-to-end forward-pass pipeline.
//!
//! These tests exercise the complete flow from TOML configuration →
//! network construction → shape validation → forward pass, proving that
//! the three library crates compose correctly.

use nn_layers::{Conv2d, ConvConfig, LayerError, Padding};
use runtime::{Network, NetworkConfig, RuntimeError, Stage};
use tensor_core::{Shape, Tensor};

// ── Helpers ────────────────────────────────────────────────────

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn build(toml: &str) -> Network<runtime::Checked> {
    let config = NetworkConfig::from_toml(toml).expect("config should parse");
    Network::from_config(&config)
        .and_then(|n| n.validate())
        .expect("network should validate")
}

/// Input `[1, 4, 4]` holding 1..=16 in row-major order.
fn ramp_4x4() -> Tensor {
    Tensor::from_vec(Shape::chw(1, 4, 4), (1..=16).map(f64::from).collect()).unwrap()
}

/// Conv → avg pool → flatten → dense → activation with constant parameters,
/// so every output can be worked out by hand.
const HAND_CHECKED: &str = r#"
name = "hand-checked"
seed = 7
input = [1, 4, 4]

[[stages]]
type = "conv"
in_channels = 1
out_channels = 2
kernel = [2, 2]
stride = [2, 2]
weights = { kind = "constant", value = 1.0 }

[[stages]]
type = "avg_pool"
window = [2, 2]
stride = [2, 2]

[[stages]]
type = "flatten"

[[stages]]
type = "dense"
in_features = 2
out_features = 3
weights = { kind = "constant", value = 0.5 }
bias = { kind = "constant", value = -30.0 }

[[stages]]
type = "activation"
function = "relu"
"#;

// ── Tests ──────────────────────────────────────────────────────

#[test]
fn test_end_to_end_hand_checked() {
    let net = build(HAND_CHECKED);
    assert_eq!(net.output_shape(), &Shape::vector(3));

    let out = net.forward(&ramp_4x4()).unwrap();

    // conv: 2x2 block sums [14, 22, 46, 54] per filter
    // avg_pool: 34 per channel
    // dense: 0.5 * (34 + 34) - 30 = 4
    assert_eq!(out.output.shape(), &Shape::vector(3));
    for &y in out.output.as_slice() {
        assert!(approx_eq(y, 4.0), "got {y}");
    }

    let shapes: Vec<_> = out
        .metrics
        .stage_metrics
        .iter()
        .map(|m| m.output_shape.clone())
        .collect();
    assert_eq!(
        shapes,
        vec![
            Shape::chw(2, 2, 2),
            Shape::chw(2, 1, 1),
            Shape::vector(2),
            Shape::vector(3),
            Shape::vector(3),
        ]
    );
}

#[test]
fn test_intermediates_match_hand_computation() {
    let net = build(HAND_CHECKED);
    let mut sink: Vec<(String, Tensor)> = Vec::new();
    net.forward_traced(&ramp_4x4(), &mut sink).unwrap();

    let labels: Vec<&str> = sink.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(
        labels,
        ["input", "0:conv", "1:avg_pool", "2:flatten", "3:dense", "4:activation"]
    );
    assert_eq!(sink[1].1.channel(0), &[14.0, 22.0, 46.0, 54.0]);
    assert_eq!(sink[1].1.channel(1), &[14.0, 22.0, 46.0, 54.0]);
    assert_eq!(sink[3].1.as_slice(), &[34.0, 34.0]);
}

#[test]
fn test_negative_preactivation_clamped() {
    let toml = HAND_CHECKED.replace("value = -30.0", "value = -40.0");
    let out = build(&toml).forward(&ramp_4x4()).unwrap();
    assert_eq!(out.output.as_slice(), &[0.0, 0.0, 0.0]);
}

#[test]
fn test_padded_two_channel_conv() {
    // Two channels of [[1, 2], [2, 1]], two 3x3 filters, padding (1, 1).
    let conv = Conv2d::new(ConvConfig::new(2, 2, 3).with_padding(Padding::uniform(1))).unwrap();
    let net = Network::new("padded", Shape::chw(2, 2, 2))
        .with_stage(Stage::Conv(conv))
        .validate()
        .unwrap();

    let input = Tensor::from_nested(&[
        vec![vec![1.0, 2.0], vec![2.0, 1.0]],
        vec![vec![1.0, 2.0], vec![2.0, 1.0]],
    ])
    .unwrap();
    let out = net.forward(&input).unwrap();
    assert_eq!(out.output.shape(), &Shape::chw(2, 2, 2));
}

#[test]
fn test_channel_mismatch_reported_at_validation() {
    let toml = r#"
name = "mismatch"
input = [1, 4, 4]

[[stages]]
type = "conv"
in_channels = 3
out_channels = 2
kernel = [3, 3]
"#;
    let config = NetworkConfig::from_toml(toml).unwrap();
    let err = Network::from_config(&config)
        .and_then(|n| n.validate())
        .unwrap_err();

    match err {
        RuntimeError::StageError { stage, source } => {
            assert_eq!(stage, "0:conv");
            assert!(matches!(source, LayerError::ShapeMismatch { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_stride_mismatch_reported_at_validation() {
    let toml = r#"
name = "untiled"
input = [1, 5, 5]

[[stages]]
type = "max_pool"
window = [2, 2]
stride = [2, 2]
"#;
    let config = NetworkConfig::from_toml(toml).unwrap();
    let err = Network::from_config(&config)
        .and_then(|n| n.validate())
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::StageError {
            source: LayerError::StrideMismatch { .. },
            ..
        }
    ));
}

#[test]
fn test_seeded_networks_are_reproducible() {
    let config = NetworkConfig::default();
    let a = Network::from_config(&config).unwrap().validate().unwrap();
    let b = Network::from_config(&config).unwrap().validate().unwrap();

    let input = Tensor::filled(config.input_shape(), 0.25);
    let ya = a.forward(&input).unwrap().output;
    let yb = b.forward(&input).unwrap().output;
    assert_eq!(ya, yb);

    let mut other = config.clone();
    other.seed = Some(43);
    let c = Network::from_config(&other).unwrap().validate().unwrap();
    assert_ne!(c.forward(&input).unwrap().output, ya);
}

#[test]
fn test_default_network_outputs_probabilities() {
    let config = NetworkConfig::default();
    let net = Network::from_config(&config).unwrap().validate().unwrap();
    let input = Tensor::filled(config.input_shape(), 1.0);

    let out = net.forward(&input).unwrap();
    assert_eq!(out.output.shape(), &Shape::vector(10));
    assert!(out.output.as_slice().iter().all(|&p| p > 0.0 && p < 1.0));
    assert!(out.metrics.summary().contains("6 stages"));
}

#[test]
fn test_unseeded_network_builds() {
    let mut config = NetworkConfig::default();
    config.seed = None;
    let net = Network::from_config(&config).unwrap().validate().unwrap();
    assert_eq!(net.num_parameters(), 4 * 9 + 4 + 64 * 10 + 10);
}

#[test]
fn test_json_input() {
    let json = "[[[1.0, 2.0], [3.0, 4.0]]]";
    let nested: Vec<Vec<Vec<f64>>> = serde_json::from_str(json).unwrap();
    let input = Tensor::from_nested(&nested).unwrap();

    let net = Network::new("json", Shape::chw(1, 2, 2))
        .with_stage(Stage::Flatten)
        .validate()
        .unwrap();
    let out = net.forward(&input).unwrap();
    assert_eq!(out.output.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_wrong_input_shape() {
    let net = build(HAND_CHECKED);
    let err = net.forward(&Tensor::zeros(Shape::chw(2, 4, 4))).unwrap_err();
    assert!(matches!(err, RuntimeError::InputShape { .. }));
}
