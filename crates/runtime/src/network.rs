// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sequential network with a type-state–enforced build pipeline.
//!
//! ```text
//! Network<Unchecked>
//!     │  .validate()   shapes propagated through every stage
//!     ▼
//! Network<Checked>
//!     │  .forward() / .forward_traced()
//!     ▼
//!   ForwardOutput
//! ```
//!
//! Only a checked network can run, so every stage is known to accept the
//! shape its predecessor produces before any arithmetic happens.

use std::marker::PhantomData;
use std::time::Instant;

use nn_layers::{
    Conv2d, ConvConfig, DenseConfig, Distribution, FullyConnected, Initializer, LayerError,
    Pool2d, PoolConfig, PoolKind,
};
use tensor_core::{flatten, Activation, Shape, Tensor};

use crate::{ForwardMetrics, NetworkConfig, NullSink, RuntimeError, StageConfig, TensorSink};

// ── Type-state markers ─────────────────────────────────────────

/// Stages have been assembled but shapes have not been checked.
#[derive(Debug)]
pub struct Unchecked;

/// Every stage accepts its predecessor's output shape.
#[derive(Debug)]
pub struct Checked;

/// Sealed trait for network states.
pub trait NetworkState: std::fmt::Debug + private::Sealed {}
impl NetworkState for Unchecked {}
impl NetworkState for Checked {}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Unchecked {}
    impl Sealed for super::Checked {}
}

// ── Stages ─────────────────────────────────────────────────────

/// One step of a sequential network.
#[derive(Debug, Clone)]
pub enum Stage {
    Conv(Conv2d),
    Pool(Pool2d),
    Flatten,
    Dense(FullyConnected),
    Activation(Activation),
}

impl Stage {
    /// Short kind name used in stage labels and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Stage::Conv(_) => "conv",
            Stage::Pool(p) => p.kind().as_str(),
            Stage::Flatten => "flatten",
            Stage::Dense(_) => "dense",
            Stage::Activation(_) => "activation",
        }
    }

    /// Shape this stage produces for an input of shape `input`.
    pub fn output_shape(&self, input: &Shape) -> Result<Shape, LayerError> {
        match self {
            Stage::Conv(conv) => conv.output_shape(input),
            Stage::Pool(pool) => pool.output_shape(input),
            Stage::Flatten => Ok(Shape::vector(input.num_elements())),
            Stage::Dense(dense) => dense.output_shape(input),
            Stage::Activation(_) => Ok(input.clone()),
        }
    }

    /// Runs the stage on `input`.
    pub fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        match self {
            Stage::Conv(conv) => conv.convolve(input),
            Stage::Pool(pool) => pool.pool(input),
            Stage::Flatten => Ok(flatten(input)?),
            Stage::Dense(dense) => dense.propagate(input),
            Stage::Activation(f) => Ok(f.apply(input)),
        }
    }

    /// Number of learnable parameters held by the stage.
    pub fn num_parameters(&self) -> usize {
        match self {
            Stage::Conv(conv) => conv.num_parameters(),
            Stage::Dense(dense) => dense.num_parameters(),
            Stage::Pool(_) | Stage::Flatten | Stage::Activation(_) => 0,
        }
    }
}

// ── Forward output ─────────────────────────────────────────────

/// The result of a single forward pass.
#[derive(Debug)]
pub struct ForwardOutput {
    /// Output of the final stage.
    pub output: Tensor,
    /// Per-stage timing and shapes.
    pub metrics: ForwardMetrics,
}

// ── Network ────────────────────────────────────────────────────

/// A named, ordered list of stages applied to a fixed input shape.
///
/// `S` is a type-state marker: stages can only be added while
/// [`Unchecked`], and only a [`Checked`] network can run.
///
/// # Example
/// ```
/// use runtime::{Network, Stage};
/// use tensor_core::{Activation, Shape, Tensor};
///
/// let net = Network::new("identity", Shape::chw(1, 2, 2))
///     .with_stage(Stage::Flatten)
///     .with_stage(Stage::Activation(Activation::Relu))
///     .validate()
///     .unwrap();
///
/// let x = Tensor::from_nested(&[vec![vec![1.0, -2.0], vec![-3.0, 4.0]]]).unwrap();
/// let y = net.forward(&x).unwrap().output;
/// assert_eq!(y.as_slice(), &[1.0, 0.0, 0.0, 4.0]);
/// ```
pub struct Network<S: NetworkState = Unchecked> {
    name: String,
    input_shape: Shape,
    stages: Vec<Stage>,
    /// Output shape of each stage, populated by `validate`.
    shapes: Vec<Shape>,
    _state: PhantomData<S>,
}

impl<S: NetworkState> Network<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_shape(&self) -> &Shape {
        &self.input_shape
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    /// Total number of learnable parameters across all stages.
    pub fn num_parameters(&self) -> usize {
        self.stages.iter().map(Stage::num_parameters).sum()
    }

    /// Label of stage `index`, e.g. `"2:max_pool"`.
    pub fn stage_label(&self, index: usize) -> String {
        match self.stages.get(index) {
            Some(stage) => format!("{index}:{}", stage.kind()),
            None => format!("{index}:?"),
        }
    }
}

// ── Unchecked ──────────────────────────────────────────────────

impl Network<Unchecked> {
    /// Creates an empty network over inputs of shape `input_shape`.
    pub fn new(name: impl Into<String>, input_shape: Shape) -> Self {
        Self {
            name: name.into(),
            input_shape,
            stages: Vec::new(),
            shapes: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Appends a stage.
    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Appends a stage, builder style.
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.push(stage);
        self
    }

    /// Mutable access to the stages, e.g. to load trained parameters.
    pub fn stages_mut(&mut self) -> &mut [Stage] {
        &mut self.stages
    }

    /// Builds a network from configuration and initializes every
    /// parameterised stage.
    ///
    /// With a configured `seed`, stage `i` draws its weights from
    /// `seed + 2i` and its biases from `seed + 2i + 1`, so the same file
    /// always yields the same parameters.
    pub fn from_config(config: &NetworkConfig) -> Result<Self, RuntimeError> {
        let mut network = Self::new(config.name.clone(), config.input_shape());

        for (index, stage_config) in config.stages.iter().enumerate() {
            let label = format!("{index}:{}", stage_config.kind());
            let stage = build_stage(stage_config, index, config.seed)
                .map_err(|source| RuntimeError::StageError { stage: label, source })?;
            network.push(stage);
        }

        tracing::info!(
            "network '{}' built: {} stages, {} parameters, seed {}",
            network.name,
            network.stages.len(),
            network.num_parameters(),
            config
                .seed
                .map_or_else(|| "entropy".to_string(), |s| s.to_string()),
        );
        Ok(network)
    }

    /// Propagates shapes from the input through every stage.
    ///
    /// Fails on the first stage that would reject its input, so a checked
    /// network cannot hit a shape error at run time.
    pub fn validate(self) -> Result<Network<Checked>, RuntimeError> {
        if self.stages.is_empty() {
            return Err(RuntimeError::InvalidNetwork(format!(
                "network '{}' contains no stages",
                self.name
            )));
        }
        if self.input_shape.rank() != 3 || self.input_shape.has_empty_axis() {
            return Err(RuntimeError::InvalidNetwork(format!(
                "input shape must be a non-empty [C, H, W], got {}",
                self.input_shape
            )));
        }

        let mut shapes = Vec::with_capacity(self.stages.len());
        let mut current = self.input_shape.clone();
        for (index, stage) in self.stages.iter().enumerate() {
            current = stage
                .output_shape(&current)
                .map_err(|source| RuntimeError::StageError {
                    stage: self.stage_label(index),
                    source,
                })?;
            tracing::debug!("stage {} → {}", self.stage_label(index), current);

            if index > 0 {
                if let (Stage::Activation(_), Stage::Activation(_)) =
                    (&self.stages[index - 1], stage)
                {
                    tracing::warn!(
                        "stage {} applies an activation directly after another",
                        self.stage_label(index)
                    );
                }
            }
            shapes.push(current.clone());
        }

        tracing::info!(
            "network '{}' validated: {} → {}",
            self.name,
            self.input_shape,
            current
        );

        Ok(Network {
            name: self.name,
            input_shape: self.input_shape,
            stages: self.stages,
            shapes,
            _state: PhantomData,
        })
    }
}

// ── Checked ────────────────────────────────────────────────────

impl Network<Checked> {
    /// Output shape of each stage, in order.
    pub fn stage_shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Shape of the final output.
    pub fn output_shape(&self) -> &Shape {
        // validate() rejects empty networks.
        self.shapes.last().unwrap_or(&self.input_shape)
    }

    /// Runs one forward pass.
    pub fn forward(&self, input: &Tensor) -> Result<ForwardOutput, RuntimeError> {
        self.forward_traced(input, &mut NullSink)
    }

    /// Runs one forward pass, handing the input (labelled `"input"`) and
    /// every stage output to `sink`.
    pub fn forward_traced(
        &self,
        input: &Tensor,
        sink: &mut dyn TensorSink,
    ) -> Result<ForwardOutput, RuntimeError> {
        if input.shape() != &self.input_shape {
            return Err(RuntimeError::InputShape {
                expected: self.input_shape.clone(),
                actual: input.shape().clone(),
            });
        }

        let run_start = Instant::now();
        let mut metrics = ForwardMetrics::new();
        sink.record("input", input)?;
        let mut current = input.clone();

        for (index, stage) in self.stages.iter().enumerate() {
            let label = self.stage_label(index);
            let stage_start = Instant::now();
            let output = stage
                .forward(&current)
                .map_err(|source| RuntimeError::StageError {
                    stage: label.clone(),
                    source,
                })?;
            let elapsed = stage_start.elapsed();

            tracing::debug!(
                "stage {label}: {} → {} in {:.3}ms",
                current.shape(),
                output.shape(),
                elapsed.as_secs_f64() * 1000.0,
            );
            sink.record(&label, &output)?;
            metrics.record_stage(label, output.shape().clone(), elapsed);
            current = output;
        }

        metrics.finalise(run_start.elapsed());
        tracing::debug!("{}", metrics.summary());

        Ok(ForwardOutput {
            output: current,
            metrics,
        })
    }
}

impl<S: NetworkState> std::fmt::Debug for Network<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("state", &std::any::type_name::<S>())
            .field("name", &self.name)
            .field("input_shape", &self.input_shape)
            .field("stages", &self.stages.len())
            .finish()
    }
}

// ── Construction from config ───────────────────────────────────

fn build_stage(config: &StageConfig, index: usize, seed: Option<u64>) -> Result<Stage, LayerError> {
    match *config {
        StageConfig::Conv {
            in_channels,
            out_channels,
            kernel,
            stride,
            padding,
            weights,
            bias,
        } => {
            let mut conv = Conv2d::new(ConvConfig {
                in_channels,
                out_channels,
                kernel,
                stride,
                padding,
            })?;
            let (mut w, mut b) = initializers(weights, bias, index, seed)?;
            conv.initialize(&mut w, &mut b);
            Ok(Stage::Conv(conv))
        }
        StageConfig::MaxPool {
            window,
            stride,
            padding,
        } => pool(PoolKind::Max, window, stride, padding),
        StageConfig::AvgPool {
            window,
            stride,
            padding,
        } => pool(PoolKind::Average, window, stride, padding),
        StageConfig::Flatten => Ok(Stage::Flatten),
        StageConfig::Dense {
            in_features,
            out_features,
            weights,
            bias,
        } => {
            let mut dense = FullyConnected::new(DenseConfig {
                in_features,
                out_features,
            })?;
            let (mut w, mut b) = initializers(weights, bias, index, seed)?;
            dense.initialize(&mut w, &mut b);
            Ok(Stage::Dense(dense))
        }
        StageConfig::Activation { function } => Ok(Stage::Activation(function)),
    }
}

fn pool(
    kind: PoolKind,
    window: [usize; 2],
    stride: nn_layers::Stride,
    padding: tensor_core::Padding,
) -> Result<Stage, LayerError> {
    let config = PoolConfig {
        window,
        stride,
        padding,
    };
    Ok(Stage::Pool(Pool2d::new(kind, config)?))
}

fn initializers(
    weights: Distribution,
    bias: Distribution,
    index: usize,
    seed: Option<u64>,
) -> Result<(Initializer, Initializer), LayerError> {
    match seed {
        Some(seed) => {
            let base = seed.wrapping_add(2 * index as u64);
            Ok((
                Initializer::seeded(weights, base)?,
                Initializer::seeded(bias, base.wrapping_add(1))?,
            ))
        }
        None => Ok((Initializer::new(weights)?, Initializer::new(bias)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nn_layers::Stride;
    use tensor_core::Padding;

    fn ones_conv(in_channels: usize, out_channels: usize, kernel: usize) -> Conv2d {
        let mut conv = Conv2d::new(ConvConfig::new(in_channels, out_channels, kernel)).unwrap();
        conv.filters_mut().fill(1.0);
        conv
    }

    #[test]
    fn test_validate_propagates_shapes() {
        let net = Network::new("shapes", Shape::chw(2, 6, 6))
            .with_stage(Stage::Conv(ones_conv(2, 3, 3)))
            .with_stage(Stage::Pool(Pool2d::max(PoolConfig::square(2)).unwrap()))
            .with_stage(Stage::Flatten)
            .with_stage(Stage::Activation(Activation::Sigmoid))
            .validate()
            .unwrap();

        assert_eq!(
            net.stage_shapes(),
            &[
                Shape::chw(3, 4, 4),
                Shape::chw(3, 2, 2),
                Shape::vector(12),
                Shape::vector(12),
            ]
        );
        assert_eq!(net.output_shape(), &Shape::vector(12));
    }

    #[test]
    fn test_validate_reports_failing_stage() {
        // 5x5 input, 2x2 window with stride 2 does not tile.
        let pool = Pool2d::max(PoolConfig::square(2)).unwrap();
        let err = Network::new("bad", Shape::chw(1, 5, 5))
            .with_stage(Stage::Activation(Activation::Relu))
            .with_stage(Stage::Pool(pool))
            .validate()
            .unwrap_err();

        match err {
            RuntimeError::StageError { stage, source } => {
                assert_eq!(stage, "1:max_pool");
                assert!(matches!(source, LayerError::StrideMismatch { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_empty() {
        let err = Network::new("empty", Shape::chw(1, 2, 2)).validate().unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidNetwork(_)));

        let err = Network::new("flat", Shape::vector(4))
            .with_stage(Stage::Flatten)
            .validate()
            .unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidNetwork(_)));
    }

    #[test]
    fn test_dense_requires_flatten() {
        let dense = FullyConnected::new(DenseConfig {
            in_features: 4,
            out_features: 2,
        })
        .unwrap();
        let err = Network::new("no-flatten", Shape::chw(1, 2, 2))
            .with_stage(Stage::Dense(dense))
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::StageError {
                source: LayerError::ShapeMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_forward_conv_then_pool() {
        let net = Network::new("sum-pool", Shape::chw(1, 4, 4))
            .with_stage(Stage::Conv(ones_conv(1, 1, 1)))
            .with_stage(Stage::Pool(Pool2d::average(PoolConfig::square(2)).unwrap()))
            .validate()
            .unwrap();

        let input = Tensor::from_vec(Shape::chw(1, 4, 4), (1..=16).map(f64::from).collect())
            .unwrap();
        let out = net.forward(&input).unwrap();
        assert_eq!(out.output.shape(), &Shape::chw(1, 2, 2));
        assert_eq!(out.output.as_slice(), &[3.5, 5.5, 11.5, 13.5]);
        assert_eq!(out.metrics.stage_metrics.len(), 2);
    }

    #[test]
    fn test_forward_rejects_wrong_input() {
        let net = Network::new("n", Shape::chw(1, 2, 2))
            .with_stage(Stage::Flatten)
            .validate()
            .unwrap();
        let err = net.forward(&Tensor::zeros(Shape::chw(1, 3, 3))).unwrap_err();
        assert!(matches!(err, RuntimeError::InputShape { .. }));
    }

    #[test]
    fn test_forward_traced_records_every_stage() {
        let net = Network::new("traced", Shape::chw(1, 2, 2))
            .with_stage(Stage::Flatten)
            .with_stage(Stage::Activation(Activation::Relu))
            .validate()
            .unwrap();
        let input = Tensor::from_nested(&[vec![vec![-1.0, 2.0], vec![3.0, -4.0]]]).unwrap();

        let mut sink: Vec<(String, Tensor)> = Vec::new();
        let out = net.forward_traced(&input, &mut sink).unwrap();

        assert_eq!(sink.len(), 3);
        assert_eq!(sink[0].0, "input");
        assert_eq!(sink[0].1, input);
        assert_eq!(sink[1].0, "0:flatten");
        assert_eq!(sink[1].1.as_slice(), &[-1.0, 2.0, 3.0, -4.0]);
        assert_eq!(sink[2].0, "1:activation");
        assert_eq!(sink[2].1, out.output);
    }

    #[test]
    fn test_from_config_seeded_is_deterministic() {
        let config = NetworkConfig::default();
        let a = Network::from_config(&config).unwrap();
        let b = Network::from_config(&config).unwrap();

        match (&a.stages()[0], &b.stages()[0]) {
            (Stage::Conv(x), Stage::Conv(y)) => {
                assert_eq!(x.filters(), y.filters());
                assert!(x.filters().as_slice().iter().any(|&v| v != 0.0));
            }
            _ => panic!("first stage should be conv"),
        }
        assert_eq!(a.num_parameters(), 4 * 9 + 4 + 64 * 10 + 10);
    }

    #[test]
    fn test_from_config_invalid_stage() {
        let mut config = NetworkConfig::default();
        config.stages[0] = StageConfig::Conv {
            in_channels: 1,
            out_channels: 4,
            kernel: [3, 3],
            stride: Stride::new(0, 1),
            padding: Padding::NONE,
            weights: Distribution::Constant { value: 0.0 },
            bias: Distribution::Constant { value: 0.0 },
        };
        let err = Network::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::StageError { ref stage, .. } if stage == "0:conv"
        ));
    }

    #[test]
    fn test_from_config_bad_distribution() {
        let mut config = NetworkConfig::default();
        config.stages[4] = StageConfig::Dense {
            in_features: 64,
            out_features: 10,
            weights: Distribution::Uniform { min: 1.0, max: 1.0 },
            bias: Distribution::Constant { value: 0.0 },
        };
        let err = Network::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::StageError {
                source: LayerError::InvalidConfig { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_stage_kind_labels() {
        let net = Network::new("labels", Shape::chw(1, 2, 2))
            .with_stage(Stage::Pool(Pool2d::average(PoolConfig::square(1)).unwrap()));
        assert_eq!(net.stage_label(0), "0:avg_pool");
        assert_eq!(net.stage_label(5), "5:?");
    }
}
