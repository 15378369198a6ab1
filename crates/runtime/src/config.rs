// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Network configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! name = "tiny-cnn"
//! seed = 42
//! input = [1, 8, 8]
//!
//! [[stages]]
//! type = "conv"
//! in_channels = 1
//! out_channels = 4
//! kernel = [3, 3]
//! padding = [1, 1]
//! weights = { kind = "gaussian", mean = 0.0, std = 0.1 }
//!
//! [[stages]]
//! type = "activation"
//! function = "relu"
//!
//! [[stages]]
//! type = "max_pool"
//! window = [2, 2]
//! stride = [2, 2]
//!
//! [[stages]]
//! type = "flatten"
//!
//! [[stages]]
//! type = "dense"
//! in_features = 64
//! out_features = 10
//! ```
//!
//! `stride` defaults to `[1, 1]`, `padding` to `[0, 0]`, `weights` to
//! `gaussian(0, 0.1)` and `bias` to `constant(0)`.

use std::path::Path;

use nn_layers::{Distribution, Padding, Stride};
use tensor_core::{Activation, Shape};

use crate::RuntimeError;

/// Configuration for a sequential network.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NetworkConfig {
    /// Human-readable network name.
    pub name: String,
    /// Seed for parameter initialization. `None` draws from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Input shape `[channels, height, width]`.
    pub input: [usize; 3],
    /// Stages in execution order.
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

/// One stage of a [`NetworkConfig`], tagged by `type`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageConfig {
    Conv {
        in_channels: usize,
        out_channels: usize,
        kernel: [usize; 2],
        #[serde(default)]
        stride: Stride,
        #[serde(default)]
        padding: Padding,
        #[serde(default = "default_weights")]
        weights: Distribution,
        #[serde(default = "default_bias")]
        bias: Distribution,
    },
    MaxPool {
        window: [usize; 2],
        #[serde(default)]
        stride: Stride,
        #[serde(default)]
        padding: Padding,
    },
    AvgPool {
        window: [usize; 2],
        #[serde(default)]
        stride: Stride,
        #[serde(default)]
        padding: Padding,
    },
    Flatten,
    Dense {
        in_features: usize,
        out_features: usize,
        #[serde(default = "default_weights")]
        weights: Distribution,
        #[serde(default = "default_bias")]
        bias: Distribution,
    },
    Activation {
        function: Activation,
    },
}

fn default_weights() -> Distribution {
    Distribution::Gaussian {
        mean: 0.0,
        std: 0.1,
    }
}

fn default_bias() -> Distribution {
    Distribution::Constant { value: 0.0 }
}

impl StageConfig {
    /// Returns the `type` tag of this stage.
    pub fn kind(&self) -> &'static str {
        match self {
            StageConfig::Conv { .. } => "conv",
            StageConfig::MaxPool { .. } => "max_pool",
            StageConfig::AvgPool { .. } => "avg_pool",
            StageConfig::Flatten => "flatten",
            StageConfig::Dense { .. } => "dense",
            StageConfig::Activation { .. } => "activation",
        }
    }
}

impl NetworkConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RuntimeError> {
        toml::from_str(toml_str)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RuntimeError> {
        toml::to_string_pretty(self)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// The declared input shape as a [`Shape`].
    pub fn input_shape(&self) -> Shape {
        let [c, h, w] = self.input;
        Shape::chw(c, h, w)
    }
}

impl Default for NetworkConfig {
    /// A small conv → relu → pool → dense → sigmoid classifier over 1×8×8 inputs.
    fn default() -> Self {
        Self {
            name: "tiny-cnn".to_string(),
            seed: Some(42),
            input: [1, 8, 8],
            stages: vec![
                StageConfig::Conv {
                    in_channels: 1,
                    out_channels: 4,
                    kernel: [3, 3],
                    stride: Stride::default(),
                    padding: Padding::uniform(1),
                    weights: default_weights(),
                    bias: default_bias(),
                },
                StageConfig::Activation {
                    function: Activation::Relu,
                },
                StageConfig::MaxPool {
                    window: [2, 2],
                    stride: Stride::uniform(2),
                    padding: Padding::NONE,
                },
                StageConfig::Flatten,
                StageConfig::Dense {
                    in_features: 64,
                    out_features: 10,
                    weights: default_weights(),
                    bias: default_bias(),
                },
                StageConfig::Activation {
                    function: Activation::Sigmoid,
                },
            ],
        }
    }
}
