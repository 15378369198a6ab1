// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Parameter initialization.
//!
//! A [`Distribution`] describes how one scalar is drawn; an [`Initializer`]
//! pairs it with its own random source and writes draws into weight or bias
//! tensors through an exclusive borrow. Every element is visited exactly
//! once and draws are independent, so traversal order does not matter.

use std::f64::consts::PI;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tensor_core::{Shape, Tensor};

use crate::LayerError;

/// Sampling strategy for a single scalar.
///
/// Serialised as a tagged table, e.g. `{ kind = "uniform", min = -0.5, max = 0.5 }`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// Uniform over the half-open interval `(min, max]`.
    Uniform { min: f64, max: f64 },
    /// Normal distribution via the Box–Muller transform.
    Gaussian { mean: f64, std: f64 },
    /// Always `value`.
    Constant { value: f64 },
}

impl Distribution {
    /// Checks that the parameters describe a proper distribution.
    pub fn validate(&self) -> Result<(), LayerError> {
        let bad = |detail: String| {
            Err(LayerError::InvalidConfig {
                layer: "initializer",
                detail,
            })
        };
        match *self {
            Distribution::Uniform { min, max } => {
                if !(min.is_finite() && max.is_finite()) || min >= max {
                    return bad(format!("uniform bounds must satisfy min < max, got ({min}, {max}]"));
                }
            }
            Distribution::Gaussian { mean, std } => {
                if !(mean.is_finite() && std.is_finite()) || std < 0.0 {
                    return bad(format!("gaussian needs finite mean and std >= 0, got N({mean}, {std})"));
                }
            }
            Distribution::Constant { value } => {
                if !value.is_finite() {
                    return bad(format!("constant must be finite, got {value}"));
                }
            }
        }
        Ok(())
    }

    /// Draws one value from `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Distribution::Uniform { min, max } => {
                // u in [0, 1) so 1 - u in (0, 1]: the result lands in (min, max].
                let u: f64 = rng.gen();
                (1.0 - u) * (max - min) + min
            }
            Distribution::Gaussian { mean, std } => {
                let u1 = 1.0 - rng.gen::<f64>();
                let u2 = 1.0 - rng.gen::<f64>();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).sin();
                mean + std * z
            }
            Distribution::Constant { value } => value,
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Uniform { min, max } => write!(f, "uniform({min}, {max}]"),
            Distribution::Gaussian { mean, std } => write!(f, "gaussian(mean={mean}, std={std})"),
            Distribution::Constant { value } => write!(f, "constant({value})"),
        }
    }
}

/// A [`Distribution`] bound to its own random number generator.
pub struct Initializer {
    distribution: Distribution,
    rng: StdRng,
}

impl Initializer {
    /// Creates an initializer seeded from OS entropy.
    pub fn new(distribution: Distribution) -> Result<Self, LayerError> {
        distribution.validate()?;
        Ok(Self {
            distribution,
            rng: StdRng::from_entropy(),
        })
    }

    /// Creates an initializer whose draws are reproducible for a given seed.
    pub fn seeded(distribution: Distribution, seed: u64) -> Result<Self, LayerError> {
        distribution.validate()?;
        Ok(Self {
            distribution,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    /// Draws a single value.
    pub fn sample(&mut self) -> f64 {
        self.distribution.sample(&mut self.rng)
    }

    /// Overwrites every element of `values` with an independent draw.
    pub fn fill_slice(&mut self, values: &mut [f64]) {
        for v in values.iter_mut() {
            *v = self.distribution.sample(&mut self.rng);
        }
    }

    /// Overwrites every element of `tensor`, whatever its rank.
    pub fn fill(&mut self, tensor: &mut Tensor) {
        tracing::trace!("filling {} tensor with {}", tensor.shape(), self.distribution);
        self.fill_slice(tensor.as_mut_slice());
    }

    /// Returns a new tensor of `shape` filled with draws.
    pub fn tensor(&mut self, shape: Shape) -> Tensor {
        let mut t = Tensor::zeros(shape);
        self.fill(&mut t);
        t
    }
}

impl fmt::Debug for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Initializer")
            .field("distribution", &self.distribution)
            .finish()
    }
}
