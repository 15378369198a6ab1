// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Elementwise activation functions.

use std::fmt;

use crate::Tensor;

/// The closed set of elementwise nonlinearities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// `max(0, x)`.
    Relu,
    /// `1 / (1 + exp(-x))`.
    Sigmoid,
    /// Hyperbolic tangent.
    Tanh,
}

impl Activation {
    /// Evaluates the function at a single point.
    #[inline]
    pub fn activation(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => sigmoid(x),
            Activation::Tanh => x.tanh(),
        }
    }

    /// Maps the function over every element, returning a tensor of the same
    /// shape. Works for vectors and `[C, H, W]` activations alike.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Activation, Shape, Tensor};
    /// let t = Tensor::from_vec(Shape::vector(3), vec![-1.0, 0.0, 2.0]).unwrap();
    /// let y = Activation::Relu.apply(&t);
    /// assert_eq!(y.as_slice(), &[0.0, 0.0, 2.0]);
    /// ```
    pub fn apply(self, input: &Tensor) -> Tensor {
        let mut output = input.clone();
        self.apply_in_place(output.as_mut_slice());
        output
    }

    fn apply_in_place(self, values: &mut [f64]) {
        for v in values.iter_mut() {
            *v = self.activation(*v);
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relu => "relu",
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logistic function evaluated without overflowing `exp` for large `|x|`.
#[inline(always)]
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
