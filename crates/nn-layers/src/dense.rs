// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fully-connected (affine) layer.

use tensor_core::{matmul, Shape, Tensor};

use crate::{Initializer, LayerError};

const NAME: &str = "fully_connected";

/// Construction-time configuration for a [`FullyConnected`] layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DenseConfig {
    pub in_features: usize,
    pub out_features: usize,
}

/// `output[o] = bias[o] + Σ_i input[i] * weight[i][o]`.
///
/// The weight matrix is stored `[in_features, out_features]`, so row `i`
/// holds the contributions of input neuron `i` to every output neuron.
#[derive(Debug, Clone)]
pub struct FullyConnected {
    /// `[in_features, out_features]`.
    weight: Tensor,
    /// `[out_features]`.
    bias: Tensor,
}

impl FullyConnected {
    /// Creates a layer with zeroed weights and biases.
    pub fn new(config: DenseConfig) -> Result<Self, LayerError> {
        if config.in_features == 0 || config.out_features == 0 {
            return Err(LayerError::InvalidConfig {
                layer: NAME,
                detail: format!(
                    "feature counts must be positive, got {} -> {}",
                    config.in_features, config.out_features
                ),
            });
        }
        Ok(Self {
            weight: Tensor::zeros(Shape::matrix(config.in_features, config.out_features)),
            bias: Tensor::zeros(Shape::vector(config.out_features)),
        })
    }

    /// Creates a layer from an explicit `[in, out]` weight matrix and `[out]`
    /// bias vector.
    pub fn from_parameters(weight: Tensor, bias: Tensor) -> Result<Self, LayerError> {
        let out_features = match weight.shape().dims() {
            &[_, out] => out,
            _ => {
                return Err(LayerError::InvalidConfig {
                    layer: NAME,
                    detail: format!("weight must be [in, out], got {}", weight.shape()),
                })
            }
        };
        if weight.shape().has_empty_axis() {
            return Err(LayerError::InvalidConfig {
                layer: NAME,
                detail: format!("weight extents must be positive, got {}", weight.shape()),
            });
        }
        if bias.shape() != &Shape::vector(out_features) {
            return Err(LayerError::InvalidConfig {
                layer: NAME,
                detail: format!("bias must be [{out_features}], got {}", bias.shape()),
            });
        }
        Ok(Self { weight, bias })
    }

    pub fn in_features(&self) -> usize {
        self.weight.shape().dims()[0]
    }

    pub fn out_features(&self) -> usize {
        self.weight.shape().dims()[1]
    }

    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    pub fn weight_mut(&mut self) -> &mut Tensor {
        &mut self.weight
    }

    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    pub fn bias_mut(&mut self) -> &mut Tensor {
        &mut self.bias
    }

    pub fn num_parameters(&self) -> usize {
        self.weight.len() + self.bias.len()
    }

    /// Refills the weight matrix from `weights` and the bias from `bias`.
    pub fn initialize(&mut self, weights: &mut Initializer, bias: &mut Initializer) {
        weights.fill(&mut self.weight);
        bias.fill(&mut self.bias);
    }

    /// Shape of [`FullyConnected::propagate`]'s output for an input of shape `input`.
    pub fn output_shape(&self, input: &Shape) -> Result<Shape, LayerError> {
        self.check_input(input)?;
        Ok(Shape::vector(self.out_features()))
    }

    /// Applies the affine transform to a rank-1 input of length `in_features`.
    ///
    /// # Errors
    /// Returns [`LayerError::ShapeMismatch`] if `input` is not a vector of
    /// length `in_features`. Flatten `[C, H, W]` activations first.
    pub fn propagate(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        self.check_input(input.shape())?;

        let n_in = self.in_features();
        let n_out = self.out_features();
        let row = input.clone().reshape(Shape::matrix(1, n_in))?;
        let mut product = Tensor::zeros(Shape::matrix(1, n_out));
        matmul(&row, &self.weight, &mut product)?;

        let mut output = product.reshape(Shape::vector(n_out))?;
        for (y, b) in output.as_mut_slice().iter_mut().zip(self.bias.as_slice()) {
            *y += b;
        }
        Ok(output)
    }

    fn check_input(&self, input: &Shape) -> Result<(), LayerError> {
        if input != &Shape::vector(self.in_features()) {
            return Err(LayerError::ShapeMismatch {
                layer: NAME,
                detail: format!(
                    "expected a vector of {} features, got {input}",
                    self.in_features()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Distribution;

    #[test]
    fn test_all_ones_weights() {
        let mut layer = FullyConnected::new(DenseConfig {
            in_features: 3,
            out_features: 2,
        })
        .unwrap();
        layer.weight_mut().fill(1.0);

        let input = Tensor::from_vec(Shape::vector(3), vec![1.0, 2.0, 3.0]).unwrap();
        let out = layer.propagate(&input).unwrap();
        assert_eq!(out.shape(), &Shape::vector(2));
        assert_eq!(out.as_slice(), &[6.0, 6.0]);
    }

    #[test]
    fn test_weight_orientation_and_bias() {
        // weight[i][o]: input 0 feeds output 1, input 1 feeds output 0.
        let weight = Tensor::from_vec(Shape::matrix(2, 2), vec![0.0, 2.0, 3.0, 0.0]).unwrap();
        let bias = Tensor::from_vec(Shape::vector(2), vec![0.5, -0.5]).unwrap();
        let layer = FullyConnected::from_parameters(weight, bias).unwrap();

        let input = Tensor::from_vec(Shape::vector(2), vec![1.0, 10.0]).unwrap();
        let out = layer.propagate(&input).unwrap();
        assert_eq!(out.as_slice(), &[30.5, 1.5]);
    }

    #[test]
    fn test_length_mismatch() {
        let layer = FullyConnected::new(DenseConfig {
            in_features: 3,
            out_features: 2,
        })
        .unwrap();
        let input = Tensor::zeros(Shape::vector(4));
        assert!(matches!(
            layer.propagate(&input),
            Err(LayerError::ShapeMismatch { layer: "fully_connected", .. })
        ));
    }

    #[test]
    fn test_rank_mismatch() {
        let layer = FullyConnected::new(DenseConfig {
            in_features: 4,
            out_features: 1,
        })
        .unwrap();
        // Right element count, wrong rank.
        let input = Tensor::zeros(Shape::chw(1, 2, 2));
        assert!(matches!(
            layer.propagate(&input),
            Err(LayerError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_parameters_validation() {
        let weight = Tensor::zeros(Shape::vector(3));
        let bias = Tensor::zeros(Shape::vector(3));
        assert!(FullyConnected::from_parameters(weight, bias).is_err());

        let weight = Tensor::zeros(Shape::matrix(3, 2));
        let bias = Tensor::zeros(Shape::vector(3));
        assert!(FullyConnected::from_parameters(weight, bias).is_err());
    }

    #[test]
    fn test_from_parameters_rejects_empty_weight() {
        let weight = Tensor::zeros(Shape::matrix(0, 2));
        let bias = Tensor::zeros(Shape::vector(2));
        assert!(matches!(
            FullyConnected::from_parameters(weight, bias),
            Err(LayerError::InvalidConfig { layer: "fully_connected", .. })
        ));

        let weight = Tensor::zeros(Shape::matrix(3, 0));
        let bias = Tensor::zeros(Shape::vector(0));
        assert!(FullyConnected::from_parameters(weight, bias).is_err());
    }

    #[test]
    fn test_initialize() {
        let mut layer = FullyConnected::new(DenseConfig {
            in_features: 5,
            out_features: 3,
        })
        .unwrap();
        let mut w = Initializer::seeded(Distribution::Gaussian { mean: 0.0, std: 1.0 }, 9).unwrap();
        let mut b = Initializer::new(Distribution::Constant { value: -1.0 }).unwrap();
        layer.initialize(&mut w, &mut b);

        assert_eq!(layer.num_parameters(), 18);
        assert!(layer.weight().as_slice().iter().any(|&x| x != 0.0));
        assert_eq!(layer.bias().as_slice(), &[-1.0, -1.0, -1.0]);
    }
}
