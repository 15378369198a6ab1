// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! 2-D convolution (cross-correlation) layer.

use tensor_core::{Padding, Shape, Tensor};

use crate::window::{chw, Window};
use crate::{Initializer, LayerError, Stride};

const NAME: &str = "conv2d";

/// Construction-time configuration for a [`Conv2d`] layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConvConfig {
    pub in_channels: usize,
    pub out_channels: usize,
    /// Filter extents `[height, width]`.
    pub kernel: [usize; 2],
    #[serde(default)]
    pub stride: Stride,
    #[serde(default)]
    pub padding: Padding,
}

impl ConvConfig {
    /// Square kernel, unit stride, no padding.
    pub fn new(in_channels: usize, out_channels: usize, kernel: usize) -> Self {
        Self {
            in_channels,
            out_channels,
            kernel: [kernel, kernel],
            stride: Stride::default(),
            padding: Padding::NONE,
        }
    }

    pub fn with_stride(mut self, stride: Stride) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }
}

/// A bank of `F` filters of shape `[C, Hf, Wf]` with one bias per filter.
///
/// The layer's geometry (channel counts, kernel size, stride, padding) is
/// fixed at construction. Only the numeric contents of the filter bank and
/// bias vector may change afterwards, through [`Conv2d::initialize`] or the
/// `*_mut` accessors.
#[derive(Debug, Clone)]
pub struct Conv2d {
    in_channels: usize,
    /// `[F, C, Hf, Wf]`.
    filters: Tensor,
    /// `[F]`.
    bias: Tensor,
    window: Window,
}

impl Conv2d {
    /// Creates a layer with zeroed filters and biases.
    pub fn new(config: ConvConfig) -> Result<Self, LayerError> {
        let [kh, kw] = config.kernel;
        if config.in_channels == 0 || config.out_channels == 0 {
            return Err(LayerError::InvalidConfig {
                layer: NAME,
                detail: format!(
                    "channel counts must be positive, got {} -> {}",
                    config.in_channels, config.out_channels
                ),
            });
        }
        let window = Window::new(NAME, kh, kw, config.stride, config.padding)?;
        Ok(Self {
            in_channels: config.in_channels,
            filters: Tensor::zeros(Shape::fchw(config.out_channels, config.in_channels, kh, kw)),
            bias: Tensor::zeros(Shape::vector(config.out_channels)),
            window,
        })
    }

    /// Creates a layer from an explicit `[F, C, Hf, Wf]` filter bank and `[F]`
    /// bias vector.
    pub fn from_parameters(
        filters: Tensor,
        bias: Tensor,
        stride: Stride,
        padding: Padding,
    ) -> Result<Self, LayerError> {
        let (f, c, kh, kw) = match filters.shape().dims() {
            &[f, c, kh, kw] => (f, c, kh, kw),
            _ => {
                return Err(LayerError::InvalidConfig {
                    layer: NAME,
                    detail: format!("filter bank must be [F, C, Hf, Wf], got {}", filters.shape()),
                })
            }
        };
        if filters.shape().has_empty_axis() {
            return Err(LayerError::InvalidConfig {
                layer: NAME,
                detail: format!("filter bank extents must be positive, got {}", filters.shape()),
            });
        }
        if bias.shape() != &Shape::vector(f) {
            return Err(LayerError::InvalidConfig {
                layer: NAME,
                detail: format!("bias must be [{f}], got {}", bias.shape()),
            });
        }
        let window = Window::new(NAME, kh, kw, stride, padding)?;
        Ok(Self {
            in_channels: c,
            filters,
            bias,
            window,
        })
    }

    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub fn out_channels(&self) -> usize {
        self.filters.shape().dims()[0]
    }

    /// Filter extents `(height, width)`.
    pub fn kernel(&self) -> (usize, usize) {
        (self.window.height(), self.window.width())
    }

    pub fn stride(&self) -> Stride {
        self.window.stride()
    }

    pub fn padding(&self) -> Padding {
        self.window.padding()
    }

    pub fn filters(&self) -> &Tensor {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut Tensor {
        &mut self.filters
    }

    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    pub fn bias_mut(&mut self) -> &mut Tensor {
        &mut self.bias
    }

    /// Total number of learnable scalars (filters plus biases).
    pub fn num_parameters(&self) -> usize {
        self.filters.len() + self.bias.len()
    }

    /// Refills the filter bank from `weights` and the bias vector from `bias`.
    pub fn initialize(&mut self, weights: &mut Initializer, bias: &mut Initializer) {
        weights.fill(&mut self.filters);
        bias.fill(&mut self.bias);
    }

    /// Shape of [`Conv2d::convolve`]'s output for an input of shape `input`.
    pub fn output_shape(&self, input: &Shape) -> Result<Shape, LayerError> {
        let (channels, height, width) = chw(NAME, input)?;
        self.check_channels(channels)?;
        let (out_h, out_w) = self.window.output_extents(NAME, height, width)?;
        Ok(Shape::chw(self.out_channels(), out_h, out_w))
    }

    /// Strided cross-correlation of `input` with every filter:
    ///
    /// `out[f, oh, ow] = bias[f] + Σ_c Σ_i Σ_j filter[f, c, i, j] * padded[c, oh*sv + i, ow*sh + j]`
    ///
    /// # Errors
    /// - [`LayerError::ShapeMismatch`] if `input` is not `[C, H, W]` with
    ///   `C == in_channels`, or the kernel is larger than the padded input.
    /// - [`LayerError::StrideMismatch`] if the kernel does not tile the
    ///   padded input under the stride.
    pub fn convolve(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        let (channels, _, _) = chw(NAME, input.shape())?;
        self.check_channels(channels)?;

        let prepared = self.window.prepare(NAME, input)?;
        let padded = prepared.padded.as_ref();
        let (_, padded_h, padded_w) = padded.dims_chw(NAME)?;
        let (kh, kw) = self.kernel();
        let (out_h, out_w) = (prepared.out_height, prepared.out_width);
        let num_filters = self.out_channels();

        let mut output = Tensor::zeros(Shape::chw(num_filters, out_h, out_w));

        let src = padded.as_slice();
        let filter_len = channels * kh * kw;
        let dst = output.as_mut_slice();

        for (f, filter) in self.filters.as_slice().chunks_exact(filter_len).enumerate() {
            let bias = self.bias.as_slice()[f];
            for oh in 0..out_h {
                for ow in 0..out_w {
                    let (row0, col0) = self.window.origin(oh, ow);
                    let mut acc = bias;
                    for c in 0..channels {
                        for i in 0..kh {
                            let src_off = (c * padded_h + row0 + i) * padded_w + col0;
                            let k_off = (c * kh + i) * kw;
                            acc += src[src_off..src_off + kw]
                                .iter()
                                .zip(&filter[k_off..k_off + kw])
                                .map(|(x, w)| x * w)
                                .sum::<f64>();
                        }
                    }
                    dst[(f * out_h + oh) * out_w + ow] = acc;
                }
            }
        }

        Ok(output)
    }

    fn check_channels(&self, channels: usize) -> Result<(), LayerError> {
        if channels != self.in_channels {
            return Err(LayerError::ShapeMismatch {
                layer: NAME,
                detail: format!(
                    "layer expects {} input channels, input has {channels}",
                    self.in_channels
                ),
            });
        }
        Ok(())
    }
}
