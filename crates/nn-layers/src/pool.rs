// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Max and average pooling.
//!
//! Pooling has no learned parameters. It reuses the convolution window
//! geometry: the input is zero-padded, the window slides with the stride,
//! and each channel is reduced independently, so the channel count is
//! preserved.

use std::fmt;

use tensor_core::{Padding, Shape, Tensor};

use crate::window::{chw, Window};
use crate::{LayerError, Stride};

const NAME: &str = "pool2d";

/// Reduction applied to each window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// Largest value in the window. A NaN anywhere in the window yields NaN.
    Max,
    /// Window sum divided by the window area. Padded zeros count toward the
    /// mean.
    Average,
}

impl PoolKind {
    /// Reduces one window's values to a scalar. `area` is the window's
    /// declared `height * width`.
    #[inline]
    pub fn reduce(self, values: impl Iterator<Item = f64>, area: usize) -> f64 {
        match self {
            PoolKind::Max => {
                values.fold(f64::NEG_INFINITY, |m, v| if v.is_nan() || v > m { v } else { m })
            }
            PoolKind::Average => values.sum::<f64>() / area as f64,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PoolKind::Max => "max_pool",
            PoolKind::Average => "avg_pool",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction-time configuration for a [`Pool2d`] layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PoolConfig {
    /// Window extents `[height, width]`.
    pub window: [usize; 2],
    #[serde(default)]
    pub stride: Stride,
    #[serde(default)]
    pub padding: Padding,
}

impl PoolConfig {
    /// Square window whose stride equals its size (non-overlapping).
    pub fn square(size: usize) -> Self {
        Self {
            window: [size, size],
            stride: Stride::uniform(size),
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

/// A stateless windowed reduction over each channel of a `[C, H, W]` input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool2d {
    kind: PoolKind,
    window: Window,
}

impl Pool2d {
    pub fn new(kind: PoolKind, config: PoolConfig) -> Result<Self, LayerError> {
        let [h, w] = config.window;
        let window = Window::new(NAME, h, w, config.stride, config.padding)?;
        Ok(Self { kind, window })
    }

    /// Max pooling with the given configuration.
    pub fn max(config: PoolConfig) -> Result<Self, LayerError> {
        Self::new(PoolKind::Max, config)
    }

    /// Average pooling with the given configuration.
    pub fn average(config: PoolConfig) -> Result<Self, LayerError> {
        Self::new(PoolKind::Average, config)
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Shape of [`Pool2d::pool`]'s output for an input of shape `input`.
    pub fn output_shape(&self, input: &Shape) -> Result<Shape, LayerError> {
        let (channels, height, width) = chw(NAME, input)?;
        let (out_h, out_w) = self.window.output_extents(NAME, height, width)?;
        Ok(Shape::chw(channels, out_h, out_w))
    }

    /// Reduces every window position of every channel.
    ///
    /// # Errors
    /// - [`LayerError::ShapeMismatch`] if `input` is not rank 3 or the window
    ///   is larger than the padded input.
    /// - [`LayerError::StrideMismatch`] if the window does not tile the
    ///   padded input under the stride.
    pub fn pool(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        let prepared = self.window.prepare(NAME, input)?;
        let padded = prepared.padded.as_ref();
        let (_, _, padded_w) = padded.dims_chw(NAME)?;
        let (wh, ww) = (self.window.height(), self.window.width());
        let (out_h, out_w) = (prepared.out_height, prepared.out_width);
        let area = self.window.area();

        let mut output = Tensor::zeros(Shape::chw(prepared.channels, out_h, out_w));
        let dst = output.as_mut_slice();

        for c in 0..prepared.channels {
            let plane = padded.channel(c);
            for oh in 0..out_h {
                for ow in 0..out_w {
                    let (row0, col0) = self.window.origin(oh, ow);
                    let cells = (row0..row0 + wh).flat_map(|r| {
                        let off = r * padded_w + col0;
                        plane[off..off + ww].iter().copied()
                    });
                    dst[(c * out_h + oh) * out_w + ow] = self.kind.reduce(cells, area);
                }
            }
        }

        Ok(output)
    }
}
