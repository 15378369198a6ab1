// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sliding-window geometry shared by convolution and pooling.
//!
//! Both operators pad their input, slide a `height × width` window across
//! it with a fixed stride, and emit one value per window position. This
//! module owns the part they have in common:
//!
//! ```text
//! padded_h = H + 2 * pad_v            out_h = (padded_h - window_h) / stride_v + 1
//! padded_w = W + 2 * pad_h            out_w = (padded_w - window_w) / stride_h + 1
//! ```
//!
//! The division must be exact; otherwise the window would not tile the
//! padded input and [`LayerError::StrideMismatch`] is returned.

use std::borrow::Cow;
use std::fmt;

use tensor_core::{pad, Padding, Shape, Tensor};

use crate::LayerError;

/// Step between successive window positions, per spatial axis.
///
/// Serialised as a two-element array `[vertical, horizontal]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Stride {
    pub vertical: usize,
    pub horizontal: usize,
}

impl Stride {
    pub const fn new(vertical: usize, horizontal: usize) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Same stride on both axes.
    pub const fn uniform(step: usize) -> Self {
        Self::new(step, step)
    }
}

impl Default for Stride {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl From<[usize; 2]> for Stride {
    fn from([vertical, horizontal]: [usize; 2]) -> Self {
        Self::new(vertical, horizontal)
    }
}

impl From<Stride> for [usize; 2] {
    fn from(s: Stride) -> Self {
        [s.vertical, s.horizontal]
    }
}

impl fmt::Display for Stride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.vertical, self.horizontal)
    }
}

/// A `height × width` window with its stride and padding. Immutable after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    height: usize,
    width: usize,
    stride: Stride,
    padding: Padding,
}

/// A padded input ready to be swept by a [`Window`].
#[derive(Debug)]
pub struct Prepared<'a> {
    /// The input after zero padding (borrowed when no padding applies).
    pub padded: Cow<'a, Tensor>,
    pub channels: usize,
    pub out_height: usize,
    pub out_width: usize,
}

impl Window {
    /// Creates a window, rejecting zero-sized extents and zero strides.
    pub fn new(
        layer: &'static str,
        height: usize,
        width: usize,
        stride: Stride,
        padding: Padding,
    ) -> Result<Self, LayerError> {
        if height == 0 || width == 0 {
            return Err(LayerError::InvalidConfig {
                layer,
                detail: format!("window must be non-empty, got {height}x{width}"),
            });
        }
        if stride.vertical == 0 || stride.horizontal == 0 {
            return Err(LayerError::InvalidConfig {
                layer,
                detail: format!("stride must be positive, got {stride}"),
            });
        }
        Ok(Self {
            height,
            width,
            stride,
            padding,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn stride(&self) -> Stride {
        self.stride
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Number of cells covered by one window position.
    pub fn area(&self) -> usize {
        self.height * self.width
    }

    /// Computes `(out_height, out_width)` for an unpadded `height × width`
    /// input.
    ///
    /// # Errors
    /// - [`LayerError::ShapeMismatch`] if the window is larger than the
    ///   padded input on either axis.
    /// - [`LayerError::StrideMismatch`] if the window does not tile the
    ///   padded input exactly.
    pub fn output_extents(
        &self,
        layer: &'static str,
        height: usize,
        width: usize,
    ) -> Result<(usize, usize), LayerError> {
        let (padded_h, padded_w) = self.padding.padded_extents(height, width);
        let out_h = axis_extent(layer, "height", padded_h, self.height, self.stride.vertical)?;
        let out_w = axis_extent(layer, "width", padded_w, self.width, self.stride.horizontal)?;
        Ok((out_h, out_w))
    }

    /// Validates `input`, pads it, and reports the output extents.
    ///
    /// Geometry is checked on the unpadded extents first so that a bad
    /// configuration fails before the padded copy is allocated.
    pub fn prepare<'a>(
        &self,
        layer: &'static str,
        input: &'a Tensor,
    ) -> Result<Prepared<'a>, LayerError> {
        let (channels, height, width) = chw(layer, input.shape())?;
        let (out_height, out_width) = self.output_extents(layer, height, width)?;
        let padded = pad(input, self.padding)?;
        Ok(Prepared {
            padded,
            channels,
            out_height,
            out_width,
        })
    }

    /// Top-left corner, in padded coordinates, of the window at output
    /// position `(oh, ow)`.
    #[inline]
    pub fn origin(&self, oh: usize, ow: usize) -> (usize, usize) {
        (oh * self.stride.vertical, ow * self.stride.horizontal)
    }
}

/// Splits a rank-3 shape into `(channels, height, width)`.
pub(crate) fn chw(layer: &'static str, shape: &Shape) -> Result<(usize, usize, usize), LayerError> {
    shape.as_chw().ok_or_else(|| LayerError::ShapeMismatch {
        layer,
        detail: format!("expected a [channels, height, width] input, got {shape}"),
    })
}

fn axis_extent(
    layer: &'static str,
    axis: &'static str,
    extent: usize,
    window: usize,
    stride: usize,
) -> Result<usize, LayerError> {
    if window > extent {
        return Err(LayerError::ShapeMismatch {
            layer,
            detail: format!("window {axis} {window} exceeds padded input {axis} {extent}"),
        });
    }
    if (extent - window) % stride != 0 {
        return Err(LayerError::StrideMismatch {
            layer,
            axis,
            extent,
            window,
            stride,
        });
    }
    Ok((extent - window) / stride + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(h: usize, w: usize, stride: Stride, padding: Padding) -> Window {
        Window::new("test", h, w, stride, padding).unwrap()
    }

    #[test]
    fn test_valid_extents() {
        let w = window(3, 3, Stride::default(), Padding::NONE);
        assert_eq!(w.output_extents("test", 5, 7).unwrap(), (3, 5));
    }

    #[test]
    fn test_padded_extents() {
        // (2 + 2 - 3) / 1 + 1 = 2 on both axes.
        let w = window(3, 3, Stride::default(), Padding::uniform(1));
        assert_eq!(w.output_extents("test", 2, 2).unwrap(), (2, 2));
    }

    #[test]
    fn test_strided_extents() {
        let w = window(2, 2, Stride::uniform(2), Padding::NONE);
        assert_eq!(w.output_extents("test", 4, 6).unwrap(), (2, 3));
    }

    #[test]
    fn test_stride_mismatch_vertical() {
        let w = window(2, 2, Stride::new(2, 1), Padding::NONE);
        let err = w.output_extents("test", 5, 4).unwrap_err();
        assert_eq!(
            err,
            LayerError::StrideMismatch {
                layer: "test",
                axis: "height",
                extent: 5,
                window: 2,
                stride: 2,
            }
        );
    }

    #[test]
    fn test_stride_mismatch_horizontal() {
        let w = window(1, 3, Stride::new(1, 2), Padding::NONE);
        assert!(matches!(
            w.output_extents("test", 3, 4),
            Err(LayerError::StrideMismatch { axis: "width", .. })
        ));
    }

    #[test]
    fn test_window_larger_than_input() {
        let w = window(5, 5, Stride::default(), Padding::NONE);
        assert!(matches!(
            w.output_extents("test", 3, 3),
            Err(LayerError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_stride_rejected() {
        assert!(matches!(
            Window::new("test", 2, 2, Stride::new(0, 1), Padding::NONE),
            Err(LayerError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(Window::new("test", 0, 2, Stride::default(), Padding::NONE).is_err());
    }

    #[test]
    fn test_prepare_pads_input() {
        let w = window(3, 3, Stride::default(), Padding::uniform(1));
        let input = Tensor::filled(Shape::chw(2, 2, 2), 1.0);
        let prepared = w.prepare("test", &input).unwrap();
        assert_eq!(prepared.padded.shape(), &Shape::chw(2, 4, 4));
        assert_eq!(prepared.channels, 2);
        assert_eq!((prepared.out_height, prepared.out_width), (2, 2));
    }

    #[test]
    fn test_prepare_rejects_vectors() {
        let w = window(1, 1, Stride::default(), Padding::NONE);
        let input = Tensor::zeros(Shape::vector(4));
        assert!(matches!(
            w.prepare("test", &input),
            Err(LayerError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_origin() {
        let w = window(2, 2, Stride::new(2, 3), Padding::NONE);
        assert_eq!(w.origin(1, 2), (2, 6));
    }

    #[test]
    fn test_stride_serde_as_array() {
        let s: Stride = serde_json::from_str("[2, 3]").unwrap();
        assert_eq!(s, Stride::new(2, 3));
    }
}
