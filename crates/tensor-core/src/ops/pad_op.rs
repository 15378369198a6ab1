// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Zero padding of `[C, H, W]` tensors.

use std::borrow::Cow;
use std::fmt;

use crate::{Shape, Tensor, TensorError};

/// Per-axis zero padding: `vertical` rows above and below, `horizontal`
/// columns left and right.
///
/// Serialised as a two-element array `[vertical, horizontal]`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Padding {
    pub vertical: usize,
    pub horizontal: usize,
}

impl Padding {
    /// No padding on either axis.
    pub const NONE: Padding = Padding::new(0, 0);

    pub const fn new(vertical: usize, horizontal: usize) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Same padding on both axes.
    pub const fn uniform(amount: usize) -> Self {
        Self::new(amount, amount)
    }

    pub fn is_none(&self) -> bool {
        self.vertical == 0 && self.horizontal == 0
    }

    /// Padded spatial extents for an `height × width` input.
    pub fn padded_extents(&self, height: usize, width: usize) -> (usize, usize) {
        (
            height + 2 * self.vertical,
            width + 2 * self.horizontal,
        )
    }
}

impl From<[usize; 2]> for Padding {
    fn from([vertical, horizontal]: [usize; 2]) -> Self {
        Self::new(vertical, horizontal)
    }
}

impl From<Padding> for [usize; 2] {
    fn from(p: Padding) -> Self {
        [p.vertical, p.horizontal]
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.vertical, self.horizontal)
    }
}

/// Returns a zero-padded copy of a `[C, H, W]` tensor with shape
/// `[C, H + 2 * vertical, W + 2 * horizontal]`.
///
/// With [`Padding::NONE`] the input is returned borrowed, without a copy.
///
/// # Errors
/// Returns [`TensorError::RankMismatch`] if `input` is not rank 3.
///
/// # Examples
/// ```
/// use tensor_core::{pad, Padding, Shape, Tensor};
/// let t = Tensor::filled(Shape::chw(1, 2, 2), 1.0);
/// let p = pad(&t, Padding::new(1, 2)).unwrap();
/// assert_eq!(p.shape(), &Shape::chw(1, 4, 6));
/// ```
pub fn pad(input: &Tensor, padding: Padding) -> Result<Cow<'_, Tensor>, TensorError> {
    let (channels, height, width) = input.dims_chw("pad")?;
    if padding.is_none() {
        return Ok(Cow::Borrowed(input));
    }

    let (padded_h, padded_w) = padding.padded_extents(height, width);
    let mut output = Tensor::zeros(Shape::chw(channels, padded_h, padded_w));

    // Copy each source row into the interior; the border stays zero.
    let src = input.as_slice();
    let dst = output.as_mut_slice();
    for c in 0..channels {
        for h in 0..height {
            let src_off = (c * height + h) * width;
            let dst_off = (c * padded_h + h + padding.vertical) * padded_w + padding.horizontal;
            dst[dst_off..dst_off + width].copy_from_slice(&src[src_off..src_off + width]);
        }
    }

    Ok(Cow::Owned(output))
}
