// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Flattening of arbitrary-rank tensors into vectors.

use crate::{Shape, Tensor, TensorError};

/// Returns a rank-1 copy of `input` in row-major order.
///
/// A `[C, H, W]` activation becomes a vector of length `C * H * W` whose
/// element `c * H * W + h * W + w` is `input[c][h][w]`.
pub fn flatten(input: &Tensor) -> Result<Tensor, TensorError> {
    let len = input.len();
    input.clone().reshape(Shape::vector(len))
}
