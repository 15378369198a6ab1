// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for layer construction and forward execution.

/// Errors raised by layers. Every check runs before any output is allocated,
/// so a failed call never yields a partial result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayerError {
    /// Input rank, channel count or vector length disagrees with the layer's
    /// configuration, or a window does not fit inside the padded input.
    #[error("shape mismatch in {layer}: {detail}")]
    ShapeMismatch { layer: &'static str, detail: String },

    /// The window does not tile the padded input exactly under the stride.
    #[error(
        "stride mismatch in {layer}: padded {axis} {extent} minus window {window} \
         is not a multiple of stride {stride}"
    )]
    StrideMismatch {
        layer: &'static str,
        axis: &'static str,
        extent: usize,
        window: usize,
        stride: usize,
    },

    /// A constructor argument is out of range (zero stride, zero-sized window,
    /// parameter tensor of the wrong shape, invalid distribution bounds).
    #[error("invalid {layer} configuration: {detail}")]
    InvalidConfig { layer: &'static str, detail: String },

    /// An underlying tensor operation failed.
    #[error("tensor error: {0}")]
    Tensor(#[from] tensor_core::TensorError),
}
