// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor operations.

use crate::Shape;

/// Errors that can occur during tensor operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TensorError {
    /// The provided buffer length does not match the element count of the shape.
    #[error("buffer size mismatch: expected {expected} elements, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Two tensors have incompatible shapes for the requested operation.
    #[error("incompatible shapes for {op}: {lhs} vs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// The operation requires a tensor of a specific rank.
    #[error("{op} expects a rank-{expected} tensor, got shape {shape}")]
    RankMismatch {
        op: &'static str,
        expected: usize,
        shape: Shape,
    },

    /// A shape with a zero-sized axis was used to build a tensor.
    #[error("shape {shape} has a zero-sized axis")]
    EmptyAxis { shape: Shape },

    /// Nested input rows have differing lengths.
    #[error("ragged nested input at {location}: expected length {expected}, got {actual}")]
    Ragged {
        location: &'static str,
        expected: usize,
        actual: usize,
    },
}
