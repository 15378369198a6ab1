// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type.

use crate::{Shape, TensorError};

/// An owned, n-dimensional tensor of `f64` stored in contiguous memory.
///
/// `Tensor` is the primary data carrier in the forward pass: activations
/// are rank-3 `[channels, height, width]`, convolution filter banks are
/// rank-4 `[filters, channels, height, width]`, dense weights are rank-2
/// `[in_features, out_features]` and biases are rank-1.
///
/// # Memory Layout
/// Data is stored in row-major (C) order, so for a rank-3 tensor the
/// element `[c][h][w]` lives at `c * H * W + h * W + w`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: Vec<f64>,
}

impl Tensor {
    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape};
    /// let t = Tensor::zeros(Shape::chw(2, 3, 3));
    /// assert_eq!(t.len(), 18);
    /// ```
    pub fn zeros(shape: Shape) -> Self {
        Self::filled(shape, 0.0)
    }

    /// Creates a tensor with every element set to `value`.
    pub fn filled(shape: Shape, value: f64) -> Self {
        let n = shape.num_elements();
        Self {
            shape,
            data: vec![value; n],
        }
    }

    /// Creates a tensor from a flat row-major buffer.
    ///
    /// Returns an error if the buffer length does not match the shape or if
    /// any axis of the shape is zero-sized.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape};
    /// let t = Tensor::from_vec(Shape::vector(3), vec![1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0]);
    /// ```
    pub fn from_vec(shape: Shape, data: Vec<f64>) -> Result<Self, TensorError> {
        if shape.has_empty_axis() {
            return Err(TensorError::EmptyAxis { shape });
        }
        let expected = shape.num_elements();
        if data.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Builds a rank-3 tensor from nested `[channel][row][col]` vectors.
    ///
    /// Every channel must have the same number of rows and every row the
    /// same number of columns.
    pub fn from_nested(values: &[Vec<Vec<f64>>]) -> Result<Self, TensorError> {
        let channels = values.len();
        let height = values.first().map_or(0, Vec::len);
        let width = values
            .first()
            .and_then(|c| c.first())
            .map_or(0, Vec::len);

        let mut data = Vec::with_capacity(channels * height * width);
        for channel in values {
            if channel.len() != height {
                return Err(TensorError::Ragged {
                    location: "channel",
                    expected: height,
                    actual: channel.len(),
                });
            }
            for row in channel {
                if row.len() != width {
                    return Err(TensorError::Ragged {
                        location: "row",
                        expected: width,
                        actual: row.len(),
                    });
                }
                data.extend_from_slice(row);
            }
        }
        Self::from_vec(Shape::chw(channels, height, width), data)
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `(channels, height, width)`, failing if the tensor is not rank 3.
    pub fn dims_chw(&self, op: &'static str) -> Result<(usize, usize, usize), TensorError> {
        self.shape.as_chw().ok_or_else(|| TensorError::RankMismatch {
            op,
            expected: 3,
            shape: self.shape.clone(),
        })
    }

    /// Returns the flat row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns the flat row-major buffer mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Reads element `[c][h][w]` of a rank-3 tensor.
    ///
    /// # Panics
    /// Panics if the tensor is not rank 3 or the index is out of bounds.
    #[inline]
    pub fn at(&self, c: usize, h: usize, w: usize) -> f64 {
        let dims = self.shape.dims();
        self.data[(c * dims[1] + h) * dims[2] + w]
    }

    /// Writes element `[c][h][w]` of a rank-3 tensor.
    ///
    /// # Panics
    /// Panics if the tensor is not rank 3 or the index is out of bounds.
    #[inline]
    pub fn set(&mut self, c: usize, h: usize, w: usize, value: f64) {
        let dims = self.shape.dims();
        let idx = (c * dims[1] + h) * dims[2] + w;
        self.data[idx] = value;
    }

    /// Returns the contiguous `[height * width]` plane of channel `c` in a
    /// rank-3 tensor, or the `c`-th outermost slab for higher ranks.
    ///
    /// # Panics
    /// Panics if `c` is out of bounds.
    pub fn channel(&self, c: usize) -> &[f64] {
        let plane = self.data.len() / self.shape.dims()[0];
        &self.data[c * plane..(c + 1) * plane]
    }

    /// Returns the same data under a new shape with equal element count.
    pub fn reshape(self, shape: Shape) -> Result<Self, TensorError> {
        if shape.num_elements() != self.data.len() {
            return Err(TensorError::ShapeMismatch {
                op: "reshape",
                lhs: self.shape,
                rhs: shape,
            });
        }
        Ok(Self {
            shape,
            data: self.data,
        })
    }

    /// Fills the tensor with a constant value.
    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|x| *x = value);
    }
}
