// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor shape descriptors and dimension utilities.

use std::fmt;

/// Describes the dimensionality of a [`crate::Tensor`].
///
/// Shapes are immutable once created. The CNN engine works mostly with
/// rank-3 `[channels, height, width]` activations and rank-4
/// `[filters, channels, height, width]` filter banks, but any rank is
/// representable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Creates a new shape from the given dimensions.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Shape;
    /// let s = Shape::new(vec![2, 3, 4]);
    /// assert_eq!(s.rank(), 3);
    /// assert_eq!(s.num_elements(), 24);
    /// ```
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    /// Creates a 1-D shape.
    pub fn vector(len: usize) -> Self {
        Self { dims: vec![len] }
    }

    /// Creates a 2-D shape (matrix).
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self {
            dims: vec![rows, cols],
        }
    }

    /// Creates a 3-D `[channels, height, width]` shape.
    pub fn chw(channels: usize, height: usize, width: usize) -> Self {
        Self {
            dims: vec![channels, height, width],
        }
    }

    /// Creates a 4-D `[filters, channels, height, width]` shape.
    pub fn fchw(filters: usize, channels: usize, height: usize, width: usize) -> Self {
        Self {
            dims: vec![filters, channels, height, width],
        }
    }

    /// Returns the number of dimensions (rank).
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Returns the total number of elements.
    ///
    /// For a rank-0 shape, returns 1.
    pub fn num_elements(&self) -> usize {
        if self.dims.is_empty() {
            1
        } else {
            self.dims.iter().product()
        }
    }

    /// Returns the dimensions as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns `true` if any axis has extent zero.
    pub fn has_empty_axis(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    /// Returns `(channels, height, width)` for a rank-3 shape.
    pub fn as_chw(&self) -> Option<(usize, usize, usize)> {
        match self.dims.as_slice() {
            &[c, h, w] => Some((c, h, w)),
            _ => None,
        }
    }

    /// Returns `true` if the shapes are compatible for a matrix multiply:
    /// `self` is `[M, K]` and `other` is `[K, N]`.
    pub fn is_matmul_compatible(&self, other: &Shape) -> bool {
        if self.rank() != 2 || other.rank() != 2 {
            return false;
        }
        self.dims[1] == other.dims[0]
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_shape() {
        let s = Shape::vector(5);
        assert_eq!(s.rank(), 1);
        assert_eq!(s.num_elements(), 5);
        assert_eq!(s.dims(), &[5]);
    }

    #[test]
    fn test_matrix_shape() {
        let s = Shape::matrix(3, 4);
        assert_eq!(s.rank(), 2);
        assert_eq!(s.num_elements(), 12);
        assert_eq!(s.dims(), &[3, 4]);
    }

    #[test]
    fn test_chw_shape() {
        let s = Shape::chw(2, 3, 4);
        assert_eq!(s.num_elements(), 24);
        assert_eq!(s.as_chw(), Some((2, 3, 4)));
    }

    #[test]
    fn test_fchw_shape() {
        let s = Shape::fchw(2, 3, 4, 5);
        assert_eq!(s.rank(), 4);
        assert_eq!(s.num_elements(), 120);
        assert_eq!(s.as_chw(), None);
    }

    #[test]
    fn test_empty_axis() {
        assert!(Shape::chw(1, 0, 3).has_empty_axis());
        assert!(!Shape::chw(1, 2, 3).has_empty_axis());
    }

    #[test]
    fn test_matmul_compatible() {
        let a = Shape::matrix(3, 4);
        let b = Shape::matrix(4, 5);
        assert!(a.is_matmul_compatible(&b));

        let c = Shape::matrix(5, 5);
        assert!(!a.is_matmul_compatible(&c));
        assert!(!a.is_matmul_compatible(&Shape::vector(4)));
    }

    #[test]
    fn test_display() {
        let s = Shape::chw(2, 3, 4);
        assert_eq!(format!("{s}"), "[2, 3, 4]");
    }
}
