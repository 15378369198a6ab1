// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Dense `f64` tensors and the stateless operations a CNN forward pass is
//! built from.
//!
//! This crate provides:
//! - [`Tensor`]: an owned, row-major n-dimensional array.
//! - [`Shape`]: dimension descriptors with `[C, H, W]` helpers.
//! - [`pad`] / [`Padding`]: zero padding of `[C, H, W]` activations.
//! - [`Activation`]: ReLU, sigmoid and tanh applied elementwise.
//! - [`matmul`] and [`flatten`] for the fully-connected stage.
//!
//! # Design Goals
//! - Borrow instead of copy when an operation is the identity
//!   (`pad` with no padding returns a `Cow::Borrowed`).
//! - Shape validation before any allocation.
//! - Clean error types via `thiserror`.

mod error;
mod ops;
mod shape;
mod tensor;

pub use error::TensorError;
pub use ops::{flatten, matmul, pad, Activation, Padding};
pub use shape::Shape;
pub use tensor::Tensor;
