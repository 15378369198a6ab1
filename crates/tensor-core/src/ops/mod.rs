// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor operations used by the forward pass.
//!
//! Every operation reads its inputs and produces a freshly allocated output
//! (or writes into a caller-provided one, for `matmul`). None of them keep
//! state between calls.

mod activation_op;
mod flatten_op;
mod matmul_op;
mod pad_op;

pub use activation_op::Activation;
pub use flatten_op::flatten;
pub use matmul_op::matmul;
pub use pad_op::{pad, Padding};
