// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Observers for intermediate tensors produced during a forward pass.

use std::io;

use tensor_core::Tensor;

/// Receives every stage output during [`Network::forward_traced`](crate::Network::forward_traced).
pub trait TensorSink {
    /// Records the output of the stage labelled `stage`.
    fn record(&mut self, stage: &str, tensor: &Tensor) -> io::Result<()>;
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TensorSink for NullSink {
    fn record(&mut self, _stage: &str, _tensor: &Tensor) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps a copy of each stage output in memory.
impl TensorSink for Vec<(String, Tensor)> {
    fn record(&mut self, stage: &str, tensor: &Tensor) -> io::Result<()> {
        self.push((stage.to_string(), tensor.clone()));
        Ok(())
    }
}

impl<T: TensorSink + ?Sized> TensorSink for &mut T {
    fn record(&mut self, stage: &str, tensor: &Tensor) -> io::Result<()> {
        (**self).record(stage, tensor)
    }
}
