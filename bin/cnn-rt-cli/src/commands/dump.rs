// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Plain-text tensor dump used by `cnn-rt run --dump`.
//!
//! A `[C, H, W]` tensor is written channel by channel: every value is
//! followed by a space, each row ends with a newline and channels are
//! separated by a blank line. Tensors of any other rank are written as a
//! single row.

use std::io::{self, Write};

use runtime::TensorSink;
use tensor_core::Tensor;

/// A [`TensorSink`] that writes each tensor as text to `W`.
pub struct TextDump<W: Write> {
    out: W,
}

impl<W: Write> TextDump<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TensorSink for TextDump<W> {
    fn record(&mut self, stage: &str, tensor: &Tensor) -> io::Result<()> {
        writeln!(self.out, "── {stage} {} ──", tensor.shape())?;
        write_tensor(&mut self.out, tensor)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Writes `tensor` in the channel / row / column text layout.
pub fn write_tensor<W: Write + ?Sized>(out: &mut W, tensor: &Tensor) -> io::Result<()> {
    let Some((channels, height, width)) = tensor.shape().as_chw() else {
        return write_row(out, tensor.as_slice());
    };

    for c in 0..channels {
        if c > 0 {
            writeln!(out)?;
        }
        let plane = tensor.channel(c);
        for h in 0..height {
            write_row(out, &plane[h * width..(h + 1) * width])?;
        }
    }
    Ok(())
}

fn write_row<W: Write + ?Sized>(out: &mut W, values: &[f64]) -> io::Result<()> {
    for v in values {
        write!(out, "{v} ")?;
    }
    writeln!(out)
}
