// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # nn-layers
//!
//! Forward-only CNN layers built on [`tensor_core`].
//!
//! - [`Conv2d`]: strided, padded cross-correlation with a `[F, C, Hf, Wf]`
//!   filter bank and per-filter bias.
//! - [`Pool2d`]: max or average pooling over each channel.
//! - [`FullyConnected`]: affine transform on a flattened vector.
//! - [`Initializer`]: fills weight and bias tensors from a [`Distribution`].
//!
//! Convolution and pooling share their padding, stride validation and
//! output-size arithmetic through the [`window`] module.
//!
//! # Example
//! ```
//! use nn_layers::{Conv2d, ConvConfig, Pool2d, PoolConfig};
//! use tensor_core::{Padding, Shape, Tensor};
//!
//! let conv = Conv2d::new(ConvConfig::new(1, 4, 3).with_padding(Padding::uniform(1))).unwrap();
//! let pool = Pool2d::max(PoolConfig::square(2)).unwrap();
//!
//! let x = Tensor::zeros(Shape::chw(1, 8, 8));
//! let y = pool.pool(&conv.convolve(&x).unwrap()).unwrap();
//! assert_eq!(y.shape(), &Shape::chw(4, 4, 4));
//! ```

mod conv;
mod dense;
mod error;
mod init;
mod pool;
pub mod window;

pub use conv::{Conv2d, ConvConfig};
pub use dense::{DenseConfig, FullyConnected};
pub use error::LayerError;
pub use init::{Distribution, Initializer};
pub use pool::{Pool2d, PoolConfig, PoolKind};
pub use window::{Stride, Window};

pub use tensor_core::Padding;
