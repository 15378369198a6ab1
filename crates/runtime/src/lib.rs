// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! Sequential forward-pass execution for CNNs built from [`nn_layers`].
//!
//! The runtime takes:
//! - A [`NetworkConfig`] loaded from TOML (or built in code).
//! - An input tensor of the declared `[C, H, W]` shape.
//!
//! And runs it through each stage in order, recording per-stage timing and
//! optionally handing every intermediate tensor to a [`TensorSink`].
//!
//! # Type-State Pipeline
//! ```text
//! Network<Unchecked> → Network<Checked>
//! ```
//! `validate()` propagates shapes through every stage, so a shape error is
//! reported before any arithmetic runs.

mod config;
mod error;
mod metrics;
mod network;
mod sink;

pub use config::{NetworkConfig, StageConfig};
pub use error::RuntimeError;
pub use metrics::{ForwardMetrics, StageMetrics};
pub use network::{Checked, ForwardOutput, Network, NetworkState, Stage, Unchecked};
pub use sink::{NullSink, TensorSink};
