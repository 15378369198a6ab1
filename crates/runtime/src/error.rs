// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the forward-pass runtime.

use tensor_core::Shape;

/// Errors that can occur while building or running a network.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The network configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The network is structurally invalid (no stages, empty input shape).
    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    /// A stage rejected its input or its configuration.
    #[error("stage '{stage}' failed: {source}")]
    StageError {
        stage: String,
        #[source]
        source: nn_layers::LayerError,
    },

    /// The tensor passed to `forward` does not match the declared input shape.
    #[error("input shape mismatch: network expects {expected}, got {actual}")]
    InputShape { expected: Shape, actual: Shape },

    /// The tensor sink failed to record an intermediate result.
    #[error("tensor sink error: {0}")]
    SinkError(#[from] std::io::Error),
}
