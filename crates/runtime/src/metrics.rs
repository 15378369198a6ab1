// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Forward-pass profiling metrics.
//!
//! [`ForwardMetrics`] collects per-stage timing and output shapes for a
//! single call to [`Network::forward`](crate::Network::forward).

use std::time::Duration;

use tensor_core::Shape;

/// Metrics for a single stage's execution.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StageMetrics {
    /// Stage label, e.g. `"0:conv"`.
    pub stage_name: String,
    /// Shape of the tensor the stage produced.
    pub output_shape: Shape,
    /// Time spent computing the stage.
    pub compute_duration: Duration,
}

/// Aggregate metrics for a complete forward pass.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ForwardMetrics {
    /// Total wall-clock time, including sink writes.
    pub total_duration: Duration,
    /// Sum of per-stage compute time.
    pub total_compute_duration: Duration,
    /// Per-stage metrics in execution order.
    pub stage_metrics: Vec<StageMetrics>,
}

impl ForwardMetrics {
    /// Creates an empty metrics container.
    pub fn new() -> Self {
        Self {
            total_duration: Duration::ZERO,
            total_compute_duration: Duration::ZERO,
            stage_metrics: Vec::new(),
        }
    }

    /// Records metrics for a single stage.
    pub fn record_stage(&mut self, name: String, output_shape: Shape, compute: Duration) {
        self.total_compute_duration += compute;
        self.stage_metrics.push(StageMetrics {
            stage_name: name,
            output_shape,
            compute_duration: compute,
        });
    }

    /// Finalises metrics with the total wall-clock time.
    pub fn finalise(&mut self, total: Duration) {
        self.total_duration = total;
    }

    /// The stage that took longest to compute, if any ran.
    pub fn slowest_stage(&self) -> Option<&StageMetrics> {
        self.stage_metrics.iter().max_by_key(|m| m.compute_duration)
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        let output = self
            .stage_metrics
            .last()
            .map(|m| m.output_shape.to_string())
            .unwrap_or_else(|| "-".to_string());
        let slowest = self
            .slowest_stage()
            .map(|m| {
                format!(
                    ", slowest {} ({:.3}ms)",
                    m.stage_name,
                    m.compute_duration.as_secs_f64() * 1000.0
                )
            })
            .unwrap_or_default();

        format!(
            "Forward: {:.3}ms total, {} stages, {:.3}ms compute, output {}{}",
            self.total_duration.as_secs_f64() * 1000.0,
            self.stage_metrics.len(),
            self.total_compute_duration.as_secs_f64() * 1000.0,
            output,
            slowest,
        )
    }
}

impl Default for ForwardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metrics() {
        let m = ForwardMetrics::new();
        assert!(m.stage_metrics.is_empty());
        assert!(m.slowest_stage().is_none());
        assert!(m.summary().contains("0 stages"));
    }

    #[test]
    fn test_record_and_finalise() {
        let mut m = ForwardMetrics::new();
        m.record_stage("0:conv".into(), Shape::chw(4, 8, 8), Duration::from_millis(10));
        m.record_stage("1:max_pool".into(), Shape::chw(4, 4, 4), Duration::from_millis(3));
        m.finalise(Duration::from_millis(20));

        assert_eq!(m.stage_metrics.len(), 2);
        assert_eq!(m.total_compute_duration, Duration::from_millis(13));
        assert_eq!(m.total_duration, Duration::from_millis(20));
        assert_eq!(m.slowest_stage().unwrap().stage_name, "0:conv");
    }

    #[test]
    fn test_summary_format() {
        let mut m = ForwardMetrics::new();
        m.record_stage("0:dense".into(), Shape::vector(10), Duration::from_millis(1));
        m.finalise(Duration::from_millis(2));

        let s = m.summary();
        assert!(s.contains("Forward:"));
        assert!(s.contains("1 stages"));
        assert!(s.contains("output [10]"));
        assert!(s.contains("slowest 0:dense"));
    }
}
