//! Execution parameters for the invoker and event channel.
//!
//! [`ExecutionParams`] groups the static parameters that control plan
//! execution. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Plan execution control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Timeout for each candidate model call. Expiry counts as a candidate
    /// failure and the next candidate is tried.
    pub call_timeout: Duration,
    /// Capacity of the event channel between executor and transport.
    pub event_channel_capacity: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(120),
            event_channel_capacity: 64,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity;
        self
    }
}
