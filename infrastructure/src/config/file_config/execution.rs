//! Execution settings from TOML (`[execution]` section)

use draftsmith_application::ExecutionParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Timeout for each candidate model call, in seconds
    pub call_timeout_secs: u64,
    /// Capacity of the streaming event channel
    pub event_channel_capacity: usize,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            call_timeout_secs: params.call_timeout.as_secs(),
            event_channel_capacity: params.event_channel_capacity,
        }
    }
}

impl FileExecutionConfig {
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_call_timeout(Duration::from_secs(self.call_timeout_secs.max(1)))
            .with_event_channel_capacity(self.event_channel_capacity.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values_are_clamped() {
        let config = FileExecutionConfig {
            call_timeout_secs: 0,
            event_channel_capacity: 0,
        };
        let params = config.to_execution_params();
        assert_eq!(params.call_timeout, Duration::from_secs(1));
        assert_eq!(params.event_channel_capacity, 1);
    }
}
