//! Application-level configuration.
//!
//! - [`FallbackTable`]: ordered candidate models per tier
//! - [`ModelPreferences`]: per-request preferred model per tier
//! - [`ExecutionParams`]: call timeout and event channel sizing

pub mod execution_params;
pub mod fallback_table;

pub use execution_params::ExecutionParams;
pub use fallback_table::{FallbackTable, FallbackTableError, ModelPreferences};
