//! Use cases
//!
//! - [`run_orchestration`]: entry point: contents, plan, execution, response
//! - [`execute_plan`]: the stage executor

pub mod execute_plan;
pub mod run_orchestration;
