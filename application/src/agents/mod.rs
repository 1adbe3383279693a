//! Agents: the shared run loop and plan construction.

pub mod planner;
pub mod runner;

pub use planner::{PlanOutcome, Planner, build_plan, draft_plan, heuristic_decision};
pub use runner::AgentRunner;
