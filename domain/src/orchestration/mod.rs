//! Orchestration domain: plans, their execution state, results, usage and
//! the event stream.

pub mod context;
pub mod event;
pub mod fragment;
pub mod plan;
pub mod result;
pub mod response;
pub mod state;
pub mod usage;
