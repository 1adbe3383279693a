//! Agent domain: roles, their behaviors and what they extract from model
//! output.

pub mod behavior;
pub mod output;
pub mod plan_parser;
pub mod role;
