//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: model aliases used by fallback tables
//! - [`tier::Tier`]: quality/cost classes of models
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod tier;
