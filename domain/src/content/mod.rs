//! Selected content domain.
//!
//! - [`entities::SelectedContent`]: an item the user picked for the request
//! - [`entities::Connection`]: a user-drawn relation between two items
//! - [`entities::UsedContent`]: per-item token accounting reported back

pub mod entities;
