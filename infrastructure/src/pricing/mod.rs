//! Cost and token accounting
//!
//! - [`wtu::WtuCalculator`]: weighted token units from `[pricing]`
//! - [`token_counter::HeuristicTokenCounter`]: local token estimate

pub mod token_counter;
pub mod wtu;

pub use token_counter::HeuristicTokenCounter;
pub use wtu::WtuCalculator;
