//! Refresh-token session entities.

pub mod model;
pub mod token;

pub use model::RefreshSession;
pub use token::TokenPair;
