//! Tracked asset entity.

pub mod model;
pub mod state;

pub use model::Asset;
pub use state::AssetState;
