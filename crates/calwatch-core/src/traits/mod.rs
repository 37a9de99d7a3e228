//! Traits for pluggable collaborators.

pub mod state;

pub use state::StateStore;
