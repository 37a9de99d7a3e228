//! # calwatch-core
//!
//! Core crate for Calwatch. Contains collaborator traits, configuration
//! schemas, typed identifiers, engine events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Calwatch crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
