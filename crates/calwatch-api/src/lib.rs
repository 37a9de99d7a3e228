//! # calwatch-api
//!
//! The query/command façade the UI layer talks to. Composes the
//! notification store's operations with the scheduler's manual trigger and
//! the settings store's configuration access; exposes a push-based
//! subscription to engine events.

pub mod facade;

pub use facade::ComplianceApi;
