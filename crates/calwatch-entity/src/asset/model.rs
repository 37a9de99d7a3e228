//! Asset entity model.

use serde::{Deserialize, Serialize};

use calwatch_core::types::id::AssetId;

use super::state::AssetState;

/// A tracked piece of equipment or infrastructure.
///
/// Assets are owned by the external asset/record store; the engine only
/// reads `id` and `state`. `name` is carried through into notification
/// payloads for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique asset identifier.
    pub id: AssetId,
    /// Human-readable asset name.
    pub name: String,
    /// Lifecycle state.
    pub state: AssetState,
}
