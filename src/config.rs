//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration for [`PostqlEngine`](crate::engine::PostqlEngine).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-subscription queue bound. `None` keeps queues unbounded; with a
    /// bound, a listener whose queue is full misses that event while other
    /// listeners and the publishing mutation are unaffected.
    pub subscription_capacity: Option<usize>,
    /// Load the demo data set when the engine is built.
    pub seed_demo_data: bool,
}

impl EngineConfig {
    /// Parse a JSON document. Missing keys take their defaults.
    pub fn from_json_str(s: &str) -> StoreResult<Self> {
        serde_json::from_str(s).map_err(|e| StoreError::internal(format!("parse config: {e}")))
    }
}
