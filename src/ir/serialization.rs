//! JSON in and out for [`Request`], with serde errors mapped to
//! `StoreError::Internal`.

use crate::error::StoreError;
use crate::ir::operations::Request;

/// Serialize a request to pretty JSON.
pub fn to_json_pretty(request: &Request) -> Result<String, StoreError> {
    serde_json::to_string_pretty(request)
        .map_err(|e| StoreError::internal(format!("serialize request: {e}")))
}

/// Deserialize a request from JSON.
pub fn from_json(s: &str) -> Result<Request, StoreError> {
    serde_json::from_str::<Request>(s)
        .map_err(|e| StoreError::internal(format!("deserialize request: {e}")))
}
