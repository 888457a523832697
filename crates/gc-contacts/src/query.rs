//! Query-string encoding

use crate::error::{ContactsError, Result};

/// Encode key/value pairs as `application/x-www-form-urlencoded`,
/// keeping insertion order.
pub fn encode(params: &[(&str, String)]) -> Result<String> {
    serde_urlencoded::to_string(params).map_err(|e| ContactsError::Encode(e.to_string()))
}
