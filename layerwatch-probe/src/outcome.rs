use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Classified result of probing a single service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub url: String,
    pub accessible: bool,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Raw body kept when the response did not parse as JSON. Diagnostics
    /// only; nothing downstream depends on it.
    #[serde(skip)]
    pub raw_body: Option<String>,
    pub response_time: Duration,
}

impl CheckOutcome {
    pub fn accessible(url: String, payload: Value, response_time: Duration) -> Self {
        Self {
            url,
            accessible: true,
            error: None,
            payload: Some(payload),
            raw_body: None,
            response_time,
        }
    }

    pub fn failed(url: String, error: String, response_time: Duration) -> Self {
        Self {
            url,
            accessible: false,
            error: Some(error),
            payload: None,
            raw_body: None,
            response_time,
        }
    }
}
