//! Service call type carrying a free-form command payload

use crate::Context;
use serde::{Deserialize, Serialize};

/// A command dispatched to a registered service.
///
/// The payload is a free-form JSON object; handlers pull the fields they
/// understand out of it with [`ServiceCall::get`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCall {
    /// The domain the service belongs to (e.g. "enhanced_input")
    pub domain: String,

    /// The service name (e.g. "create_input_text")
    pub service: String,

    /// Free-form key/value payload
    pub data: serde_json::Value,

    /// Context tracking who initiated this call
    pub context: Context,
}

impl ServiceCall {
    /// Create a new service call
    pub fn new(
        domain: impl Into<String>,
        service: impl Into<String>,
        data: serde_json::Value,
        context: Context,
    ) -> Self {
        Self {
            domain: domain.into(),
            service: service.into(),
            data,
            context,
        }
    }

    /// Get the full service identifier (domain.service)
    pub fn service_id(&self) -> String {
        format!("{}.{}", self.domain, self.service)
    }

    /// Get a typed value from the payload, or None if absent or mistyped
    pub fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
