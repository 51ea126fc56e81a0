//! Service dispatch for the enhanced_input component
//!
//! The [`ServiceRegistry`] holds the async handlers commands are routed
//! to. The host dispatches one command at a time; handlers run to
//! completion once dispatched.

use dashmap::DashMap;
use ei_core::{Context, ServiceCall};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Result type for service calls
pub type ServiceResult = Result<(), ServiceError>;

/// Future type for async service handlers
pub type ServiceFuture = Pin<Box<dyn Future<Output = ServiceResult> + Send>>;

/// Service handler function type
pub type ServiceHandler = Arc<dyn Fn(ServiceCall) -> ServiceFuture + Send + Sync>;

/// Errors that can occur when dispatching services
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("service not found: {domain}.{service}")]
    NotFound { domain: String, service: String },

    #[error("service call failed: {0}")]
    CallFailed(String),
}

/// Registry of command handlers, indexed by `domain.service`.
pub struct ServiceRegistry {
    handlers: DashMap<String, ServiceHandler>,
}

impl ServiceRegistry {
    /// Create a new empty service registry
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Register a handler for `domain.service`, replacing any prior one.
    pub fn register<F, Fut>(&self, domain: impl Into<String>, service: impl Into<String>, handler: F)
    where
        F: Fn(ServiceCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ServiceResult> + Send + 'static,
    {
        let domain = domain.into();
        let service = service.into();
        let key = format!("{domain}.{service}");

        debug!(domain = %domain, service = %service, "registering service");

        let handler: ServiceHandler =
            Arc::new(move |call| Box::pin(handler(call)) as ServiceFuture);
        self.handlers.insert(key, handler);
    }

    /// Dispatch a command to its registered handler.
    pub async fn call(
        &self,
        domain: &str,
        service: &str,
        data: serde_json::Value,
        context: Context,
    ) -> ServiceResult {
        let key = format!("{domain}.{service}");

        let handler = match self.handlers.get(&key) {
            // Clone the Arc and release the map guard before awaiting
            Some(entry) => entry.value().clone(),
            None => {
                warn!(domain = %domain, service = %service, "service not found");
                return Err(ServiceError::NotFound {
                    domain: domain.to_string(),
                    service: service.to_string(),
                });
            }
        };

        debug!(domain = %domain, service = %service, "calling service");
        handler(ServiceCall::new(domain, service, data, context)).await
    }

    /// Whether a handler is registered for `domain.service`
    pub fn has_service(&self, domain: &str, service: &str) -> bool {
        self.handlers.contains_key(&format!("{domain}.{service}"))
    }

    /// Remove a handler. Returns whether one was registered.
    pub fn unregister(&self, domain: &str, service: &str) -> bool {
        let removed = self.handlers.remove(&format!("{domain}.{service}")).is_some();
        if removed {
            debug!(domain = %domain, service = %service, "unregistered service");
        }
        removed
    }

    /// Remove every handler belonging to a domain. Returns how many were removed.
    pub fn unregister_domain(&self, domain: &str) -> usize {
        let prefix = format!("{domain}.");
        let keys: Vec<String> = self
            .handlers
            .iter()
            .filter(|e| e.key().starts_with(&prefix))
            .map(|e| e.key().clone())
            .collect();

        let count = keys.len();
        for key in keys {
            self.handlers.remove(&key);
        }

        debug!(domain = %domain, count = count, "unregistered domain services");
        count
    }

    /// Total number of registered handlers
    pub fn service_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe wrapper for ServiceRegistry
pub type SharedServiceRegistry = Arc<ServiceRegistry>;
