//! Command handlers for the enhanced_input domain

use std::sync::Arc;

use ei_core::ServiceCall;
use ei_service_registry::ServiceRegistry;
use tracing::{debug, warn};

use crate::manager::InputTextManager;
use crate::{DEFAULT_NAME, DOMAIN, SERVICE_CREATE_INPUT_TEXT, SERVICE_DELETE_INPUT_TEXT};

/// Register the `create_input_text` and `delete_input_text` services.
///
/// Handler failures degrade to logs: the dispatcher sees the command
/// complete either way, matching the host's no-error-channel contract.
pub fn register_input_text_services(services: &ServiceRegistry, manager: Arc<InputTextManager>) {
    let create_manager = manager.clone();
    services.register(
        DOMAIN,
        SERVICE_CREATE_INPUT_TEXT,
        move |call: ServiceCall| {
            let manager = create_manager.clone();
            async move {
                let name = call
                    .get::<String>("name")
                    .unwrap_or_else(|| DEFAULT_NAME.to_string());
                let title = call.get::<String>("title");
                let text = call.get::<String>("text");

                match manager
                    .create_or_update(&name, title.as_deref(), text.as_deref(), call.context)
                    .await
                {
                    Ok(entity_id) => {
                        debug!(entity_id = %entity_id, "create_input_text handled");
                    }
                    Err(err) => {
                        warn!(name = %name, error = %err, "create_input_text failed");
                    }
                }
                Ok(())
            }
        },
    );

    let delete_manager = manager;
    services.register(
        DOMAIN,
        SERVICE_DELETE_INPUT_TEXT,
        move |call: ServiceCall| {
            let manager = delete_manager.clone();
            async move {
                let name = call.get::<String>("name");

                match manager.delete(name.as_deref(), call.context).await {
                    Ok(()) => {
                        debug!("delete_input_text handled");
                    }
                    Err(err) => {
                        warn!(error = %err, "delete_input_text failed");
                    }
                }
                Ok(())
            }
        },
    );

    debug!("input text services registered");
}
