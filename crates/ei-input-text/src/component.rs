//! Component lifecycle: setup and unload

use std::path::Path;
use std::sync::Arc;

use ei_core::Context;
use ei_service_registry::SharedServiceRegistry;
use ei_state_registry::SharedStateRegistry;
use ei_storage::Store;
use tracing::info;

use crate::manager::InputTextManager;
use crate::service::register_input_text_services;
use crate::store::RecordStore;
use crate::{InputTextError, DOMAIN, STORAGE_KEY, STORAGE_VERSION};

/// A loaded enhanced_input component.
///
/// Returned by [`setup`]; dropping it does nothing — call
/// [`InputTextComponent::unload`] for an orderly teardown.
pub struct InputTextComponent {
    manager: Arc<InputTextManager>,
    services: SharedServiceRegistry,
}

/// Set up the enhanced_input component.
///
/// Restores stored entities into the live registry first, then registers
/// the command services, so reconciliation always completes before any
/// command is accepted.
pub async fn setup(
    states: SharedStateRegistry,
    services: SharedServiceRegistry,
    config_dir: impl AsRef<Path>,
) -> Result<InputTextComponent, InputTextError> {
    let store = Store::new(config_dir, STORAGE_KEY, STORAGE_VERSION);
    let manager = Arc::new(InputTextManager::new(RecordStore::new(store), states));

    let restored = manager.restore(Context::new()).await?;
    register_input_text_services(&services, manager.clone());

    info!(restored, "enhanced_input set up");
    Ok(InputTextComponent { manager, services })
}

impl InputTextComponent {
    /// The manager driving this component
    pub fn manager(&self) -> &Arc<InputTextManager> {
        &self.manager
    }

    /// Unload the component: unregister its services, stop accepting
    /// commands, and tear down every live entity along with its record.
    pub async fn unload(&self) {
        self.services.unregister_domain(DOMAIN);
        self.manager.set_loaded(false);
        self.manager.remove_all(Context::new()).await;
        info!("enhanced_input unloaded");
    }
}
