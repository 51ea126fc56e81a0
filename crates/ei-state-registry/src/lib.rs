//! Live entity registry for the enhanced_input component
//!
//! Tracks the current state of every registered entity and notifies
//! subscribers of each registration, update, and removal over a
//! broadcast channel.

use dashmap::DashMap;
use ei_core::{Context, EntityId, EntityState};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Default capacity of the notification channel
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Notification fired for every registration, update, and removal.
///
/// `new_state` is `None` when the entity was removed; `old_state` is
/// `None` when it was newly registered.
#[derive(Debug, Clone)]
pub struct StateChange {
    pub entity_id: EntityId,
    pub old_state: Option<EntityState>,
    pub new_state: Option<EntityState>,
    pub context: Context,
}

/// The registry of live, host-visible entities.
///
/// Entities exist exactly as long as their entry here: registering is a
/// `set`, unregistering is a `remove`. Every mutation fires one
/// [`StateChange`] to subscribers.
pub struct StateRegistry {
    /// Current state per entity, keyed by the full entity_id string
    states: DashMap<String, EntityState>,
    /// Notification channel for state changes
    tx: broadcast::Sender<StateChange>,
}

impl StateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a registry with a specific notification channel capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            states: DashMap::new(),
            tx,
        }
    }

    /// Register an entity or update its state.
    ///
    /// `last_changed` is preserved when the state value is unchanged.
    /// Fires a [`StateChange`] carrying the old and new state.
    pub fn set(
        &self,
        entity_id: EntityId,
        state: impl Into<String>,
        attributes: HashMap<String, serde_json::Value>,
        context: Context,
    ) -> EntityState {
        let key = entity_id.to_string();

        let old_state = self.states.get(&key).map(|s| s.clone());
        let new_state = match &old_state {
            Some(existing) => existing.with_update(state, attributes, context.clone()),
            None => EntityState::new(entity_id.clone(), state, attributes, context.clone()),
        };

        debug!(
            entity_id = %entity_id,
            state = %new_state.state,
            registered = old_state.is_none(),
            "setting entity state"
        );

        self.states.insert(key, new_state.clone());
        self.notify(StateChange {
            entity_id,
            old_state,
            new_state: Some(new_state.clone()),
            context,
        });

        new_state
    }

    /// Get the current state of an entity
    pub fn get(&self, entity_id: &str) -> Option<EntityState> {
        self.states.get(entity_id).map(|s| s.clone())
    }

    /// Whether an entity is currently registered
    pub fn contains(&self, entity_id: &str) -> bool {
        self.states.contains_key(entity_id)
    }

    /// Identifiers of all live entities in a domain
    pub fn entity_ids(&self, domain: &str) -> Vec<String> {
        let prefix = format!("{domain}.");
        self.states
            .iter()
            .filter(|r| r.key().starts_with(&prefix))
            .map(|r| r.key().clone())
            .collect()
    }

    /// Unregister an entity.
    ///
    /// Fires a [`StateChange`] with `new_state = None`. Returns the last
    /// state, or `None` if the entity was not registered.
    pub fn remove(&self, entity_id: &EntityId, context: Context) -> Option<EntityState> {
        let old_state = self.states.remove(&entity_id.to_string()).map(|(_, s)| s);

        if let Some(ref state) = old_state {
            trace!(entity_id = %entity_id, "removing entity state");
            self.notify(StateChange {
                entity_id: entity_id.clone(),
                old_state: Some(state.clone()),
                new_state: None,
                context,
            });
        }

        old_state
    }

    /// Subscribe to state change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.tx.subscribe()
    }

    /// Total number of registered entities
    pub fn entity_count(&self) -> usize {
        self.states.len()
    }

    fn notify(&self, change: StateChange) {
        // A send error only means there are no active subscribers
        let _ = self.tx.send(change);
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe wrapper for StateRegistry
pub type SharedStateRegistry = Arc<StateRegistry>;
