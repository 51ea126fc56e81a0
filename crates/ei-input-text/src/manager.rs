//! InputTextManager: maps command intents to record and registry operations

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use ei_core::{Context, EntityId};
use ei_state_registry::SharedStateRegistry;
use tracing::{debug, error, info, warn};

use crate::store::RecordStore;
use crate::{InputTextError, Record, DOMAIN};

/// Orchestrates creation, update, and deletion of long text input
/// entities, keeping the live registry and the record store in lockstep.
///
/// An entity and its record are lifetime-linked: registering one implies
/// storing the other, and unregistering removes both.
pub struct InputTextManager {
    records: RecordStore,
    states: SharedStateRegistry,
    loaded: AtomicBool,
}

impl InputTextManager {
    /// Create a manager. It accepts no commands until [`restore`] has run.
    ///
    /// [`restore`]: InputTextManager::restore
    pub fn new(records: RecordStore, states: SharedStateRegistry) -> Self {
        Self {
            records,
            states,
            loaded: AtomicBool::new(false),
        }
    }

    /// Startup reconciliation: load stored records and register a live
    /// entity for every identifier that is not already live. Marks the
    /// manager loaded, so commands are accepted from here on.
    pub async fn restore(&self, context: Context) -> Result<usize, InputTextError> {
        let live: HashSet<String> = self.states.entity_ids(DOMAIN).into_iter().collect();
        let restored = self.records.load(&live).await?;

        let count = restored.len();
        for (entity_id, record) in restored {
            let friendly_name = entity_id.display_name();
            self.states.set(
                entity_id,
                record.title.as_str(),
                record.attributes(&friendly_name),
                context.clone(),
            );
        }

        self.loaded.store(true, Ordering::SeqCst);
        if count > 0 {
            info!(count, "restored long text input entities");
        }
        Ok(count)
    }

    /// Create a long text input, or update it in place if one with the
    /// derived identifier is already registered.
    ///
    /// On update, a field left unset keeps its prior value, and an update
    /// that changes nothing skips both the save and the state-changed
    /// notification. On create, `title` defaults to `name` and `text` to
    /// empty.
    ///
    /// A failed save is logged and returned as an error, but the new value
    /// remains the working state both in memory and in the live registry.
    pub async fn create_or_update(
        &self,
        name: &str,
        title: Option<&str>,
        text: Option<&str>,
        context: Context,
    ) -> Result<EntityId, InputTextError> {
        if !self.is_loaded() {
            return Err(InputTextError::NotLoaded);
        }

        let name = name.trim();
        let entity_id = EntityId::from_name(DOMAIN, name)?;
        let key = entity_id.to_string();

        let prior = if self.states.contains(&key) {
            self.records.get(&key)
        } else {
            None
        };

        let record = match &prior {
            Some(existing) => {
                let updated = Record::new(
                    title.unwrap_or(existing.title.as_str()),
                    text.unwrap_or(existing.text.as_str()),
                );
                if updated == *existing {
                    debug!(entity_id = %entity_id, "no changes; skipping save and notification");
                    return Ok(entity_id);
                }
                debug!(entity_id = %entity_id, "updating existing entity");
                updated
            }
            None => {
                info!(entity_id = %entity_id, "creating new entity");
                Record::new(title.unwrap_or(name), text.unwrap_or(""))
            }
        };

        let saved = self.records.put(&entity_id, record.clone()).await;
        if let Err(err) = &saved {
            error!(entity_id = %entity_id, error = %err, "failed to persist record; keeping in-memory value");
        }
        self.states.set(
            entity_id.clone(),
            record.title.as_str(),
            record.attributes(name),
            context,
        );
        saved?;
        Ok(entity_id)
    }

    /// Delete the long text input derived from `name`.
    ///
    /// A registered entity is unregistered and its record removed. An
    /// orphaned stored record (registered nowhere) is removed from the
    /// store alone. A wholly unknown identifier is a logged no-op.
    pub async fn delete(&self, name: Option<&str>, context: Context) -> Result<(), InputTextError> {
        if !self.is_loaded() {
            return Err(InputTextError::NotLoaded);
        }

        let name = match name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                error!("delete_input_text requires a 'name'");
                return Err(InputTextError::InvalidArgument("name"));
            }
        };
        let entity_id = EntityId::from_name(DOMAIN, name)?;
        let key = entity_id.to_string();

        if self.states.remove(&entity_id, context).is_some() {
            info!(entity_id = %entity_id, "deleting entity");
            self.remove_record(&entity_id).await
        } else if self.records.contains(&key) {
            info!(entity_id = %entity_id, "removing orphaned stored record");
            self.remove_record(&entity_id).await
        } else {
            warn!(entity_id = %entity_id, "no entity or stored record to delete");
            Err(InputTextError::NotFound(key))
        }
    }

    /// Host-driven teardown: unregister every live entity in the domain
    /// and remove its record.
    pub async fn remove_all(&self, context: Context) {
        for key in self.states.entity_ids(DOMAIN) {
            if let Ok(entity_id) = key.parse::<EntityId>() {
                self.states.remove(&entity_id, context.clone());
            }
            if let Err(err) = self.records.remove(&key).await {
                error!(identifier = %key, error = %err, "failed to persist record removal during teardown");
            }
        }
    }

    /// Whether a managing context is established (restore has run and the
    /// component has not been unloaded)
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    pub(crate) fn set_loaded(&self, loaded: bool) {
        self.loaded.store(loaded, Ordering::SeqCst);
    }

    /// The record store backing this manager
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    async fn remove_record(&self, entity_id: &EntityId) -> Result<(), InputTextError> {
        match self.records.remove(&entity_id.to_string()).await {
            Ok(_) => Ok(()),
            Err(err) => {
                error!(entity_id = %entity_id, error = %err, "failed to persist record removal");
                Err(err.into())
            }
        }
    }
}
