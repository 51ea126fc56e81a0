//! Entity state: the host-visible snapshot of one entity

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Context, EntityId};

/// The host-visible state of an entity at a point in time.
///
/// Carries the state value (a string), the attribute map, and timestamps
/// for when the value last changed and when it was last written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityState {
    /// The entity this state belongs to
    pub entity_id: EntityId,

    /// The state value
    pub state: String,

    /// Additional attributes exposed alongside the state
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,

    /// When the state value last changed
    pub last_changed: DateTime<Utc>,

    /// When the state was last written, even if the value was unchanged
    pub last_updated: DateTime<Utc>,

    /// Context of the change that produced this state
    pub context: Context,
}

impl EntityState {
    /// Create a new state with the current timestamp
    pub fn new(
        entity_id: EntityId,
        state: impl Into<String>,
        attributes: HashMap<String, serde_json::Value>,
        context: Context,
    ) -> Self {
        let now = Utc::now();
        Self {
            entity_id,
            state: state.into(),
            attributes,
            last_changed: now,
            last_updated: now,
            context,
        }
    }

    /// Create an updated state, keeping `last_changed` when the value is the same
    pub fn with_update(
        &self,
        new_state: impl Into<String>,
        new_attributes: HashMap<String, serde_json::Value>,
        context: Context,
    ) -> Self {
        let now = Utc::now();
        let new_state = new_state.into();
        let changed = self.state != new_state;

        Self {
            entity_id: self.entity_id.clone(),
            state: new_state,
            attributes: new_attributes,
            last_changed: if changed { now } else { self.last_changed },
            last_updated: now,
            context,
        }
    }

    /// Get a typed attribute value by key
    pub fn attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

impl PartialEq for EntityState {
    fn eq(&self, other: &Self) -> bool {
        // Timestamps and context are not compared
        self.entity_id == other.entity_id
            && self.state == other.state
            && self.attributes == other.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notes_id() -> EntityId {
        EntityId::from_name("enhanced_input", "Notes").unwrap()
    }

    #[test]
    fn test_with_update_keeps_last_changed_for_same_value() {
        let state = EntityState::new(notes_id(), "My Notes", HashMap::new(), Context::new());
        let updated = state.with_update("My Notes", HashMap::new(), Context::new());

        assert_eq!(updated.last_changed, state.last_changed);
        assert!(updated.last_updated >= state.last_updated);
    }

    #[test]
    fn test_with_update_bumps_last_changed_for_new_value() {
        let state = EntityState::new(notes_id(), "My Notes", HashMap::new(), Context::new());
        let updated = state.with_update("Renamed", HashMap::new(), Context::new());

        assert_eq!(updated.state, "Renamed");
        assert!(updated.last_changed >= state.last_changed);
        assert_eq!(updated.entity_id, state.entity_id);
    }

    #[test]
    fn test_typed_attribute_access() {
        let mut attributes = HashMap::new();
        attributes.insert("long_text".to_string(), json!("hello"));
        attributes.insert("length".to_string(), json!(5));

        let state = EntityState::new(notes_id(), "My Notes", attributes, Context::new());
        assert_eq!(state.attribute::<String>("long_text").as_deref(), Some("hello"));
        assert_eq!(state.attribute::<usize>("length"), Some(5));
        assert_eq!(state.attribute::<usize>("missing"), None);
    }
}
