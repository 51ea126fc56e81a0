//! RecordStore: the single source of truth for persisted records

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use ei_core::EntityId;
use ei_storage::{Store, StorageResult};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::Record;

/// The persisted blob: identifier -> {title, text}
type StoredRecords = HashMap<String, Value>;

/// Owns the record collection and keeps it in lockstep with the
/// persistent medium: every mutation is followed by a full-snapshot
/// save, awaited to completion before the operation returns.
pub struct RecordStore {
    records: RwLock<HashMap<String, Record>>,
    store: Store<StoredRecords>,
}

impl RecordStore {
    pub fn new(store: Store<StoredRecords>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            store,
        }
    }

    /// Read the persisted blob and reconcile it against the live entity set.
    ///
    /// Stored entries are interpreted per identifier:
    /// - an unparseable identifier, or a value that is not an object, is
    ///   logged and dropped;
    /// - `null` and empty-object values are deleted placeholders and dropped;
    /// - anything else becomes a [`Record`], with `text` defaulting to empty
    ///   and `title` to the identifier's display form.
    ///
    /// Every kept record enters the collection; the ones whose identifier is
    /// not in `live` are returned for restoration. The pruned collection is
    /// persisted before returning, so the snapshot matches memory.
    pub async fn load(&self, live: &HashSet<String>) -> StorageResult<Vec<(EntityId, Record)>> {
        let stored = self.store.load().await?.unwrap_or_default();

        let mut records = HashMap::new();
        let mut restored = Vec::new();

        for (key, value) in stored {
            let entity_id = match key.parse::<EntityId>() {
                Ok(id) => id,
                Err(err) => {
                    warn!(identifier = %key, error = %err, "dropping stored record with malformed identifier");
                    continue;
                }
            };

            let fields = match value {
                Value::Null => {
                    debug!(entity_id = %entity_id, "dropping deleted placeholder");
                    continue;
                }
                Value::Object(map) if map.is_empty() => {
                    debug!(entity_id = %entity_id, "dropping empty stored record");
                    continue;
                }
                Value::Object(map) => map,
                _ => {
                    warn!(entity_id = %entity_id, "dropping malformed stored record");
                    continue;
                }
            };

            let title = fields
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| entity_id.display_name());
            let text = fields
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            let record = Record::new(title, text);
            if !live.contains(&key) {
                restored.push((entity_id, record.clone()));
            }
            records.insert(key, record);
        }

        info!(
            kept = records.len(),
            restoring = restored.len(),
            "loaded stored long text inputs"
        );

        if let Ok(mut current) = self.records.write() {
            *current = records;
        }
        self.save().await?;

        Ok(restored)
    }

    /// Insert or overwrite a record, then persist.
    pub async fn put(&self, entity_id: &EntityId, record: Record) -> StorageResult<()> {
        if let Ok(mut records) = self.records.write() {
            records.insert(entity_id.to_string(), record);
        }
        self.save().await
    }

    /// Remove a record if present, then persist. Absent identifiers are a
    /// no-op and trigger no save.
    pub async fn remove(&self, entity_id: &str) -> StorageResult<bool> {
        let removed = self
            .records
            .write()
            .map(|mut records| records.remove(entity_id).is_some())
            .unwrap_or(false);

        if removed {
            self.save().await?;
        }
        Ok(removed)
    }

    /// Persist the entire collection, overwriting the prior blob.
    pub async fn save(&self) -> StorageResult<()> {
        let snapshot: StoredRecords = self
            .records
            .read()
            .map(|records| {
                records
                    .iter()
                    .map(|(id, r)| (id.clone(), json!({"title": r.title, "text": r.text})))
                    .collect()
            })
            .unwrap_or_default();

        self.store.save(&snapshot).await
    }

    pub fn get(&self, entity_id: &str) -> Option<Record> {
        self.records
            .read()
            .ok()
            .and_then(|records| records.get(entity_id).cloned())
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.records
            .read()
            .map(|records| records.contains_key(entity_id))
            .unwrap_or(false)
    }

    pub fn ids(&self) -> Vec<String> {
        self.records
            .read()
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
