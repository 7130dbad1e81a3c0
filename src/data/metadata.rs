//! Field metadata and record display names.
//!
//! Field descriptors come from the remote's `fields_get` answer. Display names
//! of related records are served from a shared cache; names the cache does not
//! know yet are remembered so the host can resolve them in one batch.

use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::data::error::{DataError, DataResult};
use crate::types::{FieldDescriptor, FieldKind, RecordId};

/// Synchronous lookup of record display names for relational cells.
pub trait MetadataRepository: Send + Sync {
    /// Display name of record `id` of `model`, if known
    fn record_display_name(&self, model: &str, id: RecordId) -> Option<String>;
}

/// In-memory display name cache.
#[derive(Debug, Default)]
pub struct InMemoryMetadata {
    names: RwLock<HashMap<(String, RecordId), String>>,
    /// Lookups that missed the cache, in (model, id) order
    unresolved: RwLock<BTreeSet<(String, RecordId)>>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_display_name(&self, model: &str, id: RecordId, name: impl Into<String>) {
        let key = (model.to_string(), id);
        self.unresolved.write().remove(&key);
        self.names.write().insert(key, name.into());
    }

    /// Insert a batch of names for one model, e.g. the answer to a name lookup
    pub fn insert_display_names<I, S>(&self, model: &str, names: I)
    where
        I: IntoIterator<Item = (RecordId, S)>,
        S: Into<String>,
    {
        let mut cache = self.names.write();
        let mut unresolved = self.unresolved.write();
        for (id, name) in names {
            let key = (model.to_string(), id);
            unresolved.remove(&key);
            cache.insert(key, name.into());
        }
    }

    /// Drain the lookups that missed, grouped by model
    pub fn take_unresolved(&self) -> HashMap<String, Vec<RecordId>> {
        let drained = std::mem::take(&mut *self.unresolved.write());
        let mut grouped: HashMap<String, Vec<RecordId>> = HashMap::new();
        for (model, id) in drained {
            grouped.entry(model).or_default().push(id);
        }
        grouped
    }

    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}

impl MetadataRepository for InMemoryMetadata {
    fn record_display_name(&self, model: &str, id: RecordId) -> Option<String> {
        let key = (model.to_string(), id);
        if let Some(name) = self.names.read().get(&key) {
            return Some(name.clone());
        }
        tracing::trace!(model, id, "Display name not cached");
        self.unresolved.write().insert(key);
        None
    }
}

// ============================================================================
// fields_get parsing
// ============================================================================

/// A field entry as the remote describes it
#[derive(Deserialize)]
struct RawField {
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    string: Option<String>,
    #[serde(default)]
    relation: Option<String>,
    #[serde(default)]
    selection: Option<Vec<(Value, String)>>,
    #[serde(default)]
    currency_field: Option<String>,
}

impl RawField {
    fn into_descriptor(self, name: &str) -> DataResult<FieldDescriptor> {
        let invalid = |reason: &str| DataError::InvalidField {
            field: name.to_string(),
            reason: reason.to_string(),
        };

        let kind = match self.field_type.as_str() {
            "many2one" | "one2many" | "many2many" => {
                let relation = self
                    .relation
                    .ok_or_else(|| invalid("relational field without relation"))?;
                match self.field_type.as_str() {
                    "many2one" => FieldKind::Many2one { relation },
                    "one2many" => FieldKind::One2many { relation },
                    _ => FieldKind::Many2many { relation },
                }
            }
            "selection" => FieldKind::Selection {
                choices: self
                    .selection
                    .ok_or_else(|| invalid("selection field without choices"))?,
            },
            "boolean" => FieldKind::Boolean,
            "date" => FieldKind::Date,
            "datetime" => FieldKind::Datetime,
            "monetary" => FieldKind::Monetary {
                currency_field: self
                    .currency_field
                    .ok_or_else(|| invalid("monetary field without currency_field"))?,
            },
            other => FieldKind::Other(other.to_string()),
        };

        Ok(FieldDescriptor {
            name: name.to_string(),
            label: self.string.unwrap_or_else(|| name.to_string()),
            kind,
        })
    }
}

/// Parse a `fields_get` answer (an object keyed by field name).
pub fn fields_from_json(value: &Value) -> DataResult<HashMap<String, FieldDescriptor>> {
    let object = value.as_object().ok_or_else(|| DataError::InvalidField {
        field: String::new(),
        reason: "fields description must be an object".to_string(),
    })?;

    object
        .iter()
        .map(|(name, raw)| -> DataResult<(String, FieldDescriptor)> {
            let raw: RawField = serde_json::from_value(raw.clone())?;
            Ok((name.clone(), raw.into_descriptor(name)?))
        })
        .collect()
}
