//! Entity Store Module
//!
//! Provides the `EntityStore` trait that abstracts the hosted entity API the
//! application talks to, plus the `MemoryStore` backend used by tests and
//! local development.
//!
//! Every entity type is exposed through the same collection interface:
//! list, filter (field/value equality), create (returns the record with its
//! id assigned), update (partial record), delete. The allocator only ever
//! issues `filter` and `create` calls; the surrounding CRUD screens own the
//! rest.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::RwLock;
use uuid::Uuid;

/// Entity store error type
#[derive(Debug)]
pub enum StoreError {
    /// Record could not be (de)serialized to the collection representation
    Serialization(String),
    /// No record with the given id in the collection
    NotFound { collection: &'static str, id: Uuid },
    /// Backend failure (transport, lock, or remote API error)
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Serialization(s) => {
                write!(f, "Serialization error: {s}")
            }
            StoreError::NotFound { collection, id } => {
                write!(f, "Record {id} not found in collection '{collection}'")
            }
            StoreError::Backend(s) => {
                write!(f, "Store backend error: {s}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Field-equality filter for `EntityStore::filter`.
///
/// A record matches when every named field of the filter is present on the
/// record (in its serialized form) with an equal value.
///
/// # Example
///
/// ```
/// use archivault::store::EntityFilter;
/// use uuid::Uuid;
///
/// let parent_id = Uuid::new_v4();
/// let filter = EntityFilter::new()
///     .field("parent_location_id", &parent_id)
///     .field("is_individual_address", &true);
/// assert_eq!(filter.fields().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntityFilter {
    fields: BTreeMap<String, JsonValue>,
}

impl EntityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field/value equality predicate.
    ///
    /// Values that fail JSON conversion are skipped with a warning; a filter
    /// predicate that cannot be expressed must not silently match everything
    /// under a bogus value.
    pub fn field<V: Serialize>(mut self, name: &str, value: &V) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.fields.insert(name.to_string(), value);
            }
            Err(e) => {
                log::warn!("Dropping unserializable filter field '{name}': {e}");
            }
        }
        self
    }

    pub fn fields(&self) -> &BTreeMap<String, JsonValue> {
        &self.fields
    }

    /// True when the serialized record satisfies every predicate field.
    pub fn matches(&self, record: &JsonValue) -> bool {
        self.fields.iter().all(|(name, expected)| {
            record.get(name).map(|actual| actual == expected).unwrap_or(expected.is_null())
        })
    }
}

/// Trait for records stored in an entity collection
///
/// Implemented by each entity type; the collection name and the id field are
/// the only pieces of schema the store needs to know about.
pub trait EntityRecord: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Name of the collection this record type lives in
    const COLLECTION: &'static str;

    /// The record id, if one has been assigned
    fn id(&self) -> Option<Uuid>;

    /// Set the record id (called by the store on create)
    fn set_id(&mut self, id: Uuid);
}

/// Trait for entity collection backends
///
/// This trait abstracts the hosted entity API, allowing different
/// implementations (remote HTTP client, in-memory store, failure-injecting
/// test wrappers) to be used interchangeably.
///
/// # Examples
///
/// ```
/// use archivault::store::{EntityStore, MemoryStore};
/// use archivault::entity::PhysicalDocument;
///
/// let store = MemoryStore::new();
/// let docs: Vec<PhysicalDocument> = store.list().expect("list");
/// assert!(docs.is_empty());
/// ```
pub trait EntityStore {
    /// Return every record in the collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend call or record decoding fails.
    fn list<R: EntityRecord>(&self) -> Result<Vec<R>, StoreError>;

    /// Return the records matching every field of the filter.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend call or record decoding fails.
    fn filter<R: EntityRecord>(&self, filter: &EntityFilter) -> Result<Vec<R>, StoreError>;

    /// Persist a new record and return it with its id assigned.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend rejects the record.
    fn create<R: EntityRecord>(&self, record: &R) -> Result<R, StoreError>;

    /// Apply a partial record (JSON object of field/value pairs) to the
    /// record with the given id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is unknown, or another
    /// `StoreError` on backend failure.
    fn update<R: EntityRecord>(&self, id: Uuid, patch: &JsonValue) -> Result<(), StoreError>;

    /// Remove the record with the given id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is unknown, or another
    /// `StoreError` on backend failure.
    fn delete<R: EntityRecord>(&self, id: Uuid) -> Result<(), StoreError>;
}

/// In-memory `EntityStore` backend
///
/// Collections are keyed by name and hold the serialized form of each
/// record, which is also what filters match against. Used by the test suite
/// and as the development backend; the production transport lives behind the
/// same trait in the application shell.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<&'static str, Vec<JsonValue>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held in a collection.
    pub fn collection_len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|map| map.get(collection).map(Vec::len).unwrap_or(0))
            .unwrap_or(0)
    }

    fn read_collection(&self, collection: &'static str) -> Result<Vec<JsonValue>, StoreError> {
        let map = self
            .collections
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        Ok(map.get(collection).cloned().unwrap_or_default())
    }
}

fn decode_records<R: EntityRecord>(raw: Vec<JsonValue>) -> Result<Vec<R>, StoreError> {
    let mut records = Vec::with_capacity(raw.len());
    for value in raw {
        let record = serde_json::from_value(value)
            .map_err(|e| StoreError::Serialization(format!("Failed to decode record: {e}")))?;
        records.push(record);
    }
    Ok(records)
}

impl EntityStore for MemoryStore {
    fn list<R: EntityRecord>(&self) -> Result<Vec<R>, StoreError> {
        decode_records(self.read_collection(R::COLLECTION)?)
    }

    fn filter<R: EntityRecord>(&self, filter: &EntityFilter) -> Result<Vec<R>, StoreError> {
        let raw = self.read_collection(R::COLLECTION)?;
        decode_records(raw.into_iter().filter(|value| filter.matches(value)).collect())
    }

    fn create<R: EntityRecord>(&self, record: &R) -> Result<R, StoreError> {
        let mut stored = record.clone();
        if stored.id().is_none() {
            stored.set_id(Uuid::new_v4());
        }
        let value = serde_json::to_value(&stored)?;
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        map.entry(R::COLLECTION).or_default().push(value);
        Ok(stored)
    }

    fn update<R: EntityRecord>(&self, id: Uuid, patch: &JsonValue) -> Result<(), StoreError> {
        let patch = patch.as_object().ok_or_else(|| {
            StoreError::Serialization("Update patch must be a JSON object".to_string())
        })?;
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        let records = map
            .get_mut(R::COLLECTION)
            .ok_or(StoreError::NotFound { collection: R::COLLECTION, id })?;
        let index = records
            .iter()
            .position(|value| has_id(value, id))
            .ok_or(StoreError::NotFound { collection: R::COLLECTION, id })?;
        merge_patch(&mut records[index], patch);
        Ok(())
    }

    fn delete<R: EntityRecord>(&self, id: Uuid) -> Result<(), StoreError> {
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        let records = map
            .get_mut(R::COLLECTION)
            .ok_or(StoreError::NotFound { collection: R::COLLECTION, id })?;
        let before = records.len();
        records.retain(|value| !has_id(value, id));
        if records.len() == before {
            return Err(StoreError::NotFound { collection: R::COLLECTION, id });
        }
        Ok(())
    }
}

fn has_id(value: &JsonValue, id: Uuid) -> bool {
    value
        .get("id")
        .and_then(JsonValue::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(|record_id| record_id == id)
        .unwrap_or(false)
}

fn merge_patch(target: &mut JsonValue, patch: &Map<String, JsonValue>) {
    if let Some(object) = target.as_object_mut() {
        for (key, value) in patch {
            object.insert(key.clone(), value.clone());
        }
    }
}
