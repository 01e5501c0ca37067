//! Order-preserving, name-keyed storage for grids, profiles, and other
//! model entities.
//!
//! A [`Warehouse`] owns its entities exclusively and hands out either
//! non-owning references or stable opaque [`Handle`]s. Handles are dense
//! vector indices valid for the lifetime of the warehouse, giving O(1)
//! repeated access without string lookup.
//!
//! Warehouses exist to decouple construction from consumption: a radiator can
//! ask for the `"temperature|K"` profile without knowing where it came from.

use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::errors::{SkyradError, SkyradResult};

/// Implemented by entities that can be stored in a [`Warehouse`].
pub trait Keyed {
    /// Entity kind used in error messages (e.g. `"grid"`).
    const KIND: &'static str;

    /// Unique warehouse key, conventionally `"name|units"`.
    fn key(&self) -> String;
}

/// Opaque handle to an entity in a [`Warehouse`].
///
/// A handle is only meaningful for the warehouse that issued it.
#[derive(Debug)]
pub struct Handle<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Dense index of the referenced entity.
    pub fn index(&self) -> usize {
        self.index
    }
}

// Manual impls: derive would require T: Clone/Copy/etc.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Handle<T> {}
impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}
impl<T> Eq for Handle<T> {}

/// Owning collection of entities keyed by `"name|units"`.
///
/// Insertion order is preserved, duplicate keys are rejected, and lookups of
/// missing keys are errors rather than silent defaults.
#[derive(Debug, Clone)]
pub struct Warehouse<T: Keyed> {
    items: Vec<T>,
    index: IndexMap<String, usize>,
}

impl<T: Keyed> Default for Warehouse<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> Warehouse<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: IndexMap::new(),
        }
    }

    /// Add an entity, returning a stable handle to it.
    ///
    /// Fails with [`SkyradError::DuplicateEntity`] if an entity with the same
    /// key is already stored.
    pub fn add(&mut self, item: T) -> SkyradResult<Handle<T>> {
        let key = item.key();
        if self.index.contains_key(&key) {
            return Err(SkyradError::DuplicateEntity { kind: T::KIND, key });
        }
        let idx = self.items.len();
        self.items.push(item);
        self.index.insert(key, idx);
        Ok(Handle::new(idx))
    }

    /// Look up an entity by name and units.
    pub fn get(&self, name: &str, units: &str) -> SkyradResult<&T> {
        let key = format!("{name}|{units}");
        self.index
            .get(&key)
            .map(|&idx| &self.items[idx])
            .ok_or(SkyradError::MissingEntity { kind: T::KIND, key })
    }

    /// Look up an entity by handle.
    pub fn get_by_handle(&self, handle: Handle<T>) -> SkyradResult<&T> {
        self.items
            .get(handle.index)
            .ok_or_else(|| SkyradError::MissingEntity {
                kind: T::KIND,
                key: format!("handle #{}", handle.index),
            })
    }

    /// Get a handle for an entity by name and units, if present.
    pub fn handle(&self, name: &str, units: &str) -> Option<Handle<T>> {
        let key = format!("{name}|{units}");
        self.index.get(&key).map(|&idx| Handle::new(idx))
    }

    /// Whether an entity with the given name and units exists.
    pub fn exists(&self, name: &str, units: &str) -> bool {
        self.index.contains_key(&format!("{name}|{units}"))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Stored entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
