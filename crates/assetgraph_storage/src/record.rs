//! Object records: identity plus a lock-guarded, append-only property list.

use parking_lot::{Mutex, MutexGuard};

use assetgraph_foundation::{ErrorContext, ObjectId, Property, Uid};

/// One object stored in the registry.
///
/// Identity fields are immutable after creation. The property list sits
/// behind the record's own lock; no lock is shared between records.
#[derive(Debug)]
pub struct ObjectRecord {
    uid: Uid,
    generation: u32,
    name: String,
    type_name: String,
    state: Mutex<ObjectState>,
}

/// Lock-guarded part of a record.
#[derive(Debug, Default)]
pub struct ObjectState {
    /// Properties in insertion order. Only ever appended to.
    pub(crate) properties: Vec<Property>,
}

impl ObjectRecord {
    pub(crate) fn new(uid: Uid, generation: u32, name: &str, type_name: &str) -> Self {
        Self {
            uid,
            generation,
            name: name.to_string(),
            type_name: type_name.to_string(),
            state: Mutex::new(ObjectState::default()),
        }
    }

    /// Returns the UID.
    #[must_use]
    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Returns the id handles use to address this record.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        ObjectId::new(self.uid, self.generation)
    }

    /// Returns the object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type name given at creation.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Acquires the record lock.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ObjectState> {
        self.state.lock()
    }

    /// Error context naming this object.
    pub(crate) fn context(&self) -> ErrorContext {
        ErrorContext::new().with_object(&self.name, self.uid)
    }
}

impl ObjectState {
    /// Index of the property with this name.
    pub(crate) fn find(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    /// Index of the property with this name, appending an empty one if absent.
    ///
    /// Returns the index and whether a property was appended.
    pub(crate) fn find_or_push(&mut self, name: &str) -> (usize, bool) {
        if let Some(index) = self.find(name) {
            return (index, false);
        }
        self.properties.push(Property::new(name));
        (self.properties.len() - 1, true)
    }

    /// Number of properties.
    pub(crate) fn len(&self) -> usize {
        self.properties.len()
    }
}
