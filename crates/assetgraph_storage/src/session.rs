//! Scoped edit sessions for multi-property edits.
//!
//! A session holds the object lock from creation until drop, so a batch of
//! reads and writes appears atomic to every other thread. The lock is
//! released on every exit path, including early returns and `?`.

use parking_lot::MutexGuard;

use assetgraph_foundation::{Error, ObjectId, PropertyType, PropertyValue, Result, ValueKind};

use crate::handle::{ObjectHandle, PropertyHandle};
use crate::record::{ObjectRecord, ObjectState};

/// Exclusive access to one object's properties.
#[derive(Debug)]
pub struct EditSession<'r> {
    owner: ObjectHandle<'r>,
    record: &'r ObjectRecord,
    state: MutexGuard<'r, ObjectState>,
}

impl<'r> EditSession<'r> {
    pub(crate) fn new(owner: ObjectHandle<'r>, record: &'r ObjectRecord) -> Self {
        Self {
            owner,
            record,
            state: record.lock(),
        }
    }

    /// Returns the object being edited.
    #[must_use]
    pub fn object(&self) -> ObjectHandle<'r> {
        self.owner
    }

    /// Number of properties on the object.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns true if the object has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.len() == 0
    }

    /// Returns true if a property with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.state.find(name).is_some()
    }

    /// Property names in insertion order.
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        self.state
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Returns a handle to the named property, or an invalid handle.
    ///
    /// The handle must not be used until this session is dropped.
    #[must_use]
    pub fn property(&self, name: &str) -> PropertyHandle<'r> {
        self.state
            .find(name)
            .map_or_else(PropertyHandle::null, |index| {
                PropertyHandle::new(self.owner, self.record, index)
            })
    }

    /// Returns a handle to the named property, appending it if absent.
    ///
    /// The handle must not be used until this session is dropped.
    pub fn get_or_create_property(&mut self, name: &str) -> PropertyHandle<'r> {
        let index = self.index_or_push(name);
        PropertyHandle::new(self.owner, self.record, index)
    }

    fn index_or_push(&mut self, name: &str) -> usize {
        let (index, created) = self.state.find_or_push(name);
        if created {
            self.owner.after_property_created(self.record, name, index);
        }
        index
    }

    /// Borrows the stored value of a property.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.state
            .find(name)
            .map(|index| &self.state.properties[index].value)
    }

    /// Reads a property as `T`. A missing property reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the property holds another kind.
    pub fn get<T: PropertyType>(&self, name: &str) -> Result<Option<T>> {
        let Some(value) = self.value(name) else {
            return Ok(None);
        };
        T::from_value(value)
            .map(Some)
            .ok_or_else(|| self.mismatch(name, T::KIND, value.kind()))
    }

    /// Writes a property, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if an object list names an object outside
    /// this registry. Nothing is created in that case.
    pub fn set<T: PropertyType>(&mut self, name: &str, value: T) -> Result<PropertyHandle<'r>> {
        self.set_value(name, value.into_value())
    }

    /// Writes a raw value, creating the property if absent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if an object list names an object outside
    /// this registry. Nothing is created in that case.
    pub fn set_value(&mut self, name: &str, value: PropertyValue) -> Result<PropertyHandle<'r>> {
        self.owner.registry()?.validate(&value)?;
        let index = self.index_or_push(name);
        self.state.properties[index].value = value;
        Ok(PropertyHandle::new(self.owner, self.record, index))
    }

    /// Reads an object list. A missing or never-written property reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the property holds a non-list kind.
    pub fn object_list(&self, name: &str) -> Result<Vec<ObjectHandle<'r>>> {
        let ids = match self.value(name) {
            None | Some(PropertyValue::Empty) => Vec::new(),
            Some(PropertyValue::ObjectList(ids)) => ids.clone(),
            Some(other) => return Err(self.mismatch(name, ValueKind::ObjectList, other.kind())),
        };
        let registry = self.owner.registry()?;
        Ok(ids.into_iter().map(|id| registry.handle(id)).collect())
    }

    /// Appends an object to a list property, creating the list if needed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if `object` does not resolve in this
    /// registry, or `TypeMismatch` if the property holds a non-list kind.
    pub fn push_object(&mut self, name: &str, object: &ObjectHandle<'_>) -> Result<()> {
        let id = self.owner.registry()?.resolve(object.id())?.id();
        let list = self.list_mut(name)?;
        list.push(id);
        Ok(())
    }

    /// Removes every occurrence of an object from a list property.
    ///
    /// Returns true if anything was removed. A missing or never-written
    /// property is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the property holds a non-list kind.
    pub fn remove_object(&mut self, name: &str, object: &ObjectHandle<'_>) -> Result<bool> {
        if matches!(self.value(name), None | Some(PropertyValue::Empty)) {
            return Ok(false);
        }
        let id = object.id();
        let list = self.list_mut(name)?;
        let before = list.len();
        list.retain(|&entry| entry != id);
        Ok(list.len() != before)
    }

    fn list_mut(&mut self, name: &str) -> Result<&mut Vec<ObjectId>> {
        let index = self.index_or_push(name);
        let kind = self.state.properties[index].value.kind();
        match kind {
            ValueKind::ObjectList => {}
            ValueKind::Empty => {
                self.state.properties[index].value = PropertyValue::ObjectList(Vec::new());
            }
            other => return Err(self.mismatch(name, ValueKind::ObjectList, other)),
        }
        self.state.properties[index]
            .value
            .as_object_list_mut()
            .ok_or_else(|| Error::type_mismatch(ValueKind::ObjectList, kind))
    }

    fn mismatch(&self, name: &str, expected: ValueKind, actual: ValueKind) -> Error {
        Error::type_mismatch(expected, actual)
            .with_context(self.record.context().with_property(name))
    }
}
