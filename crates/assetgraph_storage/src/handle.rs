//! Non-owning handles to objects and their properties.
//!
//! Handles are `Copy`, borrow the registry, and carry no lifetime
//! responsibility. Validity is decided at construction and never changes,
//! because records are never removed.

use std::fmt;

use tracing::{trace, warn};

use assetgraph_foundation::{
    Error, NULL_UID, ObjectId, PropertyType, PropertyValue, Result, Uid, ValueKind,
};

use crate::record::ObjectRecord;
use crate::registry::Registry;
use crate::session::EditSession;
use crate::snapshot::ObjectSnapshot;

// =============================================================================
// ObjectHandle
// =============================================================================

/// Handle to one object in a [`Registry`].
#[derive(Clone, Copy)]
pub struct ObjectHandle<'r> {
    registry: Option<&'r Registry>,
    id: ObjectId,
}

impl<'r> ObjectHandle<'r> {
    /// `id` must already resolve in `registry`.
    pub(crate) fn new(registry: &'r Registry, id: ObjectId) -> Self {
        Self {
            registry: Some(registry),
            id,
        }
    }

    /// Returns a handle that refers to nothing.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            registry: None,
            id: ObjectId::null(),
        }
    }

    fn record(&self) -> Result<&'r ObjectRecord> {
        self.registry
            .ok_or_else(|| Error::invalid_handle(self.id))?
            .resolve(self.id)
    }

    pub(crate) fn registry(&self) -> Result<&'r Registry> {
        self.registry.ok_or_else(|| Error::invalid_handle(self.id))
    }

    /// Returns true if this handle refers to an object.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.record().is_ok()
    }

    /// Returns the id of the referenced object.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the UID, or [`NULL_UID`] for an invalid handle.
    #[must_use]
    pub fn uid(&self) -> Uid {
        self.record().map_or(NULL_UID, ObjectRecord::uid)
    }

    /// Returns the object name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this handle is invalid.
    pub fn name(&self) -> Result<&'r str> {
        Ok(self.record()?.name())
    }

    /// Returns the type name given at creation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this handle is invalid.
    pub fn type_name(&self) -> Result<&'r str> {
        Ok(self.record()?.type_name())
    }

    /// Looks up a property by name. Never creates.
    ///
    /// A missing property is not an error: the returned handle is invalid.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this object handle is invalid.
    pub fn property(&self, name: &str) -> Result<PropertyHandle<'r>> {
        let record = self.record()?;
        let index = record.lock().find(name);
        Ok(index.map_or_else(PropertyHandle::null, |index| {
            PropertyHandle::new(*self, record, index)
        }))
    }

    /// Looks up a property by name, appending an empty one if absent.
    ///
    /// Search and append happen under one acquisition of the object lock, so
    /// concurrent callers asking for the same new name all resolve to a
    /// single property.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this object handle is invalid.
    pub fn get_or_create_property(&self, name: &str) -> Result<PropertyHandle<'r>> {
        let record = self.record()?;
        let (index, created) = record.lock().find_or_push(name);
        if created {
            self.after_property_created(record, name, index);
        }
        Ok(PropertyHandle::new(*self, record, index))
    }

    pub(crate) fn after_property_created(&self, record: &ObjectRecord, name: &str, index: usize) {
        trace!(uid = record.uid(), property = name, index, "created property");
        if let Some(registry) = self.registry {
            let threshold = registry.config().property_warn_threshold;
            if index == threshold {
                warn!(
                    registry = %registry.config().label,
                    uid = record.uid(),
                    object = record.name(),
                    threshold,
                    "object property count passed threshold; lookups are linear"
                );
            }
        }
    }

    /// Returns handles to all properties present at call time.
    ///
    /// The snapshot is taken under the object lock and does not observe
    /// properties added afterwards.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this object handle is invalid.
    pub fn properties(&self) -> Result<Vec<PropertyHandle<'r>>> {
        let record = self.record()?;
        let count = record.lock().len();
        Ok((0..count)
            .map(|index| PropertyHandle::new(*self, record, index))
            .collect())
    }

    /// Opens a scoped edit session holding the object lock until dropped.
    ///
    /// Property handles of the same object must not be used while the
    /// session is alive; the lock is not reentrant.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this object handle is invalid.
    pub fn edit(&self) -> Result<EditSession<'r>> {
        let record = self.record()?;
        Ok(EditSession::new(*self, record))
    }

    /// Returns the parent, or an invalid handle for roots.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this object handle is invalid.
    pub fn parent(&self) -> Result<ObjectHandle<'r>> {
        let record = self.record()?;
        let registry = self.registry()?;
        Ok(registry
            .parent_of(record.uid())
            .map_or_else(ObjectHandle::null, |uid| registry.object(uid)))
    }

    /// Returns the children in attachment order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this object handle is invalid.
    pub fn children(&self) -> Result<Vec<ObjectHandle<'r>>> {
        let record = self.record()?;
        let registry = self.registry()?;
        Ok(registry
            .children_of(record.uid())
            .into_iter()
            .map(|uid| registry.object(uid))
            .collect())
    }

    /// Attaches this object under `parent`, or detaches it with `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if either handle is invalid, or
    /// `HierarchyCycle` if `parent` is this object or one of its descendants.
    pub fn set_parent(&self, parent: Option<&ObjectHandle<'_>>) -> Result<()> {
        self.registry()?.set_parent(self, parent)
    }

    /// Copies the object's identity, links and properties.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this object handle is invalid.
    pub fn snapshot(&self) -> Result<ObjectSnapshot> {
        let record = self.record()?;
        let registry = self.registry()?;
        let parent = registry.parent_of(record.uid());
        let children = registry.children_of(record.uid());
        let properties = record.lock().properties.clone();
        Ok(ObjectSnapshot {
            id: record.id(),
            name: record.name().to_string(),
            type_name: record.type_name().to_string(),
            parent,
            children,
            properties,
        })
    }
}

impl Default for ObjectHandle<'_> {
    fn default() -> Self {
        Self::null()
    }
}

impl PartialEq for ObjectHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        let same_registry = match (self.registry, other.registry) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_registry && self.id == other.id
    }
}

impl Eq for ObjectHandle<'_> {}

impl fmt::Debug for ObjectHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record() {
            Ok(record) => write!(f, "ObjectHandle({} {:?})", record.uid(), record.name()),
            Err(_) => write!(f, "ObjectHandle(invalid)"),
        }
    }
}

// =============================================================================
// PropertyHandle
// =============================================================================

/// Handle to one property of one object.
///
/// Every typed access takes the object lock for exactly one operation.
#[derive(Clone, Copy)]
pub struct PropertyHandle<'r> {
    owner: ObjectHandle<'r>,
    record: Option<&'r ObjectRecord>,
    index: usize,
}

impl<'r> PropertyHandle<'r> {
    pub(crate) fn new(owner: ObjectHandle<'r>, record: &'r ObjectRecord, index: usize) -> Self {
        Self {
            owner,
            record: Some(record),
            index,
        }
    }

    /// Returns a handle that refers to nothing.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            owner: ObjectHandle::null(),
            record: None,
            index: usize::MAX,
        }
    }

    /// Returns true if this handle refers to a property.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.record.is_some()
    }

    /// Returns the object owning this property.
    #[must_use]
    pub fn object(&self) -> ObjectHandle<'r> {
        self.owner
    }

    /// Returns the position of this property within its object.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    fn record(&self) -> Result<&'r ObjectRecord> {
        self.record
            .ok_or_else(|| Error::invalid_handle(self.owner.id()))
    }

    /// Runs `f` on the property under the object lock.
    fn with_value<T>(
        &self,
        f: impl FnOnce(&str, &mut PropertyValue) -> Result<T>,
    ) -> Result<T> {
        let record = self.record()?;
        let mut state = record.lock();
        let property = &mut state.properties[self.index];
        f(&property.name, &mut property.value).map_err(|err| {
            err.with_context(record.context().with_property(&property.name))
        })
    }

    /// Returns the property name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this handle is invalid.
    pub fn name(&self) -> Result<String> {
        self.with_value(|name, _| Ok(name.to_string()))
    }

    /// Returns the kind currently stored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this handle is invalid.
    pub fn kind(&self) -> Result<ValueKind> {
        self.with_value(|_, value| Ok(value.kind()))
    }

    /// Returns a copy of the stored value, whatever its kind.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this handle is invalid.
    pub fn value(&self) -> Result<PropertyValue> {
        self.with_value(|_, value| Ok(value.clone()))
    }

    /// Replaces the stored value, whatever its kind.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this handle is invalid or an object list
    /// names an object outside the owning registry.
    pub fn set_value(&self, new_value: PropertyValue) -> Result<()> {
        self.record()?;
        self.owner.registry()?.validate(&new_value)?;
        self.with_value(|_, value| {
            *value = new_value;
            Ok(())
        })
    }

    /// Reads the value as `T`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this handle is invalid, or `TypeMismatch`
    /// if the stored kind is not `T`'s kind.
    pub fn get<T: PropertyType>(&self) -> Result<T> {
        self.with_value(|_, value| {
            T::from_value(value).ok_or_else(|| Error::type_mismatch(T::KIND, value.kind()))
        })
    }

    /// Writes `value`, switching the active kind if necessary.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this handle is invalid or an object list
    /// names an object outside the owning registry.
    pub fn set<T: PropertyType>(&self, new_value: T) -> Result<()> {
        self.set_value(new_value.into_value())
    }

    /// Reads an object list as handles into the owning registry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this handle is invalid, or `TypeMismatch`
    /// if the property does not hold an object list.
    pub fn object_list(&self) -> Result<Vec<ObjectHandle<'r>>> {
        let ids = self.get::<Vec<ObjectId>>()?;
        let registry = self.owner.registry()?;
        Ok(ids.into_iter().map(|id| registry.handle(id)).collect())
    }

    /// Replaces the whole object list.
    ///
    /// Appending to an existing list must go through an
    /// [`EditSession`] so the read-modify-write is atomic.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if this handle is invalid or any listed handle
    /// does not resolve in the owning registry.
    pub fn set_object_list(&self, list: &[ObjectHandle<'_>]) -> Result<()> {
        self.set(list.iter().map(ObjectHandle::id).collect::<Vec<_>>())
    }
}

impl Default for PropertyHandle<'_> {
    fn default() -> Self {
        Self::null()
    }
}

impl PartialEq for PropertyHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        let same_record = match (self.record, other.record) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_record && self.index == other.index
    }
}

impl Eq for PropertyHandle<'_> {}

impl fmt::Debug for PropertyHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(record) => write!(f, "PropertyHandle({}#{})", record.uid(), self.index),
            None => write!(f, "PropertyHandle(invalid)"),
        }
    }
}
