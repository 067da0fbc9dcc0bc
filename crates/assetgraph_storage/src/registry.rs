//! The registry: append-only object store and UID allocator.
//!
//! Objects are created once and never removed or relocated. Creation is
//! serialized by a store-level lock; reads resolve ids through the arena
//! without taking any store-level lock at all.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error};

use assetgraph_foundation::{
    Error, NULL_UID, ObjectId, PropertyValue, RegistryConfig, Result, Uid,
};

use crate::arena::SlotArena;
use crate::handle::ObjectHandle;
use crate::hierarchy::Hierarchy;
use crate::record::ObjectRecord;
use crate::session::EditSession;

/// Source of registry generation stamps. Zero is reserved for null ids.
static NEXT_GENERATION: AtomicU32 = AtomicU32::new(1);

static GLOBAL: Lazy<Registry> =
    Lazy::new(|| Registry::with_config(RegistryConfig::default().with_label("global")));

/// Process-wide store of objects and their properties.
///
/// All access goes through [`ObjectHandle`] and
/// [`PropertyHandle`](crate::PropertyHandle), which borrow the registry and
/// therefore cannot outlive it.
pub struct Registry {
    /// Stamp carried by every id this registry issues.
    generation: u32,
    config: RegistryConfig,
    /// Store-level lock. Holds the next UID to allocate.
    next_uid: Mutex<Uid>,
    objects: SlotArena<ObjectRecord>,
    hierarchy: RwLock<Hierarchy>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("label", &self.config.label)
            .field("generation", &self.generation)
            .field("objects", &self.len())
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with the given configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            config,
            next_uid: Mutex::new(0),
            objects: SlotArena::new(),
            hierarchy: RwLock::new(Hierarchy::new()),
        }
    }

    /// Returns the process-wide registry shared by importers, tools and UI.
    #[must_use]
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the stamp carried by ids issued by this registry.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Creates a new object and returns a handle to it.
    ///
    /// UIDs are allocated from a monotonic counter starting at 0.
    ///
    /// # Panics
    ///
    /// Panics if the UID space is exhausted or a UID is handed out twice.
    /// Both mean the store is corrupt and cannot be recovered.
    pub fn create_object(&self, name: &str, type_name: &str) -> ObjectHandle<'_> {
        let mut next_uid = self.next_uid.lock();
        let uid = *next_uid;
        assert!(uid != NULL_UID, "uid allocator exhausted");

        let record = ObjectRecord::new(uid, self.generation, name, type_name);
        if self.objects.insert(uid, record).is_err() {
            error!(registry = %self.config.label, uid, "uid collision");
            panic!("uid collision: uid {uid} is already allocated");
        }
        *next_uid = uid + 1;
        drop(next_uid);

        if self.config.log_creations {
            debug!(registry = %self.config.label, uid, name, type_name, "created object");
        }
        ObjectHandle::new(self, ObjectId::new(uid, self.generation))
    }

    /// Returns true if an object with this UID exists.
    #[must_use]
    pub fn object_exists(&self, uid: Uid) -> bool {
        self.objects.contains(uid)
    }

    /// Returns a handle to the object with this UID, or an invalid handle.
    #[must_use]
    pub fn object(&self, uid: Uid) -> ObjectHandle<'_> {
        if self.object_exists(uid) {
            ObjectHandle::new(self, ObjectId::new(uid, self.generation))
        } else {
            ObjectHandle::null()
        }
    }

    /// Returns a handle for an id, or an invalid handle if the id does not
    /// name an object of this registry.
    #[must_use]
    pub fn handle(&self, id: ObjectId) -> ObjectHandle<'_> {
        match self.resolve(id) {
            Ok(record) => ObjectHandle::new(self, record.id()),
            Err(_) => ObjectHandle::null(),
        }
    }

    /// Number of objects created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.objects.len()).unwrap_or(usize::MAX)
    }

    /// Returns true if no object has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates handles to every object in UID order.
    ///
    /// Objects created during iteration may or may not be observed.
    pub fn objects(&self) -> impl Iterator<Item = ObjectHandle<'_>> + '_ {
        self.objects
            .iter()
            .map(move |(_, record)| ObjectHandle::new(self, record.id()))
    }

    /// Resolves an id to its record.
    pub(crate) fn resolve(&self, id: ObjectId) -> Result<&ObjectRecord> {
        if id.is_null() || id.generation != self.generation {
            return Err(Error::invalid_handle(id));
        }
        self.objects
            .get(id.uid)
            .ok_or_else(|| Error::invalid_handle(id))
    }

    /// Checks that every object referenced by `value` lives in this registry.
    pub(crate) fn validate(&self, value: &PropertyValue) -> Result<()> {
        if let PropertyValue::ObjectList(ids) = value {
            for &id in ids {
                self.resolve(id)?;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Hierarchy
    // -------------------------------------------------------------------------

    /// Attaches `child` under `parent`, or detaches it when `parent` is `None`.
    ///
    /// Both sides of the relation are updated together.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if either handle does not resolve in this
    /// registry, or `HierarchyCycle` if the edge would create a cycle.
    pub fn set_parent(
        &self,
        child: &ObjectHandle<'_>,
        parent: Option<&ObjectHandle<'_>>,
    ) -> Result<()> {
        let child_uid = self.resolve(child.id())?.uid();
        let parent_uid = parent
            .map(|p| self.resolve(p.id()).map(ObjectRecord::uid))
            .transpose()?;

        let previous = self.hierarchy.write().set_parent(child_uid, parent_uid)?;
        debug!(
            registry = %self.config.label,
            child = child_uid,
            parent = ?parent_uid,
            previous = ?previous,
            "set parent"
        );
        Ok(())
    }

    /// Returns the parent UID of an object, or `None` for roots.
    #[must_use]
    pub fn parent_of(&self, uid: Uid) -> Option<Uid> {
        self.hierarchy.read().parent(uid)
    }

    /// Returns the children UIDs of an object in attachment order.
    #[must_use]
    pub fn children_of(&self, uid: Uid) -> Vec<Uid> {
        self.hierarchy.read().children(uid).to_vec()
    }

    // -------------------------------------------------------------------------
    // Edit sessions
    // -------------------------------------------------------------------------

    /// Opens edit sessions on two objects at once.
    ///
    /// Locks are always acquired in ascending UID order, so two threads
    /// editing the same pair can never deadlock. Sessions are returned in
    /// argument order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if either handle does not resolve, or
    /// `AliasedEdit` if both refer to the same object.
    pub fn edit_pair<'r>(
        &'r self,
        a: &ObjectHandle<'r>,
        b: &ObjectHandle<'r>,
    ) -> Result<(EditSession<'r>, EditSession<'r>)> {
        let ra = self.resolve(a.id())?;
        let rb = self.resolve(b.id())?;
        if ra.uid() == rb.uid() {
            return Err(Error::aliased_edit(ra.uid()).with_context(ra.context()));
        }

        if ra.uid() < rb.uid() {
            let sa = EditSession::new(ObjectHandle::new(self, ra.id()), ra);
            let sb = EditSession::new(ObjectHandle::new(self, rb.id()), rb);
            Ok((sa, sb))
        } else {
            let sb = EditSession::new(ObjectHandle::new(self, rb.id()), rb);
            let sa = EditSession::new(ObjectHandle::new(self, ra.id()), ra);
            Ok((sa, sb))
        }
    }
}
