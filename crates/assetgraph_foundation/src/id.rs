//! Object identifiers stamped with the generation of the registry that issued them.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Process-wide unique identifier assigned to an object at creation.
pub type Uid = u64;

/// Reserved UID meaning "absent/invalid". Never allocated.
pub const NULL_UID: Uid = u64::MAX;

/// Object identifier with a generation stamp for stale reference detection.
///
/// The `uid` doubles as the slot index in the registry arena, since objects
/// are never removed. The `generation` is the stamp of the registry that
/// issued the id; resolving an id against any other registry fails instead
/// of silently aliasing an unrelated object that happens to share the slot.
///
/// # Layout
/// - `uid`: 64-bit UID, also the arena slot index
/// - `generation`: 32-bit registry stamp
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectId {
    /// UID of the object and index into the arena.
    pub uid: Uid,
    /// Generation stamp of the issuing registry.
    pub generation: u32,
}

impl ObjectId {
    /// Creates a new object ID with the given UID and generation.
    #[must_use]
    pub const fn new(uid: Uid, generation: u32) -> Self {
        Self { uid, generation }
    }

    /// Returns a sentinel value representing "no object".
    ///
    /// This uses [`NULL_UID`], which is never allocated.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            uid: NULL_UID,
            generation: 0,
        }
    }

    /// Returns true if this is the null sentinel value.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.uid == NULL_UID
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "ObjectId(null)")
        } else {
            write!(f, "ObjectId({}g{})", self.uid, self.generation)
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Object(null)")
        } else {
            write!(f, "Object({})", self.uid)
        }
    }
}
