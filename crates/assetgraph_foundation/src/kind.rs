//! Kind descriptors for property values.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The active branch of a [`PropertyValue`](crate::PropertyValue).
///
/// Every typed access compares the requested kind against the stored one.
/// A property may change kind across writes; the store keeps no declared
/// kind per property name.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueKind {
    /// Freshly created property that has never been written.
    Empty,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 64-bit integer.
    U64,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 8-bit integer.
    U8,
    /// 32-bit floating point.
    F32,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
    /// Opaque pointer owned by an external collaborator.
    ExternalPtr,
    /// Ordered list of object references.
    ObjectList,
}

impl ValueKind {
    /// All kinds, in declaration order.
    pub const ALL: [ValueKind; 11] = [
        Self::Empty,
        Self::I32,
        Self::U64,
        Self::U32,
        Self::U16,
        Self::U8,
        Self::F32,
        Self::Bool,
        Self::String,
        Self::ExternalPtr,
        Self::ObjectList,
    ];

    /// Returns the lowercase name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::U32 => "u32",
            Self::U16 => "u16",
            Self::U8 => "u8",
            Self::F32 => "f32",
            Self::Bool => "bool",
            Self::String => "string",
            Self::ExternalPtr => "external-ptr",
            Self::ObjectList => "object-list",
        }
    }

    /// Returns true for the integer kinds.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I32 | Self::U64 | Self::U32 | Self::U16 | Self::U8
        )
    }

    /// Returns true if this kind holds references to other objects.
    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(self, Self::ObjectList)
    }
}

impl fmt::Debug for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
