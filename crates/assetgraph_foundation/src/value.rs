//! Property values: a tagged union checked on every access.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::id::ObjectId;
use crate::kind::ValueKind;

/// Opaque pointer owned by an external collaborator (a decoder buffer, a GPU
/// resource, ...). The store never dereferences it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExternalPtr(pub usize);

impl ExternalPtr {
    /// The null pointer token.
    pub const NULL: Self = Self(0);

    /// Captures the address of a pointer. The pointee is not tracked.
    #[must_use]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }

    /// Returns true if this is the null token.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Value stored in a property.
///
/// Holds exactly one kind at a time. Writing a value of another kind simply
/// switches the active branch.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropertyValue {
    /// Never written.
    #[default]
    Empty,
    /// Signed 32-bit integer.
    I32(i32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Unsigned 8-bit integer.
    U8(u8),
    /// 32-bit floating point.
    F32(f32),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    String(String),
    /// Opaque external pointer.
    ExternalPtr(ExternalPtr),
    /// Ordered list of object references.
    ObjectList(Vec<ObjectId>),
}

impl PropertyValue {
    /// Returns the active kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Empty => ValueKind::Empty,
            Self::I32(_) => ValueKind::I32,
            Self::U64(_) => ValueKind::U64,
            Self::U32(_) => ValueKind::U32,
            Self::U16(_) => ValueKind::U16,
            Self::U8(_) => ValueKind::U8,
            Self::F32(_) => ValueKind::F32,
            Self::Bool(_) => ValueKind::Bool,
            Self::String(_) => ValueKind::String,
            Self::ExternalPtr(_) => ValueKind::ExternalPtr,
            Self::ObjectList(_) => ValueKind::ObjectList,
        }
    }

    /// Returns true if this value has never been written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract the object list.
    #[must_use]
    pub fn as_object_list(&self) -> Option<&[ObjectId]> {
        match self {
            Self::ObjectList(list) => Some(list),
            _ => None,
        }
    }

    /// Returns a mutable reference to the object list, if that is the active kind.
    pub fn as_object_list_mut(&mut self) -> Option<&mut Vec<ObjectId>> {
        match self {
            Self::ObjectList(list) => Some(list),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "<empty>"),
            Self::I32(n) => write!(f, "{n}"),
            Self::U64(n) => write!(f, "{n}"),
            Self::U32(n) => write!(f, "{n}"),
            Self::U16(n) => write!(f, "{n}"),
            Self::U8(n) => write!(f, "{n}"),
            Self::F32(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::ExternalPtr(p) => write!(f, "{:#x}", p.0),
            Self::ObjectList(list) => {
                write!(f, "[")?;
                for (i, id) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{id}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A named value cell owned by an object record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Property {
    /// Property name. Unique within its object.
    pub name: String,
    /// Current value.
    pub value: PropertyValue,
}

impl Property {
    /// Creates an empty property with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: PropertyValue::Empty,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Rust types that can be stored in a property.
///
/// Implemented for exactly the kinds of [`PropertyValue`]; sealed so the
/// set cannot grow outside this crate.
pub trait PropertyType: Sized + sealed::Sealed {
    /// The kind this type is stored as.
    const KIND: ValueKind;

    /// Extracts a copy of the value if `value` holds this kind.
    fn from_value(value: &PropertyValue) -> Option<Self>;

    /// Wraps this value in the matching branch.
    fn into_value(self) -> PropertyValue;
}

macro_rules! impl_property_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl PropertyType for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn from_value(value: &PropertyValue) -> Option<Self> {
                    match value {
                        PropertyValue::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }

                fn into_value(self) -> PropertyValue {
                    PropertyValue::$variant(self)
                }
            }

            impl From<$ty> for PropertyValue {
                fn from(value: $ty) -> Self {
                    value.into_value()
                }
            }
        )*
    };
}

impl_property_type! {
    i32 => I32,
    u64 => U64,
    u32 => U32,
    u16 => U16,
    u8 => U8,
    f32 => F32,
    bool => Bool,
    String => String,
    ExternalPtr => ExternalPtr,
    Vec<ObjectId> => ObjectList,
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
