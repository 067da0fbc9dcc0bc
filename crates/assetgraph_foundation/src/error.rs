//! Error types for the assetgraph registry.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::id::{ObjectId, Uid};
use crate::kind::ValueKind;

/// Result alias used throughout assetgraph.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for registry operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid handle error.
    #[must_use]
    pub fn invalid_handle(id: ObjectId) -> Self {
        Self::new(ErrorKind::InvalidHandle(id))
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: ValueKind, actual: ValueKind) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates an unknown object error.
    #[must_use]
    pub fn unknown_object(uid: Uid) -> Self {
        Self::new(ErrorKind::UnknownObject(uid))
    }

    /// Creates a hierarchy cycle error.
    #[must_use]
    pub fn hierarchy_cycle(child: Uid, parent: Uid) -> Self {
        Self::new(ErrorKind::HierarchyCycle { child, parent })
    }

    /// Creates an aliased edit error.
    #[must_use]
    pub fn aliased_edit(uid: Uid) -> Self {
        Self::new(ErrorKind::AliasedEdit(uid))
    }

    /// Returns true if this is an invalid handle error.
    #[must_use]
    pub const fn is_invalid_handle(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidHandle(_))
    }

    /// Returns true if this is a type mismatch error.
    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::TypeMismatch { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Operation attempted through a null handle or one issued by another registry.
    #[error("invalid handle: {0:?}")]
    InvalidHandle(ObjectId),

    /// Typed access against a property holding a different kind.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The kind requested by the caller.
        expected: ValueKind,
        /// The kind currently stored.
        actual: ValueKind,
    },

    /// No object with this UID exists in the registry.
    #[error("unknown object: uid {0}")]
    UnknownObject(Uid),

    /// Parenting would make an object its own ancestor.
    #[error("hierarchy cycle: cannot parent {child} under {parent}")]
    HierarchyCycle {
        /// The object being re-parented.
        child: Uid,
        /// The requested parent.
        parent: Uid,
    },

    /// Two edit sessions were requested for the same object at once.
    #[error("aliased edit: object uid {0} is already being edited")]
    AliasedEdit(Uid),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Name of the object being accessed.
    pub object: Option<String>,
    /// UID of the object being accessed.
    pub uid: Option<Uid>,
    /// Name of the property being accessed.
    pub property: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the object name and UID.
    #[must_use]
    pub fn with_object(mut self, name: impl Into<String>, uid: Uid) -> Self {
        self.object = Some(name.into());
        self.uid = Some(uid);
        self
    }

    /// Sets the property name.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.property = Some(name.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.object, self.uid) {
            (Some(name), Some(uid)) => write!(f, "in object {name:?} (uid {uid})")?,
            (Some(name), None) => write!(f, "in object {name:?}")?,
            (None, Some(uid)) => write!(f, "in object uid {uid}")?,
            (None, None) => {}
        }
        if let Some(property) = &self.property {
            if self.object.is_some() || self.uid.is_some() {
                write!(f, ", ")?;
            }
            write!(f, "property {property:?}")?;
        }
        Ok(())
    }
}
