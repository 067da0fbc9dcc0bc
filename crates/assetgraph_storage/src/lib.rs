//! Append-only object registry, handles, hierarchy, and edit sessions for assetgraph.
//!
//! This crate provides:
//! - [`Registry`] - The append-only object store and UID allocator
//! - [`ObjectHandle`] / [`PropertyHandle`] - Non-owning references into the store
//! - [`EditSession`] - Scoped lock for multi-property edits
//! - [`Hierarchy`] - Parent/child index with a single source of truth
//! - [`SlotArena`] - Lock-free reads over stable, never-relocated slots

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod handle;
pub mod hierarchy;
pub mod record;
pub mod registry;
pub mod session;
pub mod snapshot;

pub use arena::SlotArena;
pub use handle::{ObjectHandle, PropertyHandle};
pub use hierarchy::Hierarchy;
pub use record::ObjectRecord;
pub use registry::Registry;
pub use session::EditSession;
pub use snapshot::ObjectSnapshot;
