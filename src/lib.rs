//! assetgraph - Handle-based object/property graph store for editor asset data
//!
//! This crate re-exports all layers of the assetgraph system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: assetgraph_storage    — Registry, handles, hierarchy, edit sessions
//! Layer 0: assetgraph_foundation — Core types (ObjectId, PropertyValue, Error)
//! ```
//!
//! # Example
//!
//! ```
//! use assetgraph::storage::Registry;
//!
//! let registry = Registry::new();
//! let mesh = registry.create_object("rock_01", "StaticMesh");
//! mesh.get_or_create_property("LodCount")?.set(3u32)?;
//!
//! assert_eq!(mesh.property("LodCount")?.get::<u32>()?, 3);
//! assert!(!mesh.property("Missing")?.is_valid());
//! # Ok::<(), assetgraph::foundation::Error>(())
//! ```

pub use assetgraph_foundation as foundation;
pub use assetgraph_storage as storage;
