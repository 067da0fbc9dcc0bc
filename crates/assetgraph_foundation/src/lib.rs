//! Object identifiers, property values, errors, and configuration for assetgraph.
//!
//! This crate provides:
//! - [`ObjectId`] - Generation-stamped object identifiers
//! - [`PropertyValue`] - The tagged union stored in every property
//! - [`ValueKind`] - Kind descriptors checked on every access
//! - [`Error`] - Rich error types with context
//! - [`RegistryConfig`] - Registry construction options

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod id;
pub mod kind;
pub mod value;

pub use config::RegistryConfig;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use id::{NULL_UID, ObjectId, Uid};
pub use kind::ValueKind;
pub use value::{ExternalPtr, Property, PropertyType, PropertyValue};
