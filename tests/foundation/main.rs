//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: ObjectId, PropertyValue, ValueKind, Error, and RegistryConfig.
