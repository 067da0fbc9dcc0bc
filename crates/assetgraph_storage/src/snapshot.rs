//! Detached copies of objects for inspection panels and exporters.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use assetgraph_foundation::{ObjectId, Property, PropertyValue, Uid};

/// A copy of one object taken under its lock.
///
/// Later edits to the object are not reflected.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectSnapshot {
    /// Id of the object.
    pub id: ObjectId,
    /// Object name.
    pub name: String,
    /// Type name given at creation.
    pub type_name: String,
    /// Parent UID, `None` for roots.
    pub parent: Option<Uid>,
    /// Children UIDs in attachment order.
    pub children: Vec<Uid>,
    /// Properties in insertion order.
    pub properties: Vec<Property>,
}

impl ObjectSnapshot {
    /// Returns the value of the named property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

impl fmt::Display for ObjectSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {:?} : {}", self.id, self.name, self.type_name)?;
        for property in &self.properties {
            writeln!(
                f,
                "  {} ({}) = {}",
                property.name,
                property.value.kind(),
                property.value
            )?;
        }
        Ok(())
    }
}
