//! This module provides the versioned Entity struct and the Species triple locating an entity
//! version in a compartment
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Kind of biological object an entity represents
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Gene,
    Metabolite,
    Protein,
    Complex,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Gene => write!(f, "gene"),
            EntityKind::Metabolite => write!(f, "metabolite"),
            EntityKind::Protein => write!(f, "protein"),
            EntityKind::Complex => write!(f, "complex"),
        }
    }
}

/// Functional property of an entity version, naming the activity it enables
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// The entity catalyses the activity with this id
    Catalyses(String),
    /// The entity transports for the activity with this id
    Transports(String),
}

/// Identity of an entity snapshot, the pair (id, version)
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub id: String,
    pub version: String,
}

impl EntityKey {
    pub fn new(id: &str, version: &str) -> Self {
        EntityKey {
            id: id.to_string(),
            version: version.to_string(),
        }
    }
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.id, self.version)
    }
}

/// An entity version located in a compartment
///
/// This triple is the node type of the reachability graph, and is also used for setup
/// conditions, substrate requirements, products and termination conditions.
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Species {
    pub entity: String,
    pub version: String,
    pub compartment: String,
}

impl Species {
    /// Create a new species
    ///
    /// # Examples
    /// ```rust
    /// use mnm_core::network::entity::Species;
    /// let glucose = Species::new("glc", "v1", "cyt");
    /// assert_eq!(glucose.to_string(), "glc:v1@cyt");
    /// ```
    pub fn new(entity: &str, version: &str, compartment: &str) -> Self {
        Species {
            entity: entity.to_string(),
            version: version.to_string(),
            compartment: compartment.to_string(),
        }
    }

    /// The (id, version) identity of the located entity
    pub fn key(&self) -> EntityKey {
        EntityKey::new(&self.entity, &self.version)
    }
}

impl Display for Species {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}@{}", self.entity, self.version, self.compartment)
    }
}

/// Immutable snapshot of a biological entity
///
/// A new version of an entity is a new `Entity` value sharing the id, existing versions are
/// never changed once added to a [`Network`](crate::network::network::Network).
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Identifier shared by every version of the entity
    #[builder(setter(into))]
    pub id: String,
    /// Version of this snapshot
    #[builder(setter(into))]
    pub version: String,
    /// What kind of object this is
    pub kind: EntityKind,
    /// Human readable name
    #[builder(default = "None")]
    #[serde(default)]
    pub name: Option<String>,
    /// Catalytic and transport properties of this version
    #[builder(default = "IndexSet::new()")]
    #[serde(default)]
    pub properties: IndexSet<Property>,
}

impl Entity {
    pub fn key(&self) -> EntityKey {
        EntityKey::new(&self.id, &self.version)
    }

    /// Whether this version catalyses the activity
    pub fn catalyses(&self, activity: &str) -> bool {
        self.properties
            .iter()
            .any(|p| matches!(p, Property::Catalyses(a) if a == activity))
    }

    /// Whether this version transports for the activity
    pub fn transports(&self, activity: &str) -> bool {
        self.properties
            .iter()
            .any(|p| matches!(p, Property::Transports(a) if a == activity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_properties() {
        let enzyme = EntityBuilder::default()
            .id("pfk")
            .version("v1")
            .kind(EntityKind::Protein)
            .properties(IndexSet::from([
                Property::Catalyses("R1".to_string()),
                Property::Transports("T1".to_string()),
            ]))
            .build()
            .unwrap();
        assert!(enzyme.catalyses("R1"));
        assert!(!enzyme.catalyses("T1"));
        assert!(enzyme.transports("T1"));
        assert!(!enzyme.transports("R1"));
        assert_eq!(enzyme.key(), EntityKey::new("pfk", "v1"));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", EntityKey::new("g1", "v2")), "g1:v2");
        assert_eq!(format!("{}", Species::new("m", "v1", "ext")), "m:v1@ext");
        assert_eq!(format!("{}", EntityKind::Metabolite), "metabolite");
    }
}
