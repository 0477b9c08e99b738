//! This module provides the Network struct, the registry of everything candidate models can
//! refer to
use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use log::debug;
use thiserror::Error;

use crate::network::activity::Activity;
use crate::network::compartment::{Compartment, Connectivity};
use crate::network::entity::{Entity, EntityKey, EntityKind, Property, Species};
use crate::network::intervention::ModelItem;

/// Registry of compartments, entity versions and activities
///
/// The network is read-only while models are evaluated, so it can be shared between worker
/// threads. The connectivity closure is computed the first time it is needed and dropped
/// whenever compartments or connections change.
#[derive(Clone, Debug, Default)]
pub struct Network {
    /// Map of compartment ids to compartments
    pub(crate) compartments: IndexMap<String, Compartment>,
    /// Declared (undirected) connections between compartments
    pub(crate) connections: IndexSet<(String, String)>,
    /// Map of (id, version) to entity snapshots
    pub(crate) entities: IndexMap<EntityKey, Entity>,
    /// Map of activity ids to activities
    pub(crate) activities: IndexMap<String, Activity>,
    closure: OnceLock<Connectivity>,
}

impl Network {
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Add a compartment to the network
    pub fn add_compartment(&mut self, compartment: Compartment) {
        self.compartments.insert(compartment.id.clone(), compartment);
        self.closure.take();
    }

    /// Declare two compartments as connected
    ///
    /// # Examples
    /// ```rust
    /// use mnm_core::network::compartment::Compartment;
    /// use mnm_core::network::network::Network;
    /// let mut network = Network::new_empty();
    /// network.add_compartment(Compartment::new("cyt"));
    /// network.add_compartment(Compartment::new("ext"));
    /// network.connect_compartments("cyt", "ext");
    /// assert!(network.connected("ext", "cyt"));
    /// ```
    pub fn connect_compartments(&mut self, a: &str, b: &str) {
        self.connections.insert((a.to_string(), b.to_string()));
        self.closure.take();
    }

    /// Add an entity version to the network
    ///
    /// Versions are snapshots: adding an entity whose (id, version) is already registered
    /// replaces nothing and returns an error instead.
    pub fn add_entity(&mut self, entity: Entity) -> Result<(), NetworkError> {
        let key = entity.key();
        if self.entities.contains_key(&key) {
            return Err(NetworkError::DuplicateEntity(key));
        }
        self.entities.insert(key, entity);
        Ok(())
    }

    /// Add an activity to the network
    pub fn add_activity(&mut self, activity: Activity) -> Result<(), NetworkError> {
        if self.activities.contains_key(&activity.id) {
            return Err(NetworkError::DuplicateActivity(activity.id));
        }
        self.activities.insert(activity.id.clone(), activity);
        Ok(())
    }

    pub fn compartments(&self) -> impl Iterator<Item = &Compartment> {
        self.compartments.values()
    }

    pub fn connections(&self) -> impl Iterator<Item = &(String, String)> {
        self.connections.iter()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }

    pub fn compartment(&self, id: &str) -> Option<&Compartment> {
        self.compartments.get(id)
    }

    pub fn entity(&self, key: &EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.get(id)
    }

    /// All registered versions of the entity with this id
    pub fn versions_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.values().filter(move |e| e.id == id)
    }

    /// Kind of the entity version, if registered
    pub fn entity_kind(&self, id: &str, version: &str) -> Option<EntityKind> {
        self.entities
            .get(&EntityKey::new(id, version))
            .map(|e| e.kind)
    }

    /// Entity versions declaring `Catalyses(activity)`
    pub fn catalysts_of<'a>(&'a self, activity: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.values().filter(move |e| e.catalyses(activity))
    }

    /// Entity versions declaring `Transports(activity)`
    pub fn transporters_of<'a>(
        &'a self,
        activity: &'a str,
    ) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.values().filter(move |e| e.transports(activity))
    }

    /// The cached symmetric, reflexive connectivity closure
    pub fn connectivity(&self) -> &Connectivity {
        self.closure.get_or_init(|| {
            let closure = Connectivity::close(
                self.compartments.keys().map(|c| c.as_str()),
                &self.connections,
            );
            debug!(
                "computed compartment connectivity closure with {} pairs",
                closure.len()
            );
            closure
        })
    }

    pub fn connected(&self, a: &str, b: &str) -> bool {
        self.connectivity().connected(a, b)
    }

    /// Check that a model item refers to something registered in the network
    pub fn check_item(&self, item: &ModelItem) -> Result<(), NetworkError> {
        match item {
            ModelItem::Setup(species) => self.check_species(species),
            ModelItem::Activity(id) => {
                if self.activities.contains_key(id) {
                    Ok(())
                } else {
                    Err(NetworkError::UnknownActivity(id.clone()))
                }
            }
        }
    }

    /// Check that a species names a registered entity version and compartment
    pub fn check_species(&self, species: &Species) -> Result<(), NetworkError> {
        if !self.entities.contains_key(&species.key()) {
            return Err(NetworkError::UnknownEntity(species.key()));
        }
        if !self.compartments.contains_key(&species.compartment) {
            return Err(NetworkError::UnknownCompartment(species.compartment.clone()));
        }
        Ok(())
    }

    /// Check every cross reference of the network
    ///
    /// Activities may only mention registered species and compartments, and entity properties
    /// may only name registered activities.
    pub fn check_references(&self) -> Result<(), NetworkError> {
        for (a, b) in &self.connections {
            for c in [a, b] {
                if !self.compartments.contains_key(c) {
                    return Err(NetworkError::UnknownCompartment(c.clone()));
                }
            }
        }
        for activity in self.activities.values() {
            for species in activity.substrates().chain(activity.products()) {
                self.check_species(species)?;
            }
            for c in activity
                .catalyst_compartments()
                .chain(activity.transporter_compartments())
            {
                if !self.compartments.contains_key(c) {
                    return Err(NetworkError::UnknownCompartment(c.to_string()));
                }
            }
        }
        for entity in self.entities.values() {
            for property in &entity.properties {
                let (Property::Catalyses(a) | Property::Transports(a)) = property;
                if !self.activities.contains_key(a) {
                    return Err(NetworkError::UnknownActivity(a.clone()));
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("Entity {0} is not part of the network")]
    UnknownEntity(EntityKey),
    #[error("Activity {0} is not part of the network")]
    UnknownActivity(String),
    #[error("Compartment {0} is not part of the network")]
    UnknownCompartment(String),
    #[error("Entity {0} is already registered, versions can not be replaced")]
    DuplicateEntity(EntityKey),
    #[error("Activity {0} is already registered")]
    DuplicateActivity(String),
    #[error("Intervention {0} can not be part of an experiment")]
    UnsupportedExperimentIntervention(String),
}
