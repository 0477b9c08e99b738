//! Resolution of which setup conditions and activities are in a candidate model
//!
//! An item is in the model when it was added (by the base model or by an `Add` intervention)
//! and no `Remove` intervention names it. Removal always wins, regardless of ordering.
use std::collections::HashSet;

use indexmap::IndexSet;

use crate::candidate::model::CandidateModel;
use crate::network::entity::Species;
use crate::network::intervention::{Intervention, ModelItem};
use crate::network::network::{Network, NetworkError};

/// Resolved membership of one model, optionally extended by experiment interventions
#[derive(Clone, Debug, PartialEq)]
pub struct Membership {
    model_id: String,
    added_setup: IndexSet<Species>,
    removed_setup: HashSet<Species>,
    added_activities: IndexSet<String>,
    removed_activities: HashSet<String>,
}

impl Membership {
    /// Membership of the model as defined by its own interventions
    pub fn of(model: &CandidateModel) -> Self {
        Self::with_interventions(model, &[])
    }

    /// Membership of the model with `extra` interventions applied after its own
    pub fn with_interventions(model: &CandidateModel, extra: &[Intervention]) -> Self {
        let mut membership = Membership {
            model_id: model.id.clone(),
            added_setup: IndexSet::new(),
            removed_setup: HashSet::new(),
            added_activities: IndexSet::new(),
            removed_activities: HashSet::new(),
        };
        for item in model.base_items() {
            membership.add(item);
        }
        for intervention in model.interventions.iter().chain(extra) {
            match intervention {
                Intervention::Add(item) => membership.add(item.clone()),
                Intervention::Remove(item) => membership.remove(item.clone()),
            }
        }
        membership
    }

    /// Same as [`Membership::with_interventions`], but checks that every item refers to
    /// something registered in the network
    pub fn resolve(
        network: &Network,
        model: &CandidateModel,
        extra: &[Intervention],
    ) -> Result<Self, NetworkError> {
        for item in model.base_items() {
            network.check_item(&item)?;
        }
        for intervention in model.interventions.iter().chain(extra) {
            network.check_item(intervention.item())?;
        }
        for species in &model.termination_conditions {
            network.check_species(species)?;
        }
        Ok(Self::with_interventions(model, extra))
    }

    fn add(&mut self, item: ModelItem) {
        match item {
            ModelItem::Setup(species) => {
                self.added_setup.insert(species);
            }
            ModelItem::Activity(id) => {
                self.added_activities.insert(id);
            }
        }
    }

    fn remove(&mut self, item: ModelItem) {
        match item {
            ModelItem::Setup(species) => {
                self.removed_setup.insert(species);
            }
            ModelItem::Activity(id) => {
                self.removed_activities.insert(id);
            }
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn in_model(&self, item: &ModelItem) -> bool {
        match item {
            ModelItem::Setup(species) => self.initially_present(species),
            ModelItem::Activity(id) => self.activity_in_model(id),
        }
    }

    pub fn activity_in_model(&self, id: &str) -> bool {
        self.added_activities.contains(id) && !self.removed_activities.contains(id)
    }

    /// Whether the species is part of the model's setup
    pub fn initially_present(&self, species: &Species) -> bool {
        self.added_setup.contains(species) && !self.removed_setup.contains(species)
    }

    /// Ids of the in-model activities, in the order they were added
    pub fn activities(&self) -> impl Iterator<Item = &str> {
        self.added_activities
            .iter()
            .filter(|a| !self.removed_activities.contains(*a))
            .map(|a| a.as_str())
    }

    /// In-model setup conditions, in the order they were added
    pub fn setup(&self) -> impl Iterator<Item = &Species> {
        self.added_setup
            .iter()
            .filter(|s| !self.removed_setup.contains(*s))
    }
}
